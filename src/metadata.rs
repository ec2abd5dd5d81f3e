use crate::config::{CollectionType, ExtractionConfig, ExtractorOptions};
use crate::error::Result;
use crate::vocab::{ldes, rdf, tree};
use oxigraph::model::{GraphName, NamedNode, NamedNodeRef, Quad};
use oxigraph::store::Store;

/// The facts describing an extracted collection: its type and its path predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMetadata {
    extractor_identifier: NamedNode,
    quads: Vec<Quad>,
}

impl ExtractionMetadata {
    /// Builds the metadata of a resolved configuration. Always yields the same three facts.
    pub fn build(config: &ExtractionConfig) -> Self {
        let collection_type = match config.collection_type {
            CollectionType::EventStream => ldes::EVENT_STREAM,
            CollectionType::Collection => tree::COLLECTION,
        };
        let subject = &config.extractor_identifier;

        let quads = vec![
            Quad::new(
                subject.clone(),
                rdf::TYPE.into_owned(),
                collection_type.into_owned(),
                GraphName::DefaultGraph,
            ),
            Quad::new(
                subject.clone(),
                ldes::VERSION_OF_PATH.into_owned(),
                config.version_of_path.clone(),
                GraphName::DefaultGraph,
            ),
            Quad::new(
                subject.clone(),
                ldes::TIMESTAMP_PATH.into_owned(),
                config.timestamp_path.clone(),
                GraphName::DefaultGraph,
            ),
        ];

        Self {
            extractor_identifier: subject.clone(),
            quads,
        }
    }

    /// Builds metadata straight from options. Fails when either path is missing.
    pub fn from_options(options: &ExtractorOptions) -> Result<Self> {
        Ok(Self::build(&ExtractionConfig::from_options(options)?))
    }

    /// The extracted collection these facts describe
    pub fn extractor_identifier(&self) -> NamedNodeRef<'_> {
        self.extractor_identifier.as_ref()
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn into_quads(self) -> Vec<Quad> {
        self.quads
    }

    pub fn to_store(&self) -> Result<Store> {
        let store = Store::new()?;
        for quad in &self.quads {
            store.insert(quad)?;
        }
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_EXTRACTOR_IDENTIFIER;
    use crate::vocab::dct;

    fn options() -> ExtractorOptions {
        ExtractorOptions::new("http://example.org/ES")
            .with_extractor_identifier("http://example.org/extractor")
            .with_version_of_path(dct::IS_VERSION_OF.as_str())
            .with_timestamp_path(dct::ISSUED.as_str())
    }

    #[test]
    fn test_metadata_facts() {
        let metadata = ExtractionMetadata::from_options(&options()).unwrap();
        let store = metadata.to_store().unwrap();
        let extractor = NamedNodeRef::new("http://example.org/extractor").unwrap();

        assert_eq!(metadata.quads().len(), 3);
        assert!(store
            .contains(&Quad::new(
                extractor.into_owned(),
                rdf::TYPE.into_owned(),
                ldes::EVENT_STREAM.into_owned(),
                GraphName::DefaultGraph
            ))
            .unwrap());
        assert!(store
            .contains(&Quad::new(
                extractor.into_owned(),
                ldes::VERSION_OF_PATH.into_owned(),
                dct::IS_VERSION_OF.into_owned(),
                GraphName::DefaultGraph
            ))
            .unwrap());
        assert!(store
            .contains(&Quad::new(
                extractor.into_owned(),
                ldes::TIMESTAMP_PATH.into_owned(),
                dct::ISSUED.into_owned(),
                GraphName::DefaultGraph
            ))
            .unwrap());
    }

    #[test]
    fn test_collection_type() {
        let options = options().with_collection_type(CollectionType::Collection);
        let metadata = ExtractionMetadata::from_options(&options).unwrap();
        assert_eq!(metadata.quads()[0].object, tree::COLLECTION.into_owned().into());
    }

    #[test]
    fn test_default_extractor_identifier() {
        let mut options = options();
        options.extractor_identifier = None;
        let metadata = ExtractionMetadata::from_options(&options).unwrap();
        assert_eq!(metadata.extractor_identifier().as_str(), DEFAULT_EXTRACTOR_IDENTIFIER);
        assert!(metadata
            .quads()
            .iter()
            .all(|quad| quad.subject.to_string() == format!("<{DEFAULT_EXTRACTOR_IDENTIFIER}>")));
    }

    #[test]
    fn test_deterministic() {
        let config = ExtractionConfig::from_options(&options()).unwrap();
        assert_eq!(ExtractionMetadata::build(&config), ExtractionMetadata::build(&config));
    }

    #[test]
    fn test_missing_path() {
        let mut options = options();
        options.timestamp_path = None;
        assert!(ExtractionMetadata::from_options(&options).is_err());
    }
}
