//! Options accepted by an extraction and their resolution into an immutable configuration.

use crate::error::{ExtractorError, Result};
use crate::vocab::ldes;
use crate::window::TimeWindow;
use chrono::{DateTime, Utc};
use oxigraph::model::{NamedNode, NamedNodeRef, Term};
use oxigraph::store::Store;

/// Identifier given to the extracted collection when none is supplied
pub const DEFAULT_EXTRACTOR_IDENTIFIER: &str = "http://example.org/extractor";

/// Type asserted for the extracted collection in its metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollectionType {
    #[default]
    EventStream,
    Collection,
}

/// How accepted members leave the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractionMode {
    /// Emit accepted members immediately, unchanged, honouring the version identifier filter.
    #[default]
    Filter,
    /// Accumulate accepted members per version identifier and emit them at end of input.
    Grouped,
    /// As `Grouped`, with the timestamp statement re-subjected under the version identifier.
    Materialized,
}

impl ExtractionMode {
    pub fn accumulates(&self) -> bool {
        !matches!(self, ExtractionMode::Filter)
    }
}

/// Caller-facing options of an extraction. Everything except the LDES identifier is optional.
#[derive(Debug, Clone, Default)]
pub struct ExtractorOptions {
    /// Start of the extraction window (inclusive). Defaults to the Unix epoch.
    pub start_date: Option<DateTime<Utc>>,
    /// End of the extraction window (inclusive). Defaults to the moment of resolution.
    pub end_date: Option<DateTime<Utc>>,
    /// When set, only members that are a version of this identifier are extracted.
    /// Ignored by the accumulating modes, which group by every identifier encountered.
    pub version_identifier: Option<String>,
    /// Identifier given to the extracted collection.
    pub extractor_identifier: Option<String>,
    /// Identifier of the versioned LDES the extraction is created from.
    pub ldes_identifier: String,
    /// Object of the `ldes:versionOfPath` of the source LDES.
    pub version_of_path: Option<String>,
    /// Object of the `ldes:timestampPath` of the source LDES.
    pub timestamp_path: Option<String>,
    pub mode: ExtractionMode,
    pub collection_type: CollectionType,
}

impl ExtractorOptions {
    pub fn new(ldes_identifier: impl Into<String>) -> Self {
        Self {
            ldes_identifier: ldes_identifier.into(),
            ..Default::default()
        }
    }

    pub fn with_window(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn with_start_date(mut self, start: DateTime<Utc>) -> Self {
        self.start_date = Some(start);
        self
    }

    pub fn with_end_date(mut self, end: DateTime<Utc>) -> Self {
        self.end_date = Some(end);
        self
    }

    pub fn with_version_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.version_identifier = Some(identifier.into());
        self
    }

    pub fn with_extractor_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.extractor_identifier = Some(identifier.into());
        self
    }

    pub fn with_version_of_path(mut self, path: impl Into<String>) -> Self {
        self.version_of_path = Some(path.into());
        self
    }

    pub fn with_timestamp_path(mut self, path: impl Into<String>) -> Self {
        self.timestamp_path = Some(path.into());
        self
    }

    /// Switches to accumulation per version identifier, with or without materialization.
    pub fn materialized(mut self, materialize: bool) -> Self {
        self.mode = if materialize {
            ExtractionMode::Materialized
        } else {
            ExtractionMode::Grouped
        };
        self
    }

    pub fn with_collection_type(mut self, collection_type: CollectionType) -> Self {
        self.collection_type = collection_type;
        self
    }
}

/// Resolved configuration of a single extraction run. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionConfig {
    pub(crate) version_of_path: NamedNode,
    pub(crate) timestamp_path: NamedNode,
    pub(crate) window: TimeWindow,
    pub(crate) version_identifier: Option<String>,
    pub(crate) extractor_identifier: NamedNode,
    pub(crate) ldes_identifier: String,
    pub(crate) mode: ExtractionMode,
    pub(crate) collection_type: CollectionType,
}

impl ExtractionConfig {
    pub fn version_of_path(&self) -> NamedNodeRef<'_> {
        self.version_of_path.as_ref()
    }

    pub fn timestamp_path(&self) -> NamedNodeRef<'_> {
        self.timestamp_path.as_ref()
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn version_identifier(&self) -> Option<&str> {
        self.version_identifier.as_deref()
    }

    pub fn extractor_identifier(&self) -> NamedNodeRef<'_> {
        self.extractor_identifier.as_ref()
    }

    pub fn ldes_identifier(&self) -> &str {
        &self.ldes_identifier
    }

    pub fn mode(&self) -> ExtractionMode {
        self.mode
    }

    pub fn collection_type(&self) -> CollectionType {
        self.collection_type
    }

    /// Resolves options without a source store: both paths must be present in the options.
    pub fn from_options(options: &ExtractorOptions) -> Result<Self> {
        let version_of_path = options
            .version_of_path
            .as_deref()
            .ok_or(ExtractorError::MissingPath("versionOfPath"))?;
        let timestamp_path = options
            .timestamp_path
            .as_deref()
            .ok_or(ExtractorError::MissingPath("timestampPath"))?;
        Self::build(options, parse_iri(version_of_path)?, parse_iri(timestamp_path)?)
    }

    /// Resolves options, discovering missing paths from the declarations of the LDES in `store`.
    pub fn resolve(options: &ExtractorOptions, store: &Store) -> Result<Self> {
        let version_of_path = match options.version_of_path.as_deref() {
            Some(path) => parse_iri(path)?,
            None => retrieve_version_of_property(store, &options.ldes_identifier)?,
        };
        let timestamp_path = match options.timestamp_path.as_deref() {
            Some(path) => parse_iri(path)?,
            None => retrieve_timestamp_property(store, &options.ldes_identifier)?,
        };
        Self::build(options, version_of_path, timestamp_path)
    }

    fn build(
        options: &ExtractorOptions,
        version_of_path: NamedNode,
        timestamp_path: NamedNode,
    ) -> Result<Self> {
        let start = options.start_date.unwrap_or(DateTime::UNIX_EPOCH);
        let end = options.end_date.unwrap_or_else(Utc::now);
        let extractor_identifier = parse_iri(
            options
                .extractor_identifier
                .as_deref()
                .unwrap_or(DEFAULT_EXTRACTOR_IDENTIFIER),
        )?;

        Ok(Self {
            version_of_path,
            timestamp_path,
            window: TimeWindow::new(start, end),
            version_identifier: options.version_identifier.clone(),
            extractor_identifier,
            ldes_identifier: options.ldes_identifier.clone(),
            mode: options.mode,
            collection_type: options.collection_type,
        })
    }
}

fn parse_iri(iri: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| ExtractorError::invalid_iri(iri, e))
}

/// Retrieves the `ldes:versionOfPath` declared for `ldes_identifier` in `store`
pub fn retrieve_version_of_property(store: &Store, ldes_identifier: &str) -> Result<NamedNode> {
    retrieve_path(store, ldes_identifier, ldes::VERSION_OF_PATH, "versionOfPath")
}

/// Retrieves the `ldes:timestampPath` declared for `ldes_identifier` in `store`
pub fn retrieve_timestamp_property(store: &Store, ldes_identifier: &str) -> Result<NamedNode> {
    retrieve_path(store, ldes_identifier, ldes::TIMESTAMP_PATH, "timestampPath")
}

// A version materialization is only defined when the LDES declares exactly one of each path.
fn retrieve_path(
    store: &Store,
    ldes_identifier: &str,
    declaration: NamedNodeRef<'_>,
    path: &'static str,
) -> Result<NamedNode> {
    let ldes = parse_iri(ldes_identifier)?;
    let mut objects: Vec<Term> = Vec::new();
    for quad in store.quads_for_pattern(Some(ldes.as_ref().into()), Some(declaration), None, None) {
        let quad = quad?;
        if !objects.contains(&quad.object) {
            objects.push(quad.object);
        }
    }

    match objects.as_slice() {
        [Term::NamedNode(node)] => Ok(node.clone()),
        [other] => Err(ExtractorError::PathNotIri {
            path,
            ldes: ldes_identifier.to_string(),
            value: other.to_string(),
        }),
        _ => Err(ExtractorError::UnresolvedPath {
            path,
            ldes: ldes_identifier.to_string(),
            found: objects.len(),
        }),
    }
}

/// Builds options for `ldes_identifier` with both paths taken from the store.
pub fn extract_extractor_options(store: &Store, ldes_identifier: &str) -> Result<ExtractorOptions> {
    let version_of_path = retrieve_version_of_property(store, ldes_identifier)?;
    let timestamp_path = retrieve_timestamp_property(store, ldes_identifier)?;
    Ok(ExtractorOptions::new(ldes_identifier)
        .with_version_of_path(version_of_path.into_string())
        .with_timestamp_path(timestamp_path.into_string()))
}
