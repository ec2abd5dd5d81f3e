use crate::config::{ExtractionConfig, ExtractorOptions};
use crate::conversion::{member_stream_to_list, store_as_member_stream};
use crate::error::{ExtractorError, Result};
use crate::logging::{ExtractionLogger, TracingLogger};
use crate::member::Member;
use crate::metadata::ExtractionMetadata;
use crate::transform::{ExtractorTransform, TransformStats};
use oxigraph::model::Quad;
use oxigraph::store::Store;
use std::sync::{Arc, mpsc};
use std::thread;

/// Maximum number of events buffered between a running extraction and its consumer
pub const HIGH_WATER_MARK: usize = 1000;

/// Events produced by an extraction running in the background
#[derive(Debug, Clone)]
pub enum ExtractionEvent {
    Metadata(Vec<Quad>),
    Member(Member),
}

/// Creates extractions of a versioned LDES held in an in-memory store.
///
/// The whole source store and, for the accumulating modes, the whole accepted subset are held in
/// memory: this only suits LDESes that fit in memory.
pub struct Extractor {
    store: Store,
    logger: Arc<dyn ExtractionLogger>,
    metadata: Option<ExtractionMetadata>,
}

impl Extractor {
    pub fn new(store: Store) -> Self {
        Self::with_logger(store, Arc::new(TracingLogger::default()))
    }

    pub fn with_logger(store: Store, logger: Arc<dyn ExtractionLogger>) -> Self {
        Self {
            store,
            logger,
            metadata: None,
        }
    }

    /// Runs an extraction to completion and returns the extracted members.
    ///
    /// Paths missing from `options` are resolved from the LDES declaration in the store.
    pub fn create(&mut self, options: &ExtractorOptions) -> Result<Vec<Member>> {
        self.metadata = None;
        let config = ExtractionConfig::resolve(options, &self.store)?;
        let source = store_as_member_stream(&self.store)?;

        let mut transform = ExtractorTransform::new(source, config, self.logger.clone());
        let members = member_stream_to_list(transform.by_ref())?;

        self.metadata = Some(transform.metadata().clone());
        Ok(members)
    }

    /// Metadata of the last completed extraction
    pub fn metadata(&self) -> Result<&ExtractionMetadata> {
        self.metadata.as_ref().ok_or(ExtractorError::MetadataUnavailable)
    }

    /// Builds metadata for `options` without running an extraction
    pub fn create_new_metadata(&self, options: &ExtractorOptions) -> Result<ExtractionMetadata> {
        let config = ExtractionConfig::resolve(options, &self.store)?;
        Ok(ExtractionMetadata::build(&config))
    }

    /// Runs an extraction on a worker thread.
    ///
    /// Configuration errors are reported here, before the worker starts. The worker blocks once
    /// `HIGH_WATER_MARK` events are waiting; dropping the handle's receiver cancels the run.
    pub fn spawn(&self, options: &ExtractorOptions) -> Result<ExtractionHandle> {
        let config = ExtractionConfig::resolve(options, &self.store)?;
        let source = store_as_member_stream(&self.store)?;
        let logger = self.logger.clone();
        let (tx, rx) = mpsc::sync_channel(HIGH_WATER_MARK);

        let worker = thread::spawn(move || -> Result<TransformStats> {
            let mut transform = ExtractorTransform::new(source, config, logger);
            let metadata_tx = tx.clone();
            transform.subscribe_metadata(move |quads| {
                let _ = metadata_tx.send(ExtractionEvent::Metadata(quads.to_vec()));
            });

            while let Some(member) = transform.next() {
                if tx.send(ExtractionEvent::Member(member?)).is_err() {
                    break;
                }
            }
            Ok(transform.stats())
        });

        Ok(ExtractionHandle { events: rx, worker })
    }
}

/// Handle on an extraction running on a worker thread
pub struct ExtractionHandle {
    events: mpsc::Receiver<ExtractionEvent>,
    worker: thread::JoinHandle<Result<TransformStats>>,
}

impl ExtractionHandle {
    pub fn events(&self) -> &mpsc::Receiver<ExtractionEvent> {
        &self.events
    }

    /// Stops receiving and waits for the worker. Unread events are discarded.
    pub fn join(self) -> Result<TransformStats> {
        drop(self.events);
        self.worker
            .join()
            .map_err(|_| ExtractorError::WorkerFailed("extraction worker panicked".to_string()))?
    }

    /// Drains every event, then waits for the worker.
    pub fn collect(self) -> Result<(Vec<Quad>, Vec<Member>)> {
        let mut metadata = Vec::new();
        let mut members = Vec::new();
        for event in self.events.iter() {
            match event {
                ExtractionEvent::Metadata(quads) => metadata = quads,
                ExtractionEvent::Member(member) => members.push(member),
            }
        }
        self.join()?;
        Ok((metadata, members))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::turtle_to_store;

    const LDES: &str = r#"
        @prefix dct: <http://purl.org/dc/terms/> .
        @prefix ldes: <https://w3id.org/ldes#> .
        @prefix tree: <https://w3id.org/tree#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .
        @prefix ex: <http://example.org/> .

        ex:ES a ldes:EventStream;
            ldes:versionOfPath dct:isVersionOf;
            ldes:timestampPath dct:issued;
            tree:member ex:resource1v0, ex:resource1v1.

        ex:resource1v0
            dct:isVersionOf ex:resource1;
            dct:issued "2021-12-15T10:00:00.000Z"^^xsd:dateTime;
            dct:title "First version of the title".

        ex:resource1v1
            dct:isVersionOf ex:resource1;
            dct:issued "2021-12-15T12:00:00.000Z"^^xsd:dateTime;
            dct:title "Title has been updated once".
    "#;

    #[test]
    fn test_metadata_before_create() {
        let extractor = Extractor::new(turtle_to_store(LDES, None).unwrap());
        assert!(matches!(
            extractor.metadata(),
            Err(ExtractorError::MetadataUnavailable)
        ));
    }

    #[test]
    fn test_create_with_basic_options() {
        let mut extractor = Extractor::new(turtle_to_store(LDES, None).unwrap());
        let members = extractor
            .create(&ExtractorOptions::new("http://example.org/ES"))
            .unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(extractor.metadata().unwrap().quads().len(), 3);
    }

    #[test]
    fn test_spawned_extraction() {
        let extractor = Extractor::new(turtle_to_store(LDES, None).unwrap());
        let handle = extractor
            .spawn(&ExtractorOptions::new("http://example.org/ES"))
            .unwrap();
        let (metadata, members) = handle.collect().unwrap();
        assert_eq!(metadata.len(), 3);
        assert_eq!(members.len(), 2);
    }

    #[test]
    fn test_spawn_fails_on_unresolvable_paths() {
        let extractor = Extractor::new(turtle_to_store(LDES, None).unwrap());
        assert!(extractor
            .spawn(&ExtractorOptions::new("http://example.org/unknown"))
            .is_err());
    }
}
