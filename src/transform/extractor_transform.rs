use crate::classifier::{classify, classify_window};
use crate::config::{ExtractionConfig, ExtractionMode};
use crate::error::Result;
use crate::logging::{ExtractionLogger, TracingLogger};
use crate::member::{Member, MemberItem};
use crate::metadata::ExtractionMetadata;
use crate::transform::materialize;
use indexmap::IndexMap;
use oxigraph::model::Quad;
use std::collections::VecDeque;
use std::sync::Arc;

/// Callback type for the metadata event
pub type MetadataCallback = Arc<dyn Fn(&[Quad]) + Send + Sync>;

/// Counters of a single run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub received: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub dropped: usize,
}

/// Single-pass stream stage extracting members of an LDES.
///
/// Pulls items from `input` only when the consumer asks for the next output, so a slow consumer
/// holds back the source. In `Filter` mode accepted members leave immediately, in arrival order.
/// In the accumulating modes members in the window are grouped per version identifier and
/// released once the input is exhausted.
///
/// The metadata event fires once, on the first poll, before any member is handed out.
pub struct ExtractorTransform<I> {
    input: I,
    config: ExtractionConfig,
    metadata: ExtractionMetadata,
    logger: Arc<dyn ExtractionLogger>,
    callbacks: Vec<MetadataCallback>,
    emitted_metadata: bool,
    accumulator: IndexMap<String, Vec<Vec<Quad>>>,
    pending: VecDeque<Member>,
    finished: bool,
    stats: TransformStats,
}

impl<I> ExtractorTransform<I>
where
    I: Iterator<Item = Result<MemberItem>>,
{
    pub fn new(input: I, config: ExtractionConfig, logger: Arc<dyn ExtractionLogger>) -> Self {
        let metadata = ExtractionMetadata::build(&config);
        Self {
            input,
            config,
            metadata,
            logger,
            callbacks: Vec::new(),
            emitted_metadata: false,
            accumulator: IndexMap::new(),
            pending: VecDeque::new(),
            finished: false,
            stats: TransformStats::default(),
        }
    }

    pub fn with_default_logger(input: I, config: ExtractionConfig) -> Self {
        Self::new(input, config, Arc::new(TracingLogger::default()))
    }

    /// Subscribe a callback to the metadata event
    pub fn subscribe_metadata<F>(&mut self, callback: F)
    where
        F: Fn(&[Quad]) + Send + Sync + 'static,
    {
        self.callbacks.push(Arc::new(callback));
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// The metadata of this extraction. Only final once `is_finished` holds.
    pub fn metadata(&self) -> &ExtractionMetadata {
        &self.metadata
    }

    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    pub fn is_finished(&self) -> bool {
        self.finished && self.pending.is_empty()
    }

    fn emit_metadata_once(&mut self) {
        if self.emitted_metadata {
            return;
        }
        self.emitted_metadata = true;
        for callback in &self.callbacks {
            callback(self.metadata.quads());
        }
    }

    fn process(&mut self, item: MemberItem) -> Option<Member> {
        self.stats.received += 1;
        let member = match item {
            MemberItem::Member(member) => member,
            MemberItem::Malformed(raw) => {
                self.stats.dropped += 1;
                self.logger.info(&format!("item in stream was not a member: {}", raw));
                return None;
            }
        };

        let classification = if self.config.mode.accumulates() {
            classify_window(&member, &self.config)
        } else {
            classify(&member, &self.config)
        };

        let classification = match classification {
            Ok(classification) => classification,
            Err(e) => {
                self.stats.dropped += 1;
                self.logger.info(&format!(
                    "Following member could not be transformed: {}",
                    member.id_value()
                ));
                self.logger.debug(&e.to_string());
                return None;
            }
        };

        if !classification.accept {
            self.stats.rejected += 1;
            return None;
        }
        self.stats.accepted += 1;

        match self.config.mode {
            ExtractionMode::Filter => Some(member),
            ExtractionMode::Grouped => {
                self.accumulate(classification.version_id, member.quads);
                None
            }
            ExtractionMode::Materialized => {
                let group = materialize(
                    &member,
                    &classification.version,
                    self.config.timestamp_path.as_ref(),
                );
                self.accumulate(classification.version_id, group);
                None
            }
        }
    }

    fn accumulate(&mut self, version_id: String, group: Vec<Quad>) {
        self.accumulator.entry(version_id).or_default().push(group);
    }

    // Every group becomes its own output member, tagged with the subject of its first statement.
    fn flush(&mut self) {
        for (_, groups) in self.accumulator.drain(..) {
            for group in groups {
                if let Some(first) = group.first() {
                    let id = first.subject.clone();
                    self.pending.push_back(Member::new(id, group));
                }
            }
        }
    }

    fn finish(&mut self) {
        self.finished = true;
        if self.config.mode.accumulates() {
            self.flush();
        }
        self.logger.debug(&format!(
            "Extraction {} finished: {} received, {} accepted, {} rejected, {} dropped",
            self.config.extractor_identifier,
            self.stats.received,
            self.stats.accepted,
            self.stats.rejected,
            self.stats.dropped
        ));
    }
}

impl<I> Iterator for ExtractorTransform<I>
where
    I: Iterator<Item = Result<MemberItem>>,
{
    type Item = Result<Member>;

    fn next(&mut self) -> Option<Self::Item> {
        self.emit_metadata_once();

        if let Some(member) = self.pending.pop_front() {
            return Some(Ok(member));
        }
        if self.finished {
            return None;
        }

        loop {
            match self.input.next() {
                Some(Ok(item)) => {
                    if let Some(member) = self.process(item) {
                        return Some(Ok(member));
                    }
                }
                Some(Err(e)) => {
                    // Upstream failures end the run; whatever was accumulated is discarded.
                    self.finished = true;
                    self.accumulator.clear();
                    self.logger.error(&format!("Member stream failed: {}", e));
                    return Some(Err(e));
                }
                None => {
                    self.finish();
                    return self.pending.pop_front().map(Ok);
                }
            }
        }
    }
}
