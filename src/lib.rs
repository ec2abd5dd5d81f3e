mod classifier;
mod config;
mod conversion;
mod error;
mod extractor;
mod logging;
mod member;
mod metadata;
mod transform;
pub mod vocab;
mod window;

pub use classifier::{
    Classification, classify, classify_window, extract_timestamp, extract_version, parse_date_time,
};
pub use config::{
    CollectionType, DEFAULT_EXTRACTOR_IDENTIFIER, ExtractionConfig, ExtractionMode,
    ExtractorOptions, extract_extractor_options, retrieve_timestamp_property,
    retrieve_version_of_property,
};
pub use conversion::{
    StoreMemberStream, member_stream_to_list, member_stream_to_store, quads_to_string,
    store_as_member_stream, store_to_string, string_to_store, turtle_to_store,
};
pub use error::{ClassificationError, ExtractorError, Result};
pub use extractor::{ExtractionEvent, ExtractionHandle, Extractor, HIGH_WATER_MARK};
pub use logging::{ExtractionLogger, LogLevel, MemoryLogger, TracingLogger};
pub use member::{Member, MemberItem};
pub use metadata::ExtractionMetadata;
pub use transform::{ExtractorTransform, MetadataCallback, TransformStats, materialize};
pub use window::TimeWindow;
