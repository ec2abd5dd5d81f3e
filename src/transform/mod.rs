mod extractor_transform;
mod materialization;

pub use extractor_transform::{ExtractorTransform, MetadataCallback, TransformStats};
pub use materialization::materialize;
