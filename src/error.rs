//! Error types for extraction runs

use oxigraph::io::RdfParseError;
use oxigraph::model::IriParseError;
use oxigraph::store::{LoaderError, StorageError};
use thiserror::Error;

/// Result type alias for fatal extraction errors
pub type Result<T> = std::result::Result<T, ExtractorError>;

/// Errors that abort an extraction before or outside of member processing
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// A mandatory path predicate was neither supplied nor declared by the source LDES
    #[error(
        "No {path} was given in options and none could be resolved for {ldes}: \
         found {found} declarations, expected one"
    )]
    UnresolvedPath {
        path: &'static str,
        ldes: String,
        found: usize,
    },

    /// The source LDES declares a path predicate that is a literal or a blank node
    #[error("The {path} declared for {ldes} is not an IRI: {value}")]
    PathNotIri {
        path: &'static str,
        ldes: String,
        value: String,
    },

    /// A mandatory path predicate is absent from an already resolved configuration
    #[error("No {0} was given in options")]
    MissingPath(&'static str),

    /// An identifier in the options is not a valid IRI
    #[error("Invalid IRI {iri}: {message}")]
    InvalidIri { iri: String, message: String },

    /// Parse error when reading RDF data
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Store error
    #[error("Store error: {0}")]
    StoreError(String),

    /// IO error while writing RDF data
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// The metadata of an extraction was requested before a run completed
    #[error("Can't get metadata before running create")]
    MetadataUnavailable,

    /// The worker thread running an extraction terminated abnormally
    #[error("Extraction worker failed: {0}")]
    WorkerFailed(String),
}

impl From<StorageError> for ExtractorError {
    fn from(err: StorageError) -> Self {
        ExtractorError::StoreError(err.to_string())
    }
}

impl From<LoaderError> for ExtractorError {
    fn from(err: LoaderError) -> Self {
        ExtractorError::ParseError(err.to_string())
    }
}

impl From<RdfParseError> for ExtractorError {
    fn from(err: RdfParseError) -> Self {
        ExtractorError::ParseError(err.to_string())
    }
}

impl ExtractorError {
    pub(crate) fn invalid_iri(iri: &str, err: IriParseError) -> Self {
        ExtractorError::InvalidIri {
            iri: iri.to_string(),
            message: err.to_string(),
        }
    }
}

/// Per-member failures. A member that fails classification is dropped; the run continues.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassificationError {
    #[error(
        "Found {found} dateTime literals following the timestamp path of {member}; \
         expected one such literal."
    )]
    TimestampCount { member: String, found: usize },

    #[error(
        "Found {found} identifiers following the version paths of {member}; \
         expected one such identifier."
    )]
    VersionCount { member: String, found: usize },

    #[error("Timestamp of {member} is not a literal: {value}")]
    TimestampNotLiteral { member: String, value: String },

    #[error("Timestamp of {member} is not a valid xsd:dateTime: {value}")]
    InvalidDateTime { member: String, value: String },
}
