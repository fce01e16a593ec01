// crates/engine/src/domain/error.rs
use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a document-level failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    MalformedXml,
    UnexpectedStructure,
    TimestampFormat,
    Limit,
}

/// Failure extracting records from one trust-store document. Every variant
/// aborts the document it was raised for.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("malformed XML: {0}")]
    MalformedXml(String),

    #[error("unexpected structure: {0}")]
    UnexpectedStructure(String),

    #[error("malformed entry list: {fingerprints} fingerprint keys but {entries} entry mappings")]
    MalformedEntry { fingerprints: usize, entries: usize },

    #[error("entry {fingerprint}: invalid modDate {raw:?}")]
    TimestampFormat {
        fingerprint: String,
        raw: String,
        #[source]
        reason: chrono::ParseError,
    },

    #[error("document too large: {size} bytes (max: {max})")]
    DocumentTooLarge { size: usize, max: usize },

    #[error("nesting deeper than {max} levels")]
    NestingTooDeep { max: usize },
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::MalformedXml(_) => ErrorKind::MalformedXml,
            ExtractError::UnexpectedStructure(_) | ExtractError::MalformedEntry { .. } => {
                ErrorKind::UnexpectedStructure
            }
            ExtractError::TimestampFormat { .. } => ErrorKind::TimestampFormat,
            ExtractError::DocumentTooLarge { .. } | ExtractError::NestingTooDeep { .. } => ErrorKind::Limit,
        }
    }
}

impl From<roxmltree::Error> for ExtractError {
    fn from(e: roxmltree::Error) -> Self {
        ExtractError::MalformedXml(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error("{source_id}: {error}")]
    Document {
        source_id: String,
        #[source]
        error: ExtractError,
    },

    // Raised when the facade catches a panic instead of unwinding into the caller.
    #[error("internal panic: {0}")]
    Panic(String),
}

impl EngineError {
    pub fn document(source_id: impl Into<String>, error: ExtractError) -> Self {
        EngineError::Document { source_id: source_id.into(), error }
    }

    /// The document-level error kind, if this error came from a document.
    pub fn extract_kind(&self) -> Option<ErrorKind> {
        match self {
            EngineError::Document { error, .. } => Some(error.kind()),
            _ => None,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
