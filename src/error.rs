//! Error definitions for the document and CLI boundary.

use thiserror::Error;

#[derive(Debug, Error)]
/// Top-level error type returned by public APIs.
///
/// The mapper itself never fails: malformed descriptors degrade to partial or
/// empty output. Errors arise only when reading, parsing, or serializing
/// whole documents.
pub enum MapperError {
    /// Input text is not valid JSON or is not the expected document shape.
    #[error("input error: {0}")]
    InputError(String),
    /// Output serialization failure.
    #[error("serialization error: {0}")]
    SerializationError(String),
    /// Filesystem I/O error from the CLI or callers that propagate I/O.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
