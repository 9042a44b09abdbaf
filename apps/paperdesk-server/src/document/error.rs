//! Document error types
//!
//! Failures raised by the document store and the toolbox operations built on it.

use thiserror::Error;

/// Unified document error type
#[derive(Debug, Error)]
pub enum DocumentError {
    /// Bytes are not a decodable PDF
    #[error("Failed to load document: {0}")]
    Load(String),

    /// Document is password protected and must be decrypted first
    #[error("Document is encrypted; decrypt it before editing")]
    Encrypted,

    /// Decryption requested for a document without encryption
    #[error("Document is not encrypted")]
    NotEncrypted,

    /// Security handler lopdf cannot decrypt, or a malformed encryption dictionary
    #[error("Unsupported document encryption: {0}")]
    UnsupportedEncryption(String),

    /// Password rejected by the security handler
    #[error("Incorrect password for encrypted document")]
    WrongPassword,

    /// Page index outside the document
    #[error("Page index {index} out of range (document has {count} pages)")]
    PageOutOfRange { index: usize, count: usize },

    /// Page range expression that does not fit the document
    #[error("Invalid page range '{0}'")]
    InvalidRange(String),

    /// Wrong number of input documents for a multi-document operation
    #[error("Expected between {min} and {max} documents, got {count}")]
    DocumentCount { count: usize, min: usize, max: usize },

    /// Internal object graph is not what the PDF structure requires
    #[error("Malformed document structure: {0}")]
    Structure(String),

    /// Failed to encode a content stream
    #[error("Content error: {0}")]
    Content(String),

    /// Failed to write the output document
    #[error("Failed to serialize document: {0}")]
    Serialize(String),

    /// IO error (std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for document operations
pub type Result<T> = std::result::Result<T, DocumentError>;
