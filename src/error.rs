//! Error types for the extraction library.
//!
//! The core components (normalizer, legacy decoder, segmenter, structure parser)
//! are total and never return errors. Errors only surface at the edges: loading
//! documents and configuration, validating collaborator input, and writing output.

/// Result type alias for library operations that touch I/O or external input.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur at the library's I/O boundaries.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Document handed over by the page-extraction collaborator is structurally unusable
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Configuration values that the segmenter or pipeline cannot work with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
