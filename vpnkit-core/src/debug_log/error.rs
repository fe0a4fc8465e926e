//! Errors raised while packaging or parsing debug log payloads.

use thiserror::Error;

/// Result type for debug log packaging.
pub type DebugLogResult<T> = Result<T, DebugLogError>;

/// Errors raised while serializing or parsing a debug log payload.
#[derive(Debug, Error, uniffi::Error)]
pub enum DebugLogError {
    /// The payload does not start with a separator line.
    #[error("missing separator line")]
    MissingSeparator,
    /// The payload does not have the expected sections.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
    /// Deflating or inflating a section failed.
    #[error("compression error: {0}")]
    Compression(String),
}

impl From<std::io::Error> for DebugLogError {
    fn from(error: std::io::Error) -> Self {
        Self::Compression(error.to_string())
    }
}
