use thiserror::Error;

/// Errors produced by the compression pipeline.
///
/// The first two variants are caused by the caller's input and map to
/// HTTP 400; the other two are server-side faults and map to HTTP 500.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CompressError {
    /// No image payload was provided (missing or empty file part)
    #[error("No image provided")]
    MissingInput,

    /// Bytes are not decodable as any known image format
    #[error("Invalid image format: {reason}")]
    InvalidImageFormat { reason: String },

    /// Input decoded fine but the encoder rejected the operation
    #[error("Failed to encode {format} image: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },

    /// Any other fault while processing the request
    #[error("Unexpected failure: {0}")]
    UnexpectedFailure(String),
}

impl CompressError {
    /// Whether the error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CompressError::MissingInput | CompressError::InvalidImageFormat { .. }
        )
    }
}
