//! HTTP request handlers for the compression API.
//!
//! # Endpoints
//!
//! - `POST /api/compress` - Compress an uploaded image
//! - `GET /health` - Health check endpoint

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, error, warn};

use crate::compress::{CompressionResult, CompressionService, CompressionTier, OutputFormat};
use crate::error::CompressError;
use crate::format::SourceFormat;

/// Default ceiling for a single uploaded image (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Multipart field names accepted for the image payload.
const IMAGE_FIELDS: &[&str] = &["image", "file"];

/// Multipart field names accepted for the compression tier.
const LEVEL_FIELDS: &[&str] = &["compressionLevel", "level"];

// =============================================================================
// Application State
// =============================================================================

/// Shared application state containing the compression service.
#[derive(Clone)]
pub struct AppState {
    /// The compression service
    pub service: Arc<CompressionService>,

    /// Largest accepted image part, in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    /// Create a new application state with the default upload ceiling.
    pub fn new(service: CompressionService) -> Self {
        Self {
            service: Arc::new(service),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }

    /// Create a new application state with a custom upload ceiling.
    pub fn with_max_upload_bytes(service: CompressionService, max_upload_bytes: usize) -> Self {
        Self {
            service: Arc::new(service),
            max_upload_bytes,
        }
    }
}

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "missing_input", "encoding_failed")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}

/// Successful compression response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressResponse {
    /// `data:` URL with the re-encoded image
    pub compressed_image: String,

    /// Size of the re-encoded image in bytes
    pub size: usize,

    /// Output format name
    pub format: OutputFormat,

    /// Detected input format
    pub source_format: SourceFormat,

    /// Size of the upload in bytes
    pub original_size: usize,

    /// Encoder quality that was applied
    pub quality: u8,

    /// Image width in pixels
    pub width: u32,

    /// Image height in pixels
    pub height: u32,
}

impl From<&CompressionResult> for CompressResponse {
    fn from(result: &CompressionResult) -> Self {
        Self {
            compressed_image: result.data_url(),
            size: result.size_bytes,
            format: result.output_format,
            source_format: result.source_format,
            original_size: result.original_size,
            quality: result.quality,
            width: result.width,
            height: result.height,
        }
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert CompressError to HTTP response.
///
/// Client errors are logged at WARN, server errors at ERROR. Server error
/// messages are generic; the underlying detail only goes to the log.
impl IntoResponse for CompressError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            CompressError::MissingInput => (
                StatusCode::BAD_REQUEST,
                "missing_input",
                "No image provided".to_string(),
            ),
            CompressError::InvalidImageFormat { .. } => (
                StatusCode::BAD_REQUEST,
                "invalid_image_format",
                "The uploaded file is not a supported image".to_string(),
            ),
            CompressError::EncodingFailed { format, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "encoding_failed",
                format!("Failed to compress image as {}", format),
            ),
            CompressError::UnexpectedFailure(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "An unexpected error occurred while compressing the image".to_string(),
            ),
        };

        if status.is_server_error() {
            error!(
                error_type = error_type,
                status = status.as_u16(),
                detail = %self,
                "Server error: {}",
                message
            );
        } else {
            warn!(
                error_type = error_type,
                status = status.as_u16(),
                detail = %self,
                "Client error: {}",
                message
            );
        }

        let error_response = ErrorResponse::with_status(error_type, message, status);

        (status, Json(error_response)).into_response()
    }
}

/// Errors raised by the compress handler.
///
/// Upload-level problems (malformed multipart, oversize parts) are kept
/// apart from [`CompressError`], which only describes the pipeline itself.
#[derive(Debug)]
pub enum HandlerError {
    /// Pipeline failure
    Compress(CompressError),

    /// Request body is not a readable multipart form
    InvalidUpload(String),

    /// Image part exceeds the configured ceiling
    PayloadTooLarge { limit: usize },
}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            HandlerError::Compress(err) => return err.into_response(),
            HandlerError::InvalidUpload(detail) => {
                warn!(detail = %detail, "Rejected malformed upload");
                (
                    StatusCode::BAD_REQUEST,
                    "invalid_upload",
                    "Request must be multipart/form-data with an image field".to_string(),
                )
            }
            HandlerError::PayloadTooLarge { limit } => {
                warn!(limit = limit, "Rejected oversize upload");
                (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "payload_too_large",
                    format!(
                        "Image exceeds the maximum upload size of {}",
                        format_size(limit)
                    ),
                )
            }
        };

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Human-readable byte count; whole MiB when at least 1 MiB.
fn format_size(bytes: usize) -> String {
    const MIB: usize = 1024 * 1024;
    if bytes >= MIB {
        format!("{} MB", bytes / MIB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl From<CompressError> for HandlerError {
    fn from(err: CompressError) -> Self {
        HandlerError::Compress(err)
    }
}

impl From<MultipartRejection> for HandlerError {
    fn from(rejection: MultipartRejection) -> Self {
        HandlerError::InvalidUpload(rejection.body_text())
    }
}

/// Multipart read errors carry the body-limit rejection as well, so the
/// status decides which variant they become.
fn multipart_error(err: MultipartError, limit: usize) -> HandlerError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        HandlerError::PayloadTooLarge { limit }
    } else {
        HandlerError::InvalidUpload(err.body_text())
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Handle image compression requests.
///
/// # Endpoint
///
/// `POST /api/compress`
///
/// # Form Fields
///
/// - `image` (or `file`): the image to compress
/// - `compressionLevel` (or `level`): `low`, `medium` or `high` (default: `medium`)
///
/// # Response
///
/// `200 OK` with a JSON [`CompressResponse`].
///
/// # Errors
///
/// - `400 Bad Request`: No image, undecodable image, or malformed form
/// - `413 Payload Too Large`: Image exceeds the upload ceiling
/// - `500 Internal Server Error`: Encoding failure or unexpected fault
pub async fn compress_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HandlerError> {
    let mut multipart = multipart?;
    let limit = state.max_upload_bytes;

    let mut image: Option<Bytes> = None;
    let mut level: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        let name = field.name().unwrap_or("").to_string();

        if IMAGE_FIELDS.contains(&name.as_str()) {
            debug!(
                field = %name,
                filename = ?field.file_name(),
                content_type = ?field.content_type(),
                "Reading image field"
            );
            let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
            if data.len() > limit {
                return Err(HandlerError::PayloadTooLarge { limit });
            }
            image = Some(data);
        } else if LEVEL_FIELDS.contains(&name.as_str()) {
            level = Some(field.text().await.map_err(|e| multipart_error(e, limit))?);
        } else {
            debug!(field = %name, "Ignoring unknown form field");
        }
    }

    let bytes = match image {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => return Err(CompressError::MissingInput.into()),
    };

    let tier = CompressionTier::parse(level.as_deref());
    let result = state.service.compress(bytes, tier).await?;

    let response = (
        StatusCode::OK,
        [
            ("cache-control", "no-store".to_string()),
            ("x-compression-quality", result.quality.to_string()),
            ("x-original-size", result.original_size.to_string()),
        ],
        Json(CompressResponse::from(&result)),
    );

    Ok(response.into_response())
}

/// Health check endpoint.
///
/// # Endpoint
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// =============================================================================
// Tests
// =============================================================================
