//! Compression pipeline.
//!
//! A request flows through four stages, strictly in order:
//!
//! ```text
//! ┌──────────┐   ┌──────────┐   ┌──────────────┐   ┌──────────────┐
//! │  detect  │──▶│ quality  │──▶│  re-encode   │──▶│   assemble   │
//! │ + decode │   │ for tier │   │ (per format) │   │    result    │
//! └──────────┘   └──────────┘   └──────────────┘   └──────────────┘
//! ```
//!
//! There are no retries and no state shared between requests.

use bytes::Bytes;
use tracing::{debug, info};

use crate::error::CompressError;
use crate::format::decode;

use super::encoder::ImageReencoder;
use super::quality::CompressionTier;
use super::result::CompressionResult;

/// Compress `bytes` at the given tier.
///
/// This is the whole pipeline as a pure function of its inputs. It blocks on
/// CPU-bound decode/encode work.
///
/// # Errors
///
/// - [`CompressError::MissingInput`] for an empty payload
/// - [`CompressError::InvalidImageFormat`] if the payload is not a decodable image
/// - [`CompressError::EncodingFailed`] if re-encoding fails
pub fn compress(bytes: &[u8], tier: CompressionTier) -> Result<CompressionResult, CompressError> {
    if bytes.is_empty() {
        return Err(CompressError::MissingInput);
    }

    compress_with(&ImageReencoder::new(), bytes, tier)
}

/// Callers reject empty payloads before getting here.
fn compress_with(
    encoder: &ImageReencoder,
    bytes: &[u8],
    tier: CompressionTier,
) -> Result<CompressionResult, CompressError> {
    let image = decode(bytes)?;
    let quality = tier.quality();

    debug!(
        source_format = image.format.name(),
        tier = tier.name(),
        quality = quality,
        "Decoded upload"
    );

    let encoded = encoder.encode(&image, quality)?;

    Ok(CompressionResult::assemble(
        encoded,
        image.format,
        bytes.len(),
        quality,
        (image.width(), image.height()),
    ))
}

/// Async front end for the compression pipeline.
///
/// Runs [`compress`] on Tokio's blocking pool so encode work does not stall
/// the runtime's worker threads.
///
/// # Example
///
/// ```ignore
/// use imgpress::compress::{CompressionService, CompressionTier};
///
/// let service = CompressionService::new();
/// let result = service.compress(upload, CompressionTier::High).await?;
/// println!("{} -> {} bytes", result.original_size, result.size_bytes);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompressionService {
    encoder: ImageReencoder,
}

impl CompressionService {
    /// Create a new compression service.
    pub fn new() -> Self {
        Self {
            encoder: ImageReencoder::new(),
        }
    }

    /// Compress an upload on the blocking pool.
    ///
    /// A panic inside a codec surfaces as [`CompressError::UnexpectedFailure`].
    pub async fn compress(
        &self,
        bytes: Bytes,
        tier: CompressionTier,
    ) -> Result<CompressionResult, CompressError> {
        if bytes.is_empty() {
            return Err(CompressError::MissingInput);
        }

        let encoder = self.encoder.clone();
        let result = tokio::task::spawn_blocking(move || compress_with(&encoder, &bytes, tier))
            .await
            .map_err(|e| CompressError::UnexpectedFailure(e.to_string()))??;

        info!(
            source_format = result.source_format.name(),
            output_format = result.output_format.name(),
            tier = tier.name(),
            quality = result.quality,
            original_size = result.original_size,
            size = result.size_bytes,
            "Compressed image"
        );

        Ok(result)
    }
}
