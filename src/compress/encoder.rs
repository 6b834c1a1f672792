//! Format-aware image re-encoder.
//!
//! This module takes a decoded upload and re-encodes it in the format chosen
//! for its source encoding.
//!
//! # Design Decisions
//!
//! - **Format preserving**: JPEG stays JPEG, PNG stays PNG, WebP stays WebP.
//!   Every other decodable format is normalized to WebP.
//!
//! - **No pixel changes**: No resizing, cropping or color-space conversion.
//!   Only quantization and entropy coding change. The one exception is that
//!   JPEG cannot carry alpha or 16-bit samples, so those are flattened to
//!   8-bit RGB for JPEG output.
//!
//! - **JPEG at full effort**: JPEG output goes through mozjpeg with
//!   progressive scans, trellis quantization and optimized Huffman tables.
//!
//! - **PNG is lossless**: PNG output uses the maximum deflate effort with
//!   adaptive filtering. The tier quality is recorded but has no effect on
//!   the pixels.

use bytes::Bytes;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::DynamicImage;
use mozjpeg::ColorSpace;
use serde::Serialize;
use tracing::debug;
use webp::PixelLayout;

use crate::error::CompressError;
use crate::format::{DecodedImage, SourceFormat};

/// Minimum encoder quality.
pub const MIN_QUALITY: u8 = 1;

/// Maximum encoder quality.
pub const MAX_QUALITY: u8 = 100;

// =============================================================================
// Output Format
// =============================================================================

/// Encoding actually produced for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Jpeg,
    Png,
    Webp,
}

impl OutputFormat {
    /// Output format chosen for a given source format.
    ///
    /// Unrecognized sources fall back to WebP.
    pub const fn for_source(source: SourceFormat) -> Self {
        match source {
            SourceFormat::Jpeg => OutputFormat::Jpeg,
            SourceFormat::Png => OutputFormat::Png,
            SourceFormat::Webp => OutputFormat::Webp,
            SourceFormat::Other => OutputFormat::Webp,
        }
    }

    /// Lowercase format name.
    pub const fn name(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpeg",
            OutputFormat::Png => "png",
            OutputFormat::Webp => "webp",
        }
    }

    /// MIME type of the encoded output.
    pub const fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::Webp => "image/webp",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Re-encoded image bytes together with the format they are in.
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Encoded payload
    pub data: Bytes,

    /// Format of `data`
    pub format: OutputFormat,
}

// =============================================================================
// Re-encoder
// =============================================================================

/// Dispatches a decoded image to the encoder for its output format.
///
/// # Example
///
/// ```ignore
/// use imgpress::compress::ImageReencoder;
/// use imgpress::format::decode;
///
/// let decoded = decode(&upload)?;
/// let encoded = ImageReencoder::new().encode(&decoded, 60)?;
/// println!("{} bytes of {}", encoded.data.len(), encoded.format);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ImageReencoder {}

impl ImageReencoder {
    /// Create a new re-encoder.
    pub fn new() -> Self {
        Self {}
    }

    /// Re-encode `image` at `quality` (clamped to 1-100).
    ///
    /// # Errors
    ///
    /// Returns [`CompressError::EncodingFailed`] if the codec rejects the
    /// image (unsupported color type, dimensions beyond codec limits, ...).
    pub fn encode(&self, image: &DecodedImage, quality: u8) -> Result<EncodedImage, CompressError> {
        let quality = clamp_quality(quality);
        let format = OutputFormat::for_source(image.format);

        debug!(
            source_format = image.format.name(),
            output_format = format.name(),
            quality = quality,
            width = image.width(),
            height = image.height(),
            "Re-encoding image"
        );

        let data = match image.format {
            SourceFormat::Jpeg => encode_jpeg(&image.image, quality)?,
            SourceFormat::Png => encode_png(&image.image)?,
            SourceFormat::Webp => encode_webp(&image.image, quality)?,
            // Format normalization fallback
            SourceFormat::Other => encode_webp(&image.image, quality)?,
        };

        Ok(EncodedImage { data, format })
    }
}

/// Encode as progressive JPEG at `quality` with mozjpeg's size optimizations.
fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Bytes, CompressError> {
    let (width, height) = (image.width() as usize, image.height() as usize);

    let (pixels, color_space) = match image {
        DynamicImage::ImageLuma8(gray) => (gray.as_raw().clone(), ColorSpace::JCS_GRAYSCALE),
        other => (other.to_rgb8().into_raw(), ColorSpace::JCS_RGB),
    };

    let mut compress = mozjpeg::Compress::new(color_space);
    compress.set_size(width, height);
    compress.set_quality(f32::from(quality));
    compress.set_progressive_mode();
    compress.set_optimize_scans(true);
    compress.set_optimize_coding(true);

    let jpeg_error = |e: std::io::Error| CompressError::EncodingFailed {
        format: OutputFormat::Jpeg.name(),
        message: e.to_string(),
    };

    let mut started = compress
        .start_compress(Vec::new())
        .map_err(jpeg_error)?;
    started.write_scanlines(&pixels).map_err(jpeg_error)?;
    let output = started.finish().map_err(jpeg_error)?;

    Ok(Bytes::from(output))
}

/// Encode as PNG with maximum compression effort.
fn encode_png(image: &DynamicImage) -> Result<Bytes, CompressError> {
    let mut output = Vec::new();
    let encoder =
        PngEncoder::new_with_quality(&mut output, CompressionType::Best, FilterType::Adaptive);

    image
        .write_with_encoder(encoder)
        .map_err(|e| encode_error(OutputFormat::Png, e))?;

    Ok(Bytes::from(output))
}

/// Encode as lossy WebP at `quality`, keeping alpha when present.
fn encode_webp(image: &DynamicImage, quality: u8) -> Result<Bytes, CompressError> {
    let (width, height) = (image.width(), image.height());

    let (pixels, layout) = if image.color().has_alpha() {
        (image.to_rgba8().into_raw(), PixelLayout::Rgba)
    } else {
        (image.to_rgb8().into_raw(), PixelLayout::Rgb)
    };

    let encoder = webp::Encoder::new(&pixels, layout, width, height);
    let memory = encoder
        .encode_simple(false, f32::from(quality))
        .map_err(|e| CompressError::EncodingFailed {
            format: OutputFormat::Webp.name(),
            message: format!("{:?}", e),
        })?;

    Ok(Bytes::copy_from_slice(&memory))
}

fn encode_error(format: OutputFormat, err: image::ImageError) -> CompressError {
    CompressError::EncodingFailed {
        format: format.name(),
        message: err.to_string(),
    }
}

// =============================================================================
// Utility Functions
// =============================================================================

/// Clamp quality to the valid range.
///
/// Values below 1 become 1, values above 100 become 100.
#[inline]
pub fn clamp_quality(quality: u8) -> u8 {
    quality.clamp(MIN_QUALITY, MAX_QUALITY)
}

// =============================================================================
// Tests
// =============================================================================
