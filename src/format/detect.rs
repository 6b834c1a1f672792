//! Format detection for uploaded images.
//!
//! Detection happens in two stages:
//!
//! 1. Magic bytes identify the formats that get a format-preserving
//!    re-encode: **JPEG**, **PNG** and **WebP**.
//! 2. Anything else is handed to the codec library's own sniffer. If it
//!    recognises the stream (BMP, GIF, TIFF, ...) the image is classified as
//!    [`SourceFormat::Other`]; if not, detection fails with
//!    [`CompressError::InvalidImageFormat`].
//!
//! Detection is a pure function of the input bytes.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, ImageReader};
use serde::Serialize;

use crate::error::CompressError;

// =============================================================================
// SourceFormat
// =============================================================================

/// Detected encoding of an uploaded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// JPEG / JFIF / EXIF stream
    Jpeg,

    /// PNG stream
    Png,

    /// WebP (RIFF container)
    Webp,

    /// Any other format the codec library can decode
    Other,
}

impl SourceFormat {
    /// Lowercase name used in API responses and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            SourceFormat::Jpeg => "jpeg",
            SourceFormat::Png => "png",
            SourceFormat::Webp => "webp",
            SourceFormat::Other => "other",
        }
    }
}

impl std::fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Magic Bytes
// =============================================================================

/// JPEG SOI marker followed by the start of the next marker.
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];

/// PNG file signature.
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// RIFF container tag at offset 0 of a WebP file.
const RIFF_MAGIC: &[u8] = b"RIFF";

/// Form type at offset 8 of a WebP file.
const WEBP_MAGIC: &[u8] = b"WEBP";

/// Check if the bytes start with a JPEG signature.
#[inline]
pub fn is_jpeg_header(bytes: &[u8]) -> bool {
    bytes.starts_with(JPEG_MAGIC)
}

/// Check if the bytes start with a PNG signature.
#[inline]
pub fn is_png_header(bytes: &[u8]) -> bool {
    bytes.starts_with(PNG_MAGIC)
}

/// Check if the bytes start with a RIFF/WEBP header.
#[inline]
pub fn is_webp_header(bytes: &[u8]) -> bool {
    bytes.len() >= 12 && &bytes[0..4] == RIFF_MAGIC && &bytes[8..12] == WEBP_MAGIC
}

// =============================================================================
// Detection
// =============================================================================

/// Detect the encoding of an image from its leading bytes.
///
/// # Errors
///
/// * [`CompressError::MissingInput`] if `bytes` is empty
/// * [`CompressError::InvalidImageFormat`] if no image format can be recognised,
///   or the recognised format has no decoder in this build
pub fn detect_format(bytes: &[u8]) -> Result<SourceFormat, CompressError> {
    if bytes.is_empty() {
        return Err(CompressError::MissingInput);
    }

    if is_jpeg_header(bytes) {
        return Ok(SourceFormat::Jpeg);
    }
    if is_png_header(bytes) {
        return Ok(SourceFormat::Png);
    }
    if is_webp_header(bytes) {
        return Ok(SourceFormat::Webp);
    }

    match image::guess_format(bytes) {
        Ok(format) if format.reading_enabled() => Ok(SourceFormat::Other),
        Ok(format) => Err(CompressError::InvalidImageFormat {
            reason: format!("no decoder available for {:?}", format),
        }),
        Err(_) => Err(CompressError::InvalidImageFormat {
            reason: "unrecognized image data".to_string(),
        }),
    }
}

/// Basic metadata read from an image header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageInfo {
    /// Detected source format
    pub format: SourceFormat,

    /// Format as reported by the codec library
    pub codec_format: ImageFormat,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

/// Read format and dimensions without decoding pixel data.
pub fn inspect(bytes: &[u8]) -> Result<ImageInfo, CompressError> {
    let format = detect_format(bytes)?;
    let reader = guessed_reader(bytes)?;

    let codec_format = reader.format().ok_or_else(|| CompressError::InvalidImageFormat {
        reason: "unrecognized image data".to_string(),
    })?;

    let (width, height) = reader.into_dimensions().map_err(invalid_image)?;

    Ok(ImageInfo {
        format,
        codec_format,
        width,
        height,
    })
}

// =============================================================================
// Decoding
// =============================================================================

/// A fully decoded upload together with its detected source format.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Detected source format
    pub format: SourceFormat,

    /// Decoded pixels in their native color type
    pub image: DynamicImage,
}

impl DecodedImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Whether the decoded pixels carry an alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.image.color().has_alpha()
    }
}

/// Detect the format and decode the full image.
///
/// Any decoder failure (truncated stream, unsupported variant, allocation
/// limit) is reported as [`CompressError::InvalidImageFormat`]: the input did
/// not make it past detection, so the caller is at fault.
pub fn decode(bytes: &[u8]) -> Result<DecodedImage, CompressError> {
    let format = detect_format(bytes)?;
    let image = guessed_reader(bytes)?.decode().map_err(invalid_image)?;

    Ok(DecodedImage { format, image })
}

fn guessed_reader(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, CompressError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CompressError::InvalidImageFormat {
            reason: e.to_string(),
        })
}

fn invalid_image(err: image::ImageError) -> CompressError {
    CompressError::InvalidImageFormat {
        reason: err.to_string(),
    }
}

// =============================================================================
// Tests
// =============================================================================
