//! Result packaging for a compression request.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use bytes::Bytes;

use crate::format::SourceFormat;

use super::encoder::{EncodedImage, OutputFormat};

/// Outcome of one compression request.
#[derive(Debug, Clone)]
pub struct CompressionResult {
    /// Re-encoded payload
    pub encoded_bytes: Bytes,

    /// Detected input encoding
    pub source_format: SourceFormat,

    /// Encoding actually produced
    pub output_format: OutputFormat,

    /// Length of `encoded_bytes`
    pub size_bytes: usize,

    /// Length of the uploaded payload
    pub original_size: usize,

    /// Encoder quality that was applied
    pub quality: u8,

    /// Image width in pixels (unchanged by compression)
    pub width: u32,

    /// Image height in pixels (unchanged by compression)
    pub height: u32,
}

impl CompressionResult {
    /// Package an encoded image. No validation or transformation happens here.
    pub fn assemble(
        encoded: EncodedImage,
        source_format: SourceFormat,
        original_size: usize,
        quality: u8,
        (width, height): (u32, u32),
    ) -> Self {
        let size_bytes = encoded.data.len();
        Self {
            encoded_bytes: encoded.data,
            source_format,
            output_format: encoded.format,
            size_bytes,
            original_size,
            quality,
            width,
            height,
        }
    }

    /// MIME type of the encoded payload.
    pub fn mime_type(&self) -> &'static str {
        self.output_format.mime_type()
    }

    /// `data:` URL embedding the payload, usable directly as an image source.
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type(),
            BASE64_STANDARD.encode(&self.encoded_bytes)
        )
    }

    /// Output size divided by input size (below 1.0 means the image shrank).
    pub fn compression_ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 1.0;
        }
        self.size_bytes as f64 / self.original_size as f64
    }

    /// Bytes saved relative to the upload; negative if the output grew.
    pub fn bytes_saved(&self) -> i64 {
        self.original_size as i64 - self.size_bytes as i64
    }
}
