//! Image format detection.
//!
//! - [`detect`] - magic-byte sniffing, header inspection and full decoding

pub mod detect;

pub use detect::{
    decode, detect_format, inspect, is_jpeg_header, is_png_header, is_webp_header, DecodedImage,
    ImageInfo, SourceFormat,
};
