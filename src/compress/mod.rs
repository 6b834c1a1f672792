//! Compression layer.
//!
//! This module turns an uploaded image into a smaller re-encoding at one of
//! three quality tiers.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │              HTTP Handlers              │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │           CompressionService            │
//! │  ┌──────────────┐  ┌─────────────────┐  │
//! │  │   Quality    │  │  ImageReencoder │  │
//! │  │  (tier →     │  │  (format →      │  │
//! │  │   number)    │  │   encoder)      │  │
//! │  └──────────────┘  └─────────────────┘  │
//! └────────────────────┬────────────────────┘
//!                      │
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │        Format detection / decode        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`CompressionTier`]: `low`/`medium`/`high`, mapped to quality 80/60/40
//! - [`ImageReencoder`]: dispatches to the JPEG, PNG or WebP encoder
//! - [`CompressionResult`]: encoded payload plus size accounting
//! - [`CompressionService`]: runs the pipeline on the blocking pool
//!
//! # Example
//!
//! ```no_run
//! use imgpress::compress::{compress, CompressionTier};
//!
//! let upload = std::fs::read("photo.jpg").unwrap();
//! let result = compress(&upload, CompressionTier::parse(Some("high"))).unwrap();
//! println!("{} -> {} bytes ({})", result.original_size, result.size_bytes, result.output_format);
//! ```

mod encoder;
mod quality;
mod result;
mod service;

pub use encoder::{clamp_quality, EncodedImage, ImageReencoder, OutputFormat, MAX_QUALITY, MIN_QUALITY};
pub use quality::{
    resolve_quality, CompressionTier, HIGH_TIER_QUALITY, LOW_TIER_QUALITY, MEDIUM_TIER_QUALITY,
};
pub use result::CompressionResult;
pub use service::{compress, CompressionService};
