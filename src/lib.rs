//! # imgpress
//!
//! An image compression server.
//!
//! Upload an image, pick a compression tier, and get back a smaller
//! re-encoding of the same pixels together with size accounting.
//!
//! ## Features
//!
//! - **Format preserving**: JPEG, PNG and WebP are re-encoded in their own format
//! - **Fallback**: any other decodable format (BMP, GIF, TIFF, ...) becomes WebP
//! - **Three tiers**: `low`, `medium` and `high` compression (quality 80/60/40)
//! - **Embeddable output**: results are returned as `data:` URLs
//!
//! ## Architecture
//!
//! - [`mod@format`] - Format detection and decoding
//! - [`compress`] - Quality tiers, re-encoding and the compression pipeline
//! - [`server`] - Axum-based HTTP server and routes
//! - [`config`] - CLI and configuration types
//!
//! ## Example
//!
//! ```rust,no_run
//! use imgpress::{create_router, CompressionService, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let router = create_router(CompressionService::new(), RouterConfig::new());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod compress;
pub mod config;
pub mod error;
pub mod format;
pub mod server;

// Re-export commonly used types
pub use compress::{
    compress, resolve_quality, CompressionResult, CompressionService, CompressionTier,
    EncodedImage, ImageReencoder, OutputFormat,
};
pub use config::Config;
pub use error::CompressError;
pub use format::{decode, detect_format, inspect, DecodedImage, ImageInfo, SourceFormat};
pub use server::{
    compress_handler, create_default_router, create_router, health_handler, AppState,
    CompressResponse, ErrorResponse, HandlerError, HealthResponse, RouterConfig,
};
