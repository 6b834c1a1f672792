//! HTTP server layer for imgpress.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │                     POST /api/compress                          │
//! │                                                                 │
//! │  ┌──────────────────────────┐  ┌─────────────────────────────┐  │
//! │  │        handlers          │  │           routes            │  │
//! │  │ (multipart, error map)   │  │ (body limit, CORS, tracing) │  │
//! │  └──────────────────────────┘  └─────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    compress_handler, health_handler, AppState, CompressResponse, ErrorResponse, HandlerError,
    HealthResponse, DEFAULT_MAX_UPLOAD_BYTES,
};
pub use routes::{create_default_router, create_router, RouterConfig, MULTIPART_OVERHEAD_BYTES};
