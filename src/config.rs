//! Configuration management for imgpress.
//!
//! Configuration comes from:
//! - Command-line arguments via clap
//! - Environment variables with the `IMGPRESS_` prefix
//! - Defaults for every setting
//!
//! # Environment Variables
//!
//! - `IMGPRESS_HOST` - Server bind address (default: 0.0.0.0)
//! - `IMGPRESS_PORT` - Server port (default: 3000)
//! - `IMGPRESS_MAX_UPLOAD_BYTES` - Largest accepted image (default: 10 MiB)
//! - `IMGPRESS_CORS_ORIGINS` - Comma-separated allowed origins (default: any)

use clap::Parser;

use crate::server::DEFAULT_MAX_UPLOAD_BYTES;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 3000;

/// Hard upper bound on the configurable upload ceiling (100 MiB).
pub const MAX_UPLOAD_CEILING: usize = 100 * 1024 * 1024;

// =============================================================================
// CLI Arguments
// =============================================================================

/// imgpress - An image compression server.
///
/// Accepts JPEG, PNG, WebP and other raster uploads and returns a smaller
/// re-encoding at a low, medium or high compression tier.
#[derive(Parser, Debug, Clone)]
#[command(name = "imgpress")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "IMGPRESS_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "IMGPRESS_PORT")]
    pub port: u16,

    // =========================================================================
    // Upload Configuration
    // =========================================================================
    /// Largest accepted image upload, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_UPLOAD_BYTES, env = "IMGPRESS_MAX_UPLOAD_BYTES")]
    pub max_upload_bytes: usize,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "IMGPRESS_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.host.trim().is_empty() {
            return Err("host must not be empty. Set --host or IMGPRESS_HOST".to_string());
        }

        if self.max_upload_bytes == 0 {
            return Err("max_upload_bytes must be greater than 0".to_string());
        }
        if self.max_upload_bytes > MAX_UPLOAD_CEILING {
            return Err(format!(
                "max_upload_bytes must not exceed {} bytes ({} MB)",
                MAX_UPLOAD_CEILING,
                MAX_UPLOAD_CEILING / (1024 * 1024)
            ));
        }

        if let Some(origins) = &self.cors_origins {
            if let Some(bad) = origins
                .iter()
                .find(|o| o.parse::<http::HeaderValue>().is_err())
            {
                return Err(format!("invalid CORS origin: {:?}", bad));
            }
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// =============================================================================
// Tests
// =============================================================================
