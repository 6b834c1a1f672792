//! Test utilities for integration tests.
//!
//! Helpers for building test images in various formats, assembling
//! multipart request bodies and driving the router.

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine as _};
use http_body_util::BodyExt;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
use std::io::Cursor;
use tower::ServiceExt;

use imgpress::{create_router, CompressionService, RouterConfig};

/// Boundary used by [`MultipartBody`].
pub const BOUNDARY: &str = "imgpress-test-boundary";

// =============================================================================
// Test Images
// =============================================================================

/// Create a textured RGB JPEG resembling photographic content.
pub fn create_photo_jpeg(width: u32, height: u32, quality: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let n = x.wrapping_mul(2654435761) ^ y.wrapping_mul(2246822519);
        Rgb([
            ((x + ((n >> 3) & 0x3F)) % 256) as u8,
            ((y + ((n >> 9) & 0x3F)) % 256) as u8,
            (((x + y) / 2 + ((n >> 15) & 0x3F)) % 256) as u8,
        ])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(&img).unwrap();
    buf
}

/// Create an RGBA PNG whose left half is fully transparent.
pub fn create_transparent_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_fn(width, height, |x, y| {
        let alpha = if x < width / 2 { 0 } else { 255 };
        Rgba([(x * 5) as u8, (y * 5) as u8, 200, alpha])
    });
    encode(&DynamicImage::ImageRgba8(img), ImageFormat::Png)
}

/// Create a WebP (lossless, as written by the `image` crate).
pub fn create_webp(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 3) as u8, (y * 3) as u8, 90]));
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::WebP)
}

/// Create a BMP.
pub fn create_bmp(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| Rgb([(x * 2) as u8, 40, (y * 2) as u8]));
    encode(&DynamicImage::ImageRgb8(img), ImageFormat::Bmp)
}

fn encode(img: &DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).unwrap();
    buf.into_inner()
}

// =============================================================================
// Multipart Bodies
// =============================================================================

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct MultipartBody {
    data: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file part.
    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.data
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.data.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                name, filename
            )
            .as_bytes(),
        );
        self.data
            .extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
        self.data.extend_from_slice(bytes);
        self.data.extend_from_slice(b"\r\n");
        self
    }

    /// Add a text part.
    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.data
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        self.data.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
        );
        self.data.extend_from_slice(value.as_bytes());
        self.data.extend_from_slice(b"\r\n");
        self
    }

    /// Close the body.
    pub fn build(mut self) -> Vec<u8> {
        self.data
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.data
    }
}

// =============================================================================
// Router Helpers
// =============================================================================

/// Router with tracing disabled and default limits.
pub fn test_router() -> Router {
    test_router_with(RouterConfig::new().with_tracing(false))
}

/// Router with a custom configuration.
pub fn test_router_with(config: RouterConfig) -> Router {
    create_router(CompressionService::new(), config)
}

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub json: serde_json::Value,
}

/// POST a multipart body to `/api/compress`.
pub async fn post_compress(router: Router, body: Vec<u8>) -> TestResponse {
    let request = Request::builder()
        .method("POST")
        .uri("/api/compress")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    send(router, request).await
}

/// Send a request and parse the JSON response body.
pub async fn send(router: Router, request: Request<Body>) -> TestResponse {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);

    TestResponse {
        status,
        headers,
        json,
    }
}

// =============================================================================
// Validation Helpers
// =============================================================================

/// Split a `data:` URL into its MIME type and decoded payload.
pub fn decode_data_url(url: &str) -> (String, Vec<u8>) {
    let rest = url.strip_prefix("data:").expect("not a data URL");
    let (mime, payload) = rest.split_once(";base64,").expect("not a base64 data URL");
    let bytes = BASE64_STANDARD.decode(payload).expect("invalid base64 payload");
    (mime.to_string(), bytes)
}

/// Check if data is a valid JPEG.
pub fn is_valid_jpeg(data: &[u8]) -> bool {
    if data.len() < 4 {
        return false;
    }

    // SOI and EOI markers
    if data[0] != 0xFF || data[1] != 0xD8 {
        return false;
    }
    if data[data.len() - 2] != 0xFF || data[data.len() - 1] != 0xD9 {
        return false;
    }

    image::load_from_memory_with_format(data, ImageFormat::Jpeg).is_ok()
}

/// Check if data is a decodable WebP.
pub fn is_valid_webp(data: &[u8]) -> bool {
    data.len() >= 12
        && &data[0..4] == b"RIFF"
        && &data[8..12] == b"WEBP"
        && image::load_from_memory_with_format(data, ImageFormat::WebP).is_ok()
}
