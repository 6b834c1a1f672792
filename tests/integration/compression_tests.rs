//! Pipeline tests against the library API.
//!
//! Tests verify:
//! - Quality mapping for every tier, including the inverted high/low semantics
//! - Format fidelity (jpeg/png/webp preserved, everything else to webp)
//! - Detection is stable and rejects non-images without output

use imgpress::{
    compress, detect_format, inspect, resolve_quality, CompressError, CompressionService,
    CompressionTier, OutputFormat, SourceFormat,
};

use super::test_utils::{create_bmp, create_photo_jpeg, create_transparent_png, create_webp};

#[test]
fn test_quality_mapping_table() {
    assert_eq!(resolve_quality("low"), 80);
    assert_eq!(resolve_quality("medium"), 60);
    assert_eq!(resolve_quality("high"), 40);
    assert_eq!(resolve_quality("maximum"), 60);
    assert_eq!(resolve_quality(""), 60);
}

#[test]
fn test_format_fidelity() {
    let cases = [
        (create_photo_jpeg(40, 40, 90), SourceFormat::Jpeg, OutputFormat::Jpeg),
        (create_transparent_png(40, 40), SourceFormat::Png, OutputFormat::Png),
        (create_webp(40, 40), SourceFormat::Webp, OutputFormat::Webp),
        (create_bmp(40, 40), SourceFormat::Other, OutputFormat::Webp),
    ];

    for (bytes, source, output) in cases {
        let result = compress(&bytes, CompressionTier::Medium).unwrap();
        assert_eq!(result.source_format, source);
        assert_eq!(result.output_format, output);
        assert_eq!(result.size_bytes, result.encoded_bytes.len());
        assert_eq!(detect_format(&result.encoded_bytes).unwrap(), match output {
            OutputFormat::Jpeg => SourceFormat::Jpeg,
            OutputFormat::Png => SourceFormat::Png,
            OutputFormat::Webp => SourceFormat::Webp,
        });
    }
}

#[test]
fn test_photographic_jpeg_size_monotonic() {
    let source = create_photo_jpeg(320, 240, 95);

    let high = compress(&source, CompressionTier::High).unwrap();
    let medium = compress(&source, CompressionTier::Medium).unwrap();
    let low = compress(&source, CompressionTier::Low).unwrap();

    assert!(high.size_bytes <= medium.size_bytes);
    assert!(medium.size_bytes <= low.size_bytes);
}

#[test]
fn test_detection_is_idempotent() {
    for bytes in [
        create_photo_jpeg(16, 16, 90),
        create_transparent_png(16, 16),
        create_webp(16, 16),
        create_bmp(16, 16),
    ] {
        assert_eq!(detect_format(&bytes).unwrap(), detect_format(&bytes).unwrap());
    }
}

#[test]
fn test_inspect_reports_dimensions() {
    let info = inspect(&create_bmp(21, 13)).unwrap();
    assert_eq!(info.format, SourceFormat::Other);
    assert_eq!((info.width, info.height), (21, 13));
}

#[test]
fn test_rejects_non_image() {
    let err = compress(b"<html><body>hello</body></html>", CompressionTier::Low).unwrap_err();
    assert!(matches!(err, CompressError::InvalidImageFormat { .. }));
}

#[test]
fn test_dimensions_unchanged() {
    let source = create_photo_jpeg(123, 77, 90);
    let result = compress(&source, CompressionTier::High).unwrap();

    let info = inspect(&result.encoded_bytes).unwrap();
    assert_eq!((info.width, info.height), (123, 77));
    assert_eq!((result.width, result.height), (123, 77));
}

#[tokio::test]
async fn test_concurrent_requests_are_independent() {
    let service = CompressionService::new();
    let jpeg = bytes::Bytes::from(create_photo_jpeg(64, 64, 90));
    let png = bytes::Bytes::from(create_transparent_png(64, 64));

    let (a, b, c) = tokio::join!(
        service.compress(jpeg.clone(), CompressionTier::High),
        service.compress(png.clone(), CompressionTier::Low),
        service.compress(jpeg.clone(), CompressionTier::Low),
    );

    let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());
    assert_eq!(a.output_format, OutputFormat::Jpeg);
    assert_eq!(a.quality, 40);
    assert_eq!(b.output_format, OutputFormat::Png);
    assert_eq!(b.quality, 80);
    assert_eq!(c.quality, 80);
    assert!(a.size_bytes <= c.size_bytes);
}
