//! Integration tests for the barscan extraction pipeline.
//!
//! The image-path tests are self-contained: they paint real QR matrices
//! in memory and run them through the full public API, including the rxing
//! backend. Tests touching the PDF path need a pdfium shared library at
//! runtime and are gated behind `BARSCAN_PDFIUM_TESTS`, so they skip
//! gracefully in environments without the native dependency.
//!
//! Run everything with:
//!   BARSCAN_PDFIUM_TESTS=1 cargo test --test decode -- --nocapture

use barscan::{decode, decode_file, inspect, DecodeError, DecodeSettings};
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

// ── Test helpers ─────────────────────────────────────────────────────────

/// Skip this test unless pdfium-backed tests were explicitly enabled.
macro_rules! skip_unless_pdfium {
    () => {
        if std::env::var("BARSCAN_PDFIUM_TESTS").is_err() {
            println!("SKIP — set BARSCAN_PDFIUM_TESTS=1 (needs a pdfium library) to run");
            return;
        }
    };
}

/// Paint a QR matrix as a crisp black-on-white raster with a quiet zone.
fn qr_raster(text: &str, module_px: u32) -> RgbImage {
    let code = qrcode::QrCode::new(text.as_bytes()).unwrap();
    let modules = code.width() as u32;
    let colors = code.to_colors();
    let quiet = 4;
    let side = (modules + 2 * quiet) * module_px;
    let mut img = RgbImage::from_pixel(side, side, Rgb([255, 255, 255]));

    for (i, color) in colors.iter().enumerate() {
        if *color == qrcode::Color::Dark {
            let x0 = (i as u32 % modules + quiet) * module_px;
            let y0 = (i as u32 / modules + quiet) * module_px;
            for dy in 0..module_px {
                for dx in 0..module_px {
                    img.put_pixel(x0 + dx, y0 + dy, Rgb([0, 0, 0]));
                }
            }
        }
    }
    img
}

fn encoded(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut Cursor::new(&mut buf), format)
        .unwrap();
    buf
}

/// A structurally valid one-page PDF with no content (and no barcodes),
/// assembled with correct xref offsets.
fn minimal_pdf() -> Vec<u8> {
    let objects = [
        "1 0 obj\n<</Type/Catalog/Pages 2 0 R>>\nendobj\n",
        "2 0 obj\n<</Type/Pages/Kids[3 0 R]/Count 1>>\nendobj\n",
        "3 0 obj\n<</Type/Page/Parent 2 0 R/MediaBox[0 0 200 200]>>\nendobj\n",
    ];

    let mut out: Vec<u8> = b"%PDF-1.4\n".to_vec();
    let mut offsets = Vec::new();
    for object in objects {
        offsets.push(out.len());
        out.extend_from_slice(object.as_bytes());
    }

    let xref_pos = out.len();
    out.extend_from_slice(b"xref\n0 4\n0000000000 65535 f \n");
    for offset in &offsets {
        out.extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
    }
    out.extend_from_slice(b"trailer\n<</Size 4/Root 1 0 R>>\nstartxref\n");
    out.extend_from_slice(xref_pos.to_string().as_bytes());
    out.extend_from_slice(b"\n%%EOF\n");
    out
}

// ── Image path (no native dependencies) ──────────────────────────────────

#[test]
fn png_with_qr_decodes_to_its_payload() {
    let bytes = encoded(&qr_raster("QR123", 8), ImageFormat::Png);
    let codes = decode(&bytes, "image/png", &DecodeSettings::default()).unwrap();
    assert_eq!(codes, vec!["QR123".to_string()]);
}

#[test]
fn jpeg_with_qr_decodes_to_its_payload() {
    let bytes = encoded(&qr_raster("JPEG-OK", 10), ImageFormat::Jpeg);
    let codes = decode(&bytes, "image/jpeg", &DecodeSettings::default()).unwrap();
    assert_eq!(codes, vec!["JPEG-OK".to_string()]);
}

#[test]
fn blank_image_is_empty_not_an_error() {
    let blank = RgbImage::from_pixel(240, 180, Rgb([255, 255, 255]));
    let bytes = encoded(&blank, ImageFormat::Png);
    let codes = decode(&bytes, "image/png", &DecodeSettings::default()).unwrap();
    assert!(codes.is_empty());
}

#[test]
fn disabled_fallback_still_finds_an_easy_symbol() {
    let bytes = encoded(&qr_raster("NO-FALLBACK", 8), ImageFormat::Png);
    let settings = DecodeSettings::new(3.5, None).unwrap();
    let codes = decode(&bytes, "image/png", &settings).unwrap();
    assert_eq!(codes, vec!["NO-FALLBACK".to_string()]);
}

#[test]
fn unsupported_media_type_fails_fast() {
    let bytes = encoded(&qr_raster("IGNORED", 8), ImageFormat::Png);
    let err = decode(&bytes, "image/gif", &DecodeSettings::default()).unwrap_err();
    assert!(matches!(err, DecodeError::UnsupportedMediaType { .. }), "{err:?}");
}

#[test]
fn corrupt_image_bytes_are_an_open_error() {
    let err = decode(b"not an image at all", "image/png", &DecodeSettings::default()).unwrap_err();
    assert!(matches!(err, DecodeError::DocumentOpen { .. }), "{err:?}");
}

#[test]
fn declared_type_gates_dispatch_not_content() {
    // PNG bytes declared as JPEG: the image layer sniffs real content, so
    // this still opens; dispatch only needed the family to be "image".
    let bytes = encoded(&qr_raster("SNIFFED", 8), ImageFormat::Png);
    let codes = decode(&bytes, "image/jpeg", &DecodeSettings::default()).unwrap();
    assert_eq!(codes, vec!["SNIFFED".to_string()]);
}

#[test]
fn inspect_reports_one_page_for_images() {
    let bytes = encoded(&qr_raster("X", 8), ImageFormat::Png);
    let info = inspect(&bytes, "image/png").unwrap();
    assert_eq!(info.page_count, 1);
}

#[test]
fn decode_file_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("code.png");
    std::fs::write(&path, encoded(&qr_raster("FROM-FILE", 8), ImageFormat::Png)).unwrap();

    let codes = decode_file(&path, "image/png", &DecodeSettings::default()).unwrap();
    assert_eq!(codes, vec!["FROM-FILE".to_string()]);
}

#[test]
fn decode_file_missing_path_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.png");
    let err = decode_file(&path, "image/png", &DecodeSettings::default()).unwrap_err();
    assert!(matches!(err, DecodeError::DocumentOpen { .. }), "{err:?}");
}

// ── PDF path (gated: needs a pdfium shared library) ──────────────────────

#[test]
fn corrupt_pdf_bytes_are_an_open_error() {
    skip_unless_pdfium!();
    let err = decode(
        b"not a real pdf",
        "application/pdf",
        &DecodeSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DecodeError::DocumentOpen { .. }), "{err:?}");
}

#[test]
fn empty_pdf_page_yields_empty_result() {
    skip_unless_pdfium!();
    let codes = decode(
        &minimal_pdf(),
        "application/pdf",
        &DecodeSettings::default(),
    )
    .unwrap();
    assert!(codes.is_empty());
}

#[test]
fn inspect_counts_pdf_pages() {
    skip_unless_pdfium!();
    let info = inspect(&minimal_pdf(), "application/pdf").unwrap();
    assert_eq!(info.page_count, 1);
}
