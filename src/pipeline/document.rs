//! Opening input bytes as a page source.
//!
//! A "document" here is whatever can hand the strategy a sequence of
//! renderable pages: a pdfium document for PDFs, or a single decoded frame
//! for raster images. Both open paths fail with
//! [`DecodeError::DocumentOpen`] *before* any page is touched when the
//! bytes do not parse as the declared format — a corrupt upload must never
//! masquerade as "no barcodes found".
//!
//! Handles follow scoped acquire/release: the pdfium document closes when
//! the returned value drops, on every exit path.

use crate::error::DecodeError;
use image::{DynamicImage, ImageDecoder, ImageReader};
use pdfium_render::prelude::*;
use std::io::Cursor;
use tracing::debug;

/// Bind to a pdfium library instance.
///
/// Resolution order: an explicit `PDFIUM_LIB_PATH` directory, then the
/// current working directory, then the system library search path.
pub fn bind_pdfium() -> Result<Pdfium, DecodeError> {
    let bindings = match std::env::var("PDFIUM_LIB_PATH") {
        Ok(dir) if !dir.is_empty() => {
            Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        }
        _ => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library()),
    };

    bindings
        .map(Pdfium::new)
        .map_err(|e| DecodeError::RendererUnavailable {
            detail: format!("{e:?}"),
        })
}

/// Open PDF bytes as a pdfium document.
///
/// The returned document borrows both the pdfium binding and the input
/// bytes, so callers keep all three in one scope for the duration of the
/// decode.
pub fn open_pdf<'a>(pdfium: &'a Pdfium, bytes: &'a [u8]) -> Result<PdfDocument<'a>, DecodeError> {
    let document =
        pdfium
            .load_pdf_from_byte_slice(bytes, None)
            .map_err(|e| DecodeError::DocumentOpen {
                detail: format!("pdfium rejected the input: {e:?}"),
            })?;

    debug!("PDF opened: {} pages", document.pages().len());
    Ok(document)
}

/// Decode image bytes into a single upright frame.
///
/// EXIF orientation is applied here, once, so every subsequent render of
/// the frame (primary and fallback scale alike) sees upright pixels.
/// Phone-camera JPEGs routinely store rotated pixel data plus an
/// orientation tag; geometric barcode detection needs the correction.
pub fn open_image(bytes: &[u8]) -> Result<DynamicImage, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::DocumentOpen {
            detail: format!("unreadable image stream: {e}"),
        })?;

    let mut decoder = reader.into_decoder().map_err(|e| DecodeError::DocumentOpen {
        detail: format!("not a decodable image: {e}"),
    })?;

    // A missing or unreadable orientation tag is not an error; the frame is
    // then taken as already upright.
    let orientation = decoder
        .orientation()
        .unwrap_or(image::metadata::Orientation::NoTransforms);

    let mut frame = DynamicImage::from_decoder(decoder).map_err(|e| DecodeError::DocumentOpen {
        detail: format!("image data is corrupt or truncated: {e}"),
    })?;
    frame.apply_orientation(orientation);

    debug!(
        "image opened: {}x{}, orientation {:?}",
        frame.width(),
        frame.height(),
        orientation
    );
    Ok(frame)
}
