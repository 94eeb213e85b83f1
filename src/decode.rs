//! Extraction entry points: the format dispatcher.
//!
//! [`decode`] is the one operation this library exists for: bytes plus a
//! declared media type in, decoded barcode payloads out, in page order.
//! The declared type is resolved exactly once, here, into a closed set of
//! routines — a PDF path that walks pages and an image path that treats the
//! whole frame as a single page. Both feed the same adaptive strategy, so
//! adding a format (multi-frame TIFF, say) touches only this module.
//!
//! Every call is self-contained: the pdfium document, the pixel buffers and
//! the scanner all live inside the call and are dropped before it returns.
//! Nothing is cached between invocations, so concurrent callers need no
//! coordination.

use crate::config::DecodeSettings;
use crate::error::DecodeError;
use crate::media::MediaType;
use crate::pipeline::render::{ImageFrame, PdfPageUnit};
use crate::pipeline::scan::{MultiFormatScanner, SymbolReader};
use crate::pipeline::{document, strategy};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Shape of an input, reported by [`inspect`] without any scanning work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentInfo {
    /// The recognized media type the input was inspected as.
    pub media_type: MediaType,
    /// Number of units of input: PDF page count, or 1 for an image.
    pub page_count: usize,
}

/// Extract every barcode from a document, in page order.
///
/// # Arguments
/// * `bytes` — the complete input file
/// * `declared_media_type` — what the bytes claim to be (e.g. an upload's
///   `Content-Type`); must be `application/pdf`, `image/png` or
///   `image/jpeg`
/// * `settings` — render scales for the adaptive strategy
///
/// # Returns
/// The decoded text payloads, pages in ascending order, symbols within a
/// page in the backend's detection order. An empty vector means the input
/// was valid but carried no readable symbol — that is not an error.
///
/// # Errors
/// * [`DecodeError::UnsupportedMediaType`] — declared type not recognized;
///   rejected before any rendering work
/// * [`DecodeError::DocumentOpen`] — bytes are not a valid instance of the
///   declared type
/// * [`DecodeError::Render`] / [`DecodeError::Scan`] — a page failed
///   mid-pipeline; the whole decode aborts with no partial results
pub fn decode(
    bytes: &[u8],
    declared_media_type: &str,
    settings: &DecodeSettings,
) -> Result<Vec<String>, DecodeError> {
    let media_type = recognize(declared_media_type)?;
    info!(
        "decoding {} input ({} bytes)",
        media_type,
        bytes.len()
    );

    let scanner = MultiFormatScanner::new();
    let values = match media_type {
        MediaType::Pdf => decode_pdf(bytes, &scanner, settings)?,
        MediaType::Png | MediaType::Jpeg => decode_image(bytes, &scanner, settings)?,
    };

    info!("decode complete: {} symbol(s)", values.len());
    Ok(values)
}

/// Read a file and [`decode`] it.
///
/// Convenience for CLI-style callers; the media type is still declared
/// explicitly (use [`MediaType::from_extension`] to infer one from the
/// path first).
pub fn decode_file(
    path: impl AsRef<Path>,
    declared_media_type: &str,
    settings: &DecodeSettings,
) -> Result<Vec<String>, DecodeError> {
    // Reject unknown types before touching the filesystem.
    recognize(declared_media_type)?;

    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| DecodeError::DocumentOpen {
        detail: format!("cannot read '{}': {e}", path.display()),
    })?;
    decode(&bytes, declared_media_type, settings)
}

/// Report the shape of an input — page count, no scanning.
///
/// Lets a service enforce page-count policy before committing to render
/// work, and powers the CLI's inspect mode.
pub fn inspect(bytes: &[u8], declared_media_type: &str) -> Result<DocumentInfo, DecodeError> {
    let media_type = recognize(declared_media_type)?;

    let page_count = match media_type {
        MediaType::Pdf => {
            let pdfium = document::bind_pdfium()?;
            let pdf = document::open_pdf(&pdfium, bytes)?;
            pdf.pages().len() as usize
        }
        MediaType::Png | MediaType::Jpeg => {
            document::open_image(bytes)?;
            1
        }
    };

    Ok(DocumentInfo {
        media_type,
        page_count,
    })
}

fn recognize(declared: &str) -> Result<MediaType, DecodeError> {
    MediaType::from_declared(declared).ok_or_else(|| DecodeError::UnsupportedMediaType {
        declared: declared.to_string(),
    })
}

/// PDF path: open once, walk pages lazily, strategy per page.
fn decode_pdf(
    bytes: &[u8],
    scanner: &impl SymbolReader,
    settings: &DecodeSettings,
) -> Result<Vec<String>, DecodeError> {
    let pdfium = document::bind_pdfium()?;
    let pdf = document::open_pdf(&pdfium, bytes)?;
    let pages = pdf.pages();
    let total = pages.len();
    debug!("walking {total} PDF page(s)");

    let units = (0..total).map(|index| {
        pages
            .get(index)
            .map(|page| PdfPageUnit::new(page, index as usize))
            .map_err(|e| DecodeError::Render {
                page: index as usize + 1,
                detail: format!("page handle unavailable: {e:?}"),
            })
    });

    strategy::decode_document(units, scanner, settings)
}

/// Image path: one EXIF-corrected frame, one unit of input.
fn decode_image(
    bytes: &[u8],
    scanner: &impl SymbolReader,
    settings: &DecodeSettings,
) -> Result<Vec<String>, DecodeError> {
    let frame = document::open_image(bytes)?;
    strategy::decode_unit(&ImageFrame::new(&frame), scanner, settings)
}
