//! Barcode scanning: one multi-symbology decode pass over a pixel buffer.
//!
//! The backend is rxing (a Rust port of ZXing), driven through its
//! luminance-based multi-decode entry point. The contract this wrapper adds
//! on top of the backend is small but load-bearing:
//!
//! * "nothing found" is an empty, successful result — the backend reports
//!   it as a not-found condition, which must not surface as an error;
//! * results with empty text payloads are dropped;
//! * detection order is preserved exactly as reported — no sorting, no
//!   deduplication, no checksum re-validation.
//!
//! Any other backend fault is a real error and propagates; collapsing it
//! into an empty result would make faults indistinguishable from clean
//! pages.

use image::{imageops, RgbImage};
use thiserror::Error;
use tracing::debug;

/// A fault inside the barcode backend, reported without page context; the
/// strategy layer attaches the page number.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ScanError(pub String);

/// One multi-symbology scan pass over an RGB buffer.
///
/// Implementations must be pure: no state across calls, same buffer in,
/// same results out (up to backend nondeterminism).
pub trait SymbolReader {
    /// Decode every readable symbol, in the backend's detection order,
    /// with empty payloads already filtered out.
    fn read_all(&self, buffer: &RgbImage) -> Result<Vec<String>, ScanError>;
}

/// The production reader: rxing's multi-format, multi-symbol decoder
/// (QR, DataMatrix, PDF417, Aztec and the common 1-D retail codes).
#[derive(Debug, Default, Clone, Copy)]
pub struct MultiFormatScanner;

impl MultiFormatScanner {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolReader for MultiFormatScanner {
    fn read_all(&self, buffer: &RgbImage) -> Result<Vec<String>, ScanError> {
        let gray = imageops::grayscale(buffer);
        let (width, height) = gray.dimensions();

        let results = match rxing::helpers::detect_multiple_in_luma(gray.into_raw(), width, height)
        {
            Ok(results) => results,
            // The backend signals "no symbol anywhere" as an exception;
            // by contract that is an empty result, not a failure.
            Err(rxing::Exceptions::NotFoundException(_)) => Vec::new(),
            Err(e) => return Err(ScanError(e.to_string())),
        };

        let values: Vec<String> = results
            .iter()
            .map(|r| r.getText().to_owned())
            .filter(|text| !text.is_empty())
            .collect();

        debug!("scan pass: {} symbol(s) on {}x{} px", values.len(), width, height);
        Ok(values)
    }
}
