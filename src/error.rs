//! Error types for the barscan library.
//!
//! Every failure surfaced by [`crate::decode`] is one of these kinds. The
//! taxonomy is deliberately small: either the caller handed us something we
//! do not accept ([`DecodeError::UnsupportedMediaType`],
//! [`DecodeError::InvalidSettings`]), or a specific phase of the pipeline
//! failed (open, render, scan). A document that is perfectly valid but
//! contains no barcodes is **not** an error — `decode` returns an empty
//! list for that case, so backend faults can never be confused with
//! "nothing found".
//!
//! There are no retried errors: the only retry in the pipeline is the
//! fallback-scale pass, and that triggers on empty results, never on an
//! error. Any error here aborts the whole decode of the file.

use thiserror::Error;

/// All errors returned by the barscan library.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The declared media type is not in the recognized set.
    ///
    /// Raised before any rendering work begins, so a rejected upload costs
    /// nothing beyond the string comparison.
    #[error("unsupported media type '{declared}'\nAccepted types: application/pdf, image/png, image/jpeg.")]
    UnsupportedMediaType { declared: String },

    /// The input bytes could not be parsed as a document of the declared
    /// type (corrupt, truncated, or simply the wrong format).
    #[error("input is not a readable document of the declared type: {detail}")]
    DocumentOpen { detail: String },

    /// A specific page could not be rasterised at the requested scale.
    ///
    /// `page` is 1-based for human consumption.
    #[error("page {page} could not be rendered: {detail}")]
    Render { page: usize, detail: String },

    /// The barcode backend faulted while scanning a rendered page.
    ///
    /// Distinct from "no barcodes found on page {page}", which is an empty
    /// (and successful) result.
    #[error("barcode scan failed on page {page}: {detail}")]
    Scan { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "failed to bind to the pdfium library: {detail}\n\
Install a pdfium build for your platform, or point PDFIUM_LIB_PATH at the\n\
directory containing libpdfium."
    )]
    RendererUnavailable { detail: String },

    /// Settings validation failed.
    #[error("invalid decode settings: {0}")]
    InvalidSettings(String),
}
