//! Pipeline stages for document-to-barcode extraction.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. switch the barcode backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! document ──▶ render ──▶ scan ──▶ strategy
//! (pdfium /    (RGB at    (multi-   (fallback-scale
//!  image)       scale S)   symbology) retry, ordering)
//! ```
//!
//! 1. [`document`] — open input bytes as a page source: pdfium for PDFs, an
//!    EXIF-corrected frame for raster images
//! 2. [`render`]   — rasterise one unit of input to an RGB buffer at a
//!    requested scale factor
//! 3. [`scan`]     — run one multi-symbology decode pass over the buffer
//! 4. [`strategy`] — the retry policy: re-render at the fallback scale only
//!    when a unit yielded nothing, and keep page order stable

pub mod document;
pub mod render;
pub mod scan;
pub mod strategy;
