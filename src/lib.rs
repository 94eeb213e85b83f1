//! # barscan
//!
//! Extract barcode payloads (QR, DataMatrix, common 1-D retail codes) from
//! PDF documents and raster images.
//!
//! ## Why this crate?
//!
//! Barcodes on scanned paperwork rarely sit at a friendly resolution: a
//! shipping label rendered from a PDF at 72 DPI loses the fine modules a
//! decoder needs, while blindly rendering everything huge wastes time and
//! memory on the 95% of pages that decode fine small. barscan renders each
//! page at a cheap primary scale and pays for a second, larger render only
//! when a page yields nothing — bounding the common case to one
//! render+scan pair while still recovering hard pages.
//!
//! ## Pipeline Overview
//!
//! ```text
//! bytes + declared media type
//!  │
//!  ├─ 1. Dispatch  recognize application/pdf | image/png | image/jpeg
//!  ├─ 2. Open      pdfium document, or EXIF-corrected image frame
//!  ├─ 3. Render    RGB buffer at the primary scale (bicubic resampling)
//!  ├─ 4. Scan      one multi-symbology pass (rxing)
//!  ├─ 5. Fallback  re-render larger, only if a page found nothing
//!  └─ 6. Collect   payloads concatenated in page order
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use barscan::{decode, DecodeSettings};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes = std::fs::read("invoice.pdf")?;
//!     let codes = decode(&bytes, "application/pdf", &DecodeSettings::default())?;
//!     for code in codes {
//!         println!("{code}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! An empty result means "no barcodes found" — corrupt input, unknown
//! media types and backend faults are all distinct [`DecodeError`]s, never
//! silent emptiness.
//!
//! Every call is synchronous, stateless and reentrant; run concurrent
//! decodes from your own worker pool without coordination. PDF support
//! needs a pdfium shared library at runtime (system-installed or via
//! `PDFIUM_LIB_PATH`); image inputs have no native dependency.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `barscan` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! barscan = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod decode;
pub mod error;
pub mod media;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DecodeSettings, ServiceSettings, SCALE_RANGE};
pub use decode::{decode, decode_file, inspect, DocumentInfo};
pub use error::DecodeError;
pub use media::MediaType;
pub use pipeline::render::RenderUnit;
pub use pipeline::scan::{MultiFormatScanner, ScanError, SymbolReader};
pub use pipeline::strategy::{decode_document, decode_unit};
