//! The recognized media-type set and how inputs declare themselves.
//!
//! Dispatch happens on the *declared* type, not on sniffed content: the
//! caller (an upload handler, the CLI) tells us what the bytes claim to be,
//! and anything outside the closed set below is rejected before any
//! rendering work. Whether the bytes actually parse as that type is decided
//! later by the document layer, which reports a
//! [`crate::DecodeError::DocumentOpen`] on mismatch.

use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Media types the extraction pipeline accepts.
///
/// Adding a format (say, multi-frame TIFF) means adding a variant here and
/// a matching arm in the dispatcher — the strategy and scanner stay
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    /// `application/pdf` — multi-page, rendered via pdfium.
    Pdf,
    /// `image/png` — single frame.
    Png,
    /// `image/jpeg` — single frame, commonly carrying EXIF orientation.
    Jpeg,
}

impl MediaType {
    /// Parse a declared media type, e.g. from a `Content-Type` value.
    ///
    /// Comparison is case-insensitive and ignores any `;`-separated
    /// parameters (`image/png; charset=binary` is still PNG). Returns
    /// `None` for anything outside the recognized set.
    pub fn from_declared(declared: &str) -> Option<Self> {
        let essence = declared.split(';').next().unwrap_or("").trim();
        match essence.to_ascii_lowercase().as_str() {
            "application/pdf" => Some(Self::Pdf),
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Infer a media type from a file extension (CLI convenience).
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "png" => Some(Self::Png),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Canonical media-type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// True for the single-frame raster family.
    pub fn is_image(&self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
