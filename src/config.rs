//! Configuration types for barcode extraction.
//!
//! Two layers of configuration exist on purpose:
//!
//! * [`DecodeSettings`] — the per-call knobs of the pipeline itself (render
//!   scales). Immutable, validated at construction, and passed explicitly
//!   to every [`crate::decode`] call. The library never reads ambient
//!   configuration, which keeps decode calls reentrant and trivially
//!   testable.
//! * [`ServiceSettings`] — deployment policy loaded from `BARSCAN_*`
//!   environment variables: default scales plus the abuse limits (max
//!   pages, max upload sizes) a service wrapping this library should
//!   enforce *before* calling into it. The limits are policy, not pipeline
//!   behaviour, so the core accepts inputs as pre-validated.

use crate::error::DecodeError;
use crate::media::MediaType;
use std::ops::RangeInclusive;

/// Valid range for render scale factors, mirroring what the service layer
/// accepts from the environment. [`DecodeSettings::new`] itself only
/// requires positivity; the range is caller-side policy.
pub const SCALE_RANGE: RangeInclusive<f32> = 0.1..=10.0;

/// Tunable, immutable decode parameters for one `decode` call.
///
/// # Example
/// ```rust
/// use barscan::DecodeSettings;
///
/// let settings = DecodeSettings::new(3.0, Some(5.0)).unwrap();
/// assert_eq!(settings.scale(), 3.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecodeSettings {
    /// Primary render scale factor. Barcodes are usually found here.
    scale: f32,
    /// Secondary scale, tried only when the primary pass finds nothing for
    /// a page. `None` disables the second pass entirely.
    fallback_scale: Option<f32>,
}

impl DecodeSettings {
    /// Default primary scale.
    ///
    /// 3.5 is the sweet spot for documents rendered from vector sources:
    /// fine barcode modules survive, while render time and peak memory stay
    /// low. Raise it for photos of small labels; lower it for huge pages.
    pub const DEFAULT_SCALE: f32 = 3.5;

    /// Default fallback scale, paid only when the primary pass comes up
    /// empty for a page.
    pub const DEFAULT_FALLBACK_SCALE: f32 = 5.0;

    /// Create settings, rejecting non-positive or non-finite factors.
    pub fn new(scale: f32, fallback_scale: Option<f32>) -> Result<Self, DecodeError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(DecodeError::InvalidSettings(format!(
                "scale must be a positive number, got {scale}"
            )));
        }
        if let Some(fb) = fallback_scale {
            if !fb.is_finite() || fb <= 0.0 {
                return Err(DecodeError::InvalidSettings(format!(
                    "fallback scale must be a positive number, got {fb}"
                )));
            }
        }
        Ok(Self {
            scale,
            fallback_scale,
        })
    }

    /// Primary render scale factor.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Fallback render scale, if the second pass is enabled.
    pub fn fallback_scale(&self) -> Option<f32> {
        self.fallback_scale
    }
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            scale: Self::DEFAULT_SCALE,
            fallback_scale: Some(Self::DEFAULT_FALLBACK_SCALE),
        }
    }
}

/// Service-level settings loaded from `BARSCAN_*` environment variables.
///
/// Designed for container usage with sane defaults: every field has a
/// default, and an unset environment is a valid environment. Parsing or
/// range failures surface as [`DecodeError::InvalidSettings`] naming the
/// offending variable rather than being silently replaced by a default.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceSettings {
    /// Primary render scale (`BARSCAN_SCALE`, default 3.0, range 0.1–10.0).
    pub scale: f32,
    /// Fallback render scale (`BARSCAN_FALLBACK_SCALE`, default 5.0, range
    /// 0.1–10.0). The values `0`, `off` and `none` disable the fallback.
    pub fallback_scale: Option<f32>,
    /// Max pages scanned per PDF (`BARSCAN_MAX_PAGES`, default 50, min 1).
    /// Caps the work a single adversarial document can demand.
    pub max_pages: usize,
    /// Max accepted PDF size in bytes (`BARSCAN_MAX_FILE_SIZE_MB_PDF`,
    /// default 10 MB).
    pub max_pdf_bytes: u64,
    /// Max accepted image size in bytes (`BARSCAN_MAX_FILE_SIZE_MB_IMAGE`,
    /// default 6 MB).
    pub max_image_bytes: u64,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            scale: 3.0,
            fallback_scale: Some(5.0),
            max_pages: 50,
            max_pdf_bytes: 10 * 1024 * 1024,
            max_image_bytes: 6 * 1024 * 1024,
        }
    }
}

impl ServiceSettings {
    /// Load settings from the process environment.
    pub fn from_env() -> Result<Self, DecodeError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load settings through an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map so they
    /// never have to mutate process-global environment state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DecodeError> {
        let defaults = Self::default();

        let scale = match parsed(&lookup, "BARSCAN_SCALE")? {
            Some(value) => checked_scale("BARSCAN_SCALE", value)?,
            None => defaults.scale,
        };

        let fallback_scale = match lookup("BARSCAN_FALLBACK_SCALE") {
            None => defaults.fallback_scale,
            Some(raw) => match raw.trim() {
                "" | "0" | "off" | "none" => None,
                trimmed => {
                    let value: f32 = trimmed.parse().map_err(|_| invalid("BARSCAN_FALLBACK_SCALE", &raw))?;
                    Some(checked_scale("BARSCAN_FALLBACK_SCALE", value)?)
                }
            },
        };

        let max_pages: usize = parsed(&lookup, "BARSCAN_MAX_PAGES")?.unwrap_or(defaults.max_pages);
        if max_pages == 0 {
            return Err(DecodeError::InvalidSettings(
                "BARSCAN_MAX_PAGES must be at least 1".into(),
            ));
        }

        let max_pdf_mb: u64 =
            parsed(&lookup, "BARSCAN_MAX_FILE_SIZE_MB_PDF")?.unwrap_or(defaults.max_pdf_bytes >> 20);
        let max_image_mb: u64 = parsed(&lookup, "BARSCAN_MAX_FILE_SIZE_MB_IMAGE")?
            .unwrap_or(defaults.max_image_bytes >> 20);
        if max_pdf_mb == 0 || max_image_mb == 0 {
            return Err(DecodeError::InvalidSettings(
                "file size limits must be at least 1 MB".into(),
            ));
        }

        Ok(Self {
            scale,
            fallback_scale,
            max_pages,
            max_pdf_bytes: max_pdf_mb * 1024 * 1024,
            max_image_bytes: max_image_mb * 1024 * 1024,
        })
    }

    /// Per-call pipeline settings derived from this service configuration.
    pub fn decode_settings(&self) -> DecodeSettings {
        DecodeSettings {
            scale: self.scale,
            fallback_scale: self.fallback_scale,
        }
    }

    /// Upload size limit for the given media family, in bytes.
    pub fn max_bytes_for(&self, media_type: MediaType) -> u64 {
        if media_type.is_image() {
            self.max_image_bytes
        } else {
            self.max_pdf_bytes
        }
    }
}

fn parsed<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>, DecodeError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(key, &raw)),
    }
}

fn checked_scale(key: &str, value: f32) -> Result<f32, DecodeError> {
    if SCALE_RANGE.contains(&value) {
        Ok(value)
    } else {
        Err(DecodeError::InvalidSettings(format!(
            "{key} must be within {:?}, got {value}",
            SCALE_RANGE
        )))
    }
}

fn invalid(key: &str, raw: &str) -> DecodeError {
    DecodeError::InvalidSettings(format!("{key} has an invalid value '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from<'a>(pairs: &[(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn settings_reject_non_positive_scale() {
        assert!(DecodeSettings::new(0.0, None).is_err());
        assert!(DecodeSettings::new(-1.0, None).is_err());
        assert!(DecodeSettings::new(f32::NAN, None).is_err());
        assert!(DecodeSettings::new(3.5, Some(0.0)).is_err());
    }

    #[test]
    fn settings_defaults() {
        let s = DecodeSettings::default();
        assert_eq!(s.scale(), DecodeSettings::DEFAULT_SCALE);
        assert_eq!(s.fallback_scale(), Some(DecodeSettings::DEFAULT_FALLBACK_SCALE));
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let settings = ServiceSettings::from_lookup(|_| None).unwrap();
        assert_eq!(settings, ServiceSettings::default());
    }

    #[test]
    fn environment_overrides_are_applied() {
        let lookup = lookup_from(&[
            ("BARSCAN_SCALE", "2.5"),
            ("BARSCAN_FALLBACK_SCALE", "6.0"),
            ("BARSCAN_MAX_PAGES", "5"),
            ("BARSCAN_MAX_FILE_SIZE_MB_PDF", "2"),
        ]);
        let settings = ServiceSettings::from_lookup(lookup).unwrap();
        assert_eq!(settings.scale, 2.5);
        assert_eq!(settings.fallback_scale, Some(6.0));
        assert_eq!(settings.max_pages, 5);
        assert_eq!(settings.max_pdf_bytes, 2 * 1024 * 1024);
        // untouched family keeps its default
        assert_eq!(settings.max_image_bytes, 6 * 1024 * 1024);
    }

    #[test]
    fn fallback_can_be_disabled() {
        for token in ["0", "off", "none", ""] {
            let lookup = lookup_from(&[("BARSCAN_FALLBACK_SCALE", token)]);
            let settings = ServiceSettings::from_lookup(lookup).unwrap();
            assert_eq!(settings.fallback_scale, None, "token {token:?}");
        }
    }

    #[test]
    fn out_of_range_scale_is_rejected() {
        let lookup = lookup_from(&[("BARSCAN_SCALE", "42.0")]);
        let err = ServiceSettings::from_lookup(lookup).unwrap_err();
        assert!(err.to_string().contains("BARSCAN_SCALE"));
    }

    #[test]
    fn garbage_values_name_the_variable() {
        let lookup = lookup_from(&[("BARSCAN_MAX_PAGES", "many")]);
        let err = ServiceSettings::from_lookup(lookup).unwrap_err();
        assert!(err.to_string().contains("BARSCAN_MAX_PAGES"));
    }

    #[test]
    fn zero_page_limit_is_rejected() {
        let lookup = lookup_from(&[("BARSCAN_MAX_PAGES", "0")]);
        assert!(ServiceSettings::from_lookup(lookup).is_err());
    }

    #[test]
    fn decode_settings_projection() {
        let service = ServiceSettings {
            scale: 2.0,
            fallback_scale: None,
            ..ServiceSettings::default()
        };
        let decode = service.decode_settings();
        assert_eq!(decode.scale(), 2.0);
        assert_eq!(decode.fallback_scale(), None);
    }

    #[test]
    fn size_limit_by_family() {
        let settings = ServiceSettings::default();
        assert_eq!(
            settings.max_bytes_for(MediaType::Pdf),
            settings.max_pdf_bytes
        );
        assert_eq!(
            settings.max_bytes_for(MediaType::Png),
            settings.max_image_bytes
        );
    }
}
