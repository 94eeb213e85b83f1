//! Rasterisation: one unit of input → RGB pixel buffer at a scale factor.
//!
//! ## Why a trait?
//!
//! The retry strategy needs exactly one capability from a page: "render
//! yourself at scale S". Expressing that as [`RenderUnit`] lets PDF pages
//! and image frames flow through the same strategy code, and lets tests
//! substitute counting stubs to pin down how many renders a policy incurs.
//!
//! ## Why CatmullRom?
//!
//! Upscaling a barcode is about preserving module *edges*. Nearest and box
//! filters alias those edges and measurably reduce decode rates on small
//! symbols, so resizing always goes through a bicubic-class filter.

use crate::error::DecodeError;
use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};
use pdfium_render::prelude::*;
use tracing::debug;

/// One renderable unit of input: a PDF page or an image frame.
pub trait RenderUnit {
    /// Zero-based position of this unit within its document.
    fn index(&self) -> usize;

    /// Rasterise at `scale` into an 8-bit RGB buffer.
    ///
    /// `scale` must be positive; implementations clamp output dimensions to
    /// at least 1×1 rather than producing a zero-area buffer.
    fn render(&self, scale: f32) -> Result<RgbImage, DecodeError>;
}

/// A single page of an open pdfium document.
pub struct PdfPageUnit<'a> {
    page: PdfPage<'a>,
    index: usize,
}

impl<'a> PdfPageUnit<'a> {
    pub fn new(page: PdfPage<'a>, index: usize) -> Self {
        Self { page, index }
    }
}

impl RenderUnit for PdfPageUnit<'_> {
    fn index(&self) -> usize {
        self.index
    }

    fn render(&self, scale: f32) -> Result<RgbImage, DecodeError> {
        check_scale(self.index, scale)?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap =
            self.page
                .render_with_config(&render_config)
                .map_err(|e| DecodeError::Render {
                    page: self.index + 1,
                    detail: format!("{e:?}"),
                })?;

        let buffer = bitmap.as_image().to_rgb8();
        debug!(
            "rendered page {} at x{scale} -> {}x{} px",
            self.index + 1,
            buffer.width(),
            buffer.height()
        );
        Ok(buffer)
    }
}

/// The one frame of a raster-image input, already EXIF-corrected by the
/// document layer.
pub struct ImageFrame<'a> {
    frame: &'a DynamicImage,
}

impl<'a> ImageFrame<'a> {
    pub fn new(frame: &'a DynamicImage) -> Self {
        Self { frame }
    }
}

impl RenderUnit for ImageFrame<'_> {
    fn index(&self) -> usize {
        0
    }

    fn render(&self, scale: f32) -> Result<RgbImage, DecodeError> {
        check_scale(0, scale)?;
        Ok(resize_by_factor(self.frame, scale))
    }
}

/// Resize by a scale factor with a bicubic-class filter, flattening any
/// source color space to RGB.
///
/// Target dimensions round to the nearest pixel and clamp to a minimum of
/// 1, so extreme downscales of narrow images stay valid buffers. A factor
/// of exactly 1.0 skips the resample — a pure pass-through.
pub(crate) fn resize_by_factor(frame: &DynamicImage, factor: f32) -> RgbImage {
    if factor == 1.0 {
        return frame.to_rgb8();
    }

    let width = (((frame.width() as f32) * factor).round() as u32).max(1);
    let height = (((frame.height() as f32) * factor).round() as u32).max(1);
    frame
        .resize_exact(width, height, FilterType::CatmullRom)
        .to_rgb8()
}

fn check_scale(index: usize, scale: f32) -> Result<(), DecodeError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(DecodeError::Render {
            page: index + 1,
            detail: format!("scale factor must be positive, got {scale}"),
        })
    }
}
