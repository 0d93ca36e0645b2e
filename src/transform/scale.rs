//! Resolution independence: percentages and reference pixels to target pixels.
//!
//! Every absolute quantity authored in reference pixels is multiplied by
//! `target_width / calibration_width`; every percentage is taken of the target width or height.
//! Rendering the same layer at `W` and `2W` therefore yields the same composition at twice the
//! pixel size.

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{SlideError, SlideResult};
use crate::layers::sticker::StickerLayer;
use crate::layers::text::TextLayer;

/// Pixel dimensions of the surface a slot is being rendered onto.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleContext {
    /// Target width in pixels.
    pub width: f64,
    /// Target height in pixels.
    pub height: f64,
}

/// Shadow geometry in reference pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowGeometry {
    /// Blur amount (CSS `shadowBlur`).
    pub blur: f64,
    /// Vertical offset, device space.
    pub offset_y: f64,
}

/// A text layer's absolute quantities resolved for one target size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledText {
    /// `target_width / calibration_width`.
    pub multiplier: f64,
    /// Anchor in target pixels.
    pub anchor: Point,
    /// Font size in target pixels.
    pub font_px: f64,
    /// Letter spacing in target pixels.
    pub letter_spacing_px: f64,
    /// Distance between consecutive baselines.
    pub line_height_px: f64,
    /// Wrap width in target pixels.
    pub max_width_px: f64,
    /// Shadow blur in target pixels.
    pub shadow_blur_px: f64,
    /// Shadow y-offset in target pixels.
    pub shadow_offset_px: f64,
}

impl ScaleContext {
    /// Context for a `width x height` surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: f64::from(width),
            height: f64::from(height),
        }
    }

    /// Scale factor from reference pixels authored at `calibration_width`.
    pub fn multiplier(&self, calibration_width: f64) -> SlideResult<f64> {
        if !calibration_width.is_finite() || calibration_width <= 0.0 {
            return Err(SlideError::validation(format!(
                "calibration width must be finite and > 0, got {calibration_width}"
            )));
        }
        Ok(self.width / calibration_width)
    }

    /// Percentage position to target pixels.
    pub fn anchor(&self, x: f64, y: f64) -> Point {
        Point::new(x / 100.0 * self.width, y / 100.0 * self.height)
    }

    /// Resolve a text layer's geometry for this surface.
    pub fn text(&self, layer: &TextLayer, shadow: ShadowGeometry) -> SlideResult<ScaledText> {
        let s = self.multiplier(layer.calibration_width)?;
        let font_px = layer.font_size * s;
        Ok(ScaledText {
            multiplier: s,
            anchor: self.anchor(layer.x, layer.y),
            font_px,
            letter_spacing_px: layer.letter_spacing * s,
            line_height_px: layer.line_height * font_px,
            max_width_px: layer.max_width / 100.0 * self.width,
            shadow_blur_px: shadow.blur * s,
            shadow_offset_px: shadow.offset_y * s,
        })
    }

    /// Draw rect of a sticker whose intrinsic width/height ratio is `aspect`.
    pub fn sticker_rect(&self, sticker: &StickerLayer, aspect: f64) -> SlideResult<Rect> {
        if !aspect.is_finite() || aspect <= 0.0 {
            return Err(SlideError::validation(format!(
                "sticker {} has a degenerate aspect ratio",
                sticker.id.0
            )));
        }
        let w = sticker.scale / 100.0 * self.width;
        let h = w / aspect;
        let c = self.anchor(sticker.x, sticker.y);
        Ok(Rect::new(
            c.x - w / 2.0,
            c.y - h / 2.0,
            c.x + w / 2.0,
            c.y + h / 2.0,
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/transform/scale.rs"]
mod tests;
