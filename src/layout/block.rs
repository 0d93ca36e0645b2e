use crate::fonts::{FontBook, FontRequest};
use crate::foundation::core::{Affine, LayerId, Point, Rect};
use crate::foundation::error::SlideResult;
use crate::layers::text::TextLayer;
use crate::layout::wrap::wrap_text;
use crate::transform::affine::layer_transform;
use crate::transform::scale::{ScaleContext, ScaledText, ShadowGeometry};

/// One wrapped line with its position inside the block.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    /// Line text.
    pub text: String,
    /// Measured advance width in target pixels.
    pub width: f64,
    /// Vertical offset of the line's middle from the anchor, in layer space.
    pub offset_y: f64,
}

/// A text layer laid out for one target size.
///
/// Layer space has its origin at the anchor and is rotated with the layer. Lines are centered
/// horizontally on `x = 0` and the block is centered vertically on `y = 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct TextPlacement {
    /// Layer this placement belongs to.
    pub layer: LayerId,
    /// Rotation in degrees.
    pub rotation_deg: f64,
    /// Resolved quantities.
    pub scaled: ScaledText,
    /// Wrapped lines, top to bottom. Never empty.
    pub lines: Vec<PlacedLine>,
}

impl TextPlacement {
    /// Layer space to target pixels.
    pub fn transform(&self) -> Affine {
        layer_transform(self.scaled.anchor, self.rotation_deg)
    }

    /// Middle of line `i` in target pixels.
    pub fn line_center(&self, i: usize) -> Option<Point> {
        let line = self.lines.get(i)?;
        Some(self.transform() * Point::new(0.0, line.offset_y))
    }

    /// Em box of line `i` in layer space.
    pub fn line_box(&self, i: usize) -> Option<Rect> {
        let line = self.lines.get(i)?;
        let half_h = self.scaled.font_px / 2.0;
        Some(Rect::new(
            -line.width / 2.0,
            line.offset_y - half_h,
            line.width / 2.0,
            line.offset_y + half_h,
        ))
    }

    /// Union of all line boxes in layer space.
    pub fn local_bounds(&self) -> Rect {
        (0..self.lines.len())
            .filter_map(|i| self.line_box(i))
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::ZERO)
    }

    /// Axis-aligned bounds in target pixels.
    pub fn device_bounds(&self) -> Rect {
        self.transform().transform_rect_bbox(self.local_bounds())
    }

    /// Return `true` when `p` (target pixels) falls inside any line box.
    pub fn contains(&self, p: Point) -> bool {
        let local = self.transform().inverse() * p;
        (0..self.lines.len())
            .filter_map(|i| self.line_box(i))
            .any(|r| r.contains(local))
    }
}

/// Offsets of `count` line middles around the anchor: `i*lh - lh*(count-1)/2`.
pub fn line_offsets(count: usize, line_height_px: f64) -> Vec<f64> {
    let total = line_height_px * count.saturating_sub(1) as f64;
    (0..count)
        .map(|i| i as f64 * line_height_px - total / 2.0)
        .collect()
}

/// Wrap and place one text layer at the size described by `ctx`.
///
/// Preview and export both go through this function, so their line breaks only differ if the
/// font state differs.
pub fn place_text(
    layer: &TextLayer,
    ctx: &ScaleContext,
    shadow: ShadowGeometry,
    fonts: &mut FontBook,
) -> SlideResult<TextPlacement> {
    let scaled = ctx.text(layer, shadow)?;
    let req = FontRequest {
        family: &layer.font_family,
        weight: layer.font_weight,
        font_px: scaled.font_px,
        letter_spacing_px: scaled.letter_spacing_px,
    };

    let texts = wrap_text(&layer.content, |s| fonts.measure(&req, s), scaled.max_width_px);
    let offsets = line_offsets(texts.len(), scaled.line_height_px);
    let lines = texts
        .into_iter()
        .zip(offsets)
        .map(|(text, offset_y)| PlacedLine {
            width: fonts.measure(&req, &text),
            text,
            offset_y,
        })
        .collect();

    Ok(TextPlacement {
        layer: layer.id,
        rotation_deg: layer.rotation,
        scaled,
        lines,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/block.rs"]
mod tests;
