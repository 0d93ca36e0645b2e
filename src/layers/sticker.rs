use crate::assets::store::{AssetState, StickerImage};
use crate::foundation::core::StickerId;
use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::math::is_percent;

/// Accepted sticker scale percentages (of the slot width).
pub const STICKER_SCALE_RANGE: std::ops::RangeInclusive<f64> = 5.0..=100.0;
/// Scale given to freshly added stickers.
pub const DEFAULT_STICKER_SCALE: f64 = 20.0;

/// A global sticker drawn on every slot, centered on its position.
#[derive(Clone, Debug)]
pub struct StickerLayer {
    /// Unique id.
    pub id: StickerId,
    /// Sticker pixels (may still be loading).
    pub image: AssetState<StickerImage>,
    /// Width as a percentage of the slot width.
    pub scale: f64,
    /// Center x as a percentage of the slot width.
    pub x: f64,
    /// Center y as a percentage of the slot height.
    pub y: f64,
}

impl StickerLayer {
    /// Sticker with default geometry (scale 20, centered).
    pub fn new(id: StickerId, image: AssetState<StickerImage>) -> Self {
        Self {
            id,
            image,
            scale: DEFAULT_STICKER_SCALE,
            x: 50.0,
            y: 50.0,
        }
    }

    /// Replace one whole field after validating the new value.
    pub fn apply(&mut self, field: StickerField) -> SlideResult<()> {
        match field {
            StickerField::Scale(v) => {
                if !v.is_finite() || !STICKER_SCALE_RANGE.contains(&v) {
                    return Err(SlideError::validation(format!(
                        "sticker scale must be in [5, 100], got {v}"
                    )));
                }
                self.scale = v;
            }
            StickerField::Position { x, y } => {
                if !is_percent(x) || !is_percent(y) {
                    return Err(SlideError::validation(format!(
                        "sticker position must be percentages in [0, 100], got ({x}, {y})"
                    )));
                }
                self.x = x;
                self.y = y;
            }
        }
        Ok(())
    }
}

/// Whole-field replacement for a [`StickerLayer`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum StickerField {
    /// Replace the width percentage.
    Scale(f64),
    /// Replace the center position.
    Position {
        /// Center x percentage.
        x: f64,
        /// Center y percentage.
        y: f64,
    },
}

#[cfg(test)]
#[path = "../../tests/unit/layers/sticker.rs"]
mod tests;
