use crate::foundation::core::{LayerId, Rgba8};
use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::math::{clamp_percent, is_percent};

/// Content given to freshly added text layers.
pub const DEFAULT_TEXT_CONTENT: &str = "New text";
/// Font family given to freshly added text layers.
pub const DEFAULT_FONT_FAMILY: &str = "Cairo";
/// Font weights offered by the editor. Any weight in `1..=1000` is accepted.
pub const FONT_WEIGHT_CHOICES: [u16; 4] = [300, 400, 700, 900];
/// Accepted line height multipliers.
pub const LINE_HEIGHT_RANGE: std::ops::RangeInclusive<f64> = 0.5..=2.5;

/// A per-slot text layer.
///
/// Geometry is resolution independent: `x`, `y` and `max_width` are percentages of the slot
/// width/height, while `font_size`, `letter_spacing` (and the fixed shadow) are expressed in
/// reference pixels at `calibration_width`.
///
/// Equality is deep and value-sensitive; the bake state of a slot is derived from it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TextLayer {
    /// Unique id, never changed after creation.
    pub id: LayerId,
    /// Text content; whitespace separates wrap points.
    pub content: String,
    /// Anchor x as a percentage of the slot width.
    pub x: f64,
    /// Anchor y as a percentage of the slot height.
    pub y: f64,
    /// Clockwise rotation around the anchor, in degrees.
    pub rotation: f64,
    /// Font size in reference pixels.
    pub font_size: f64,
    /// Requested font family name.
    pub font_family: String,
    /// Numeric font weight.
    pub font_weight: u16,
    /// Fill color.
    pub color: Rgba8,
    /// Extra advance per character, in reference pixels.
    pub letter_spacing: f64,
    /// Line advance as a multiple of the font size.
    pub line_height: f64,
    /// Wrap width as a percentage of the slot width.
    pub max_width: f64,
    /// Hidden layers are skipped by the compositor.
    pub visible: bool,
    /// Display width (px) the reference pixels were authored against.
    pub calibration_width: f64,
}

impl TextLayer {
    /// Build a layer with the editor defaults, centered at 50/50.
    pub fn new(id: LayerId, calibration_width: f64) -> Self {
        Self {
            id,
            content: DEFAULT_TEXT_CONTENT.to_owned(),
            x: 50.0,
            y: 50.0,
            rotation: 0.0,
            font_size: 40.0,
            font_family: DEFAULT_FONT_FAMILY.to_owned(),
            font_weight: 700,
            color: Rgba8::WHITE,
            letter_spacing: 0.0,
            line_height: 1.1,
            max_width: 80.0,
            visible: true,
            calibration_width,
        }
    }

    /// Check every field invariant.
    pub fn validate(&self) -> SlideResult<()> {
        check_percent("x", self.x)?;
        check_percent("y", self.y)?;
        check_percent("max_width", self.max_width)?;
        check_finite("rotation", self.rotation)?;
        check_finite("letter_spacing", self.letter_spacing)?;
        check_positive("font_size", self.font_size)?;
        check_positive("calibration_width", self.calibration_width)?;
        check_line_height(self.line_height)?;
        check_weight(self.font_weight)?;
        check_family(&self.font_family)?;
        Ok(())
    }

    /// Replace one whole field after validating the new value.
    ///
    /// On error the layer is left untouched.
    pub fn apply(&mut self, field: TextField) -> SlideResult<()> {
        match field {
            TextField::Content(v) => self.content = v,
            TextField::X(v) => {
                check_percent("x", v)?;
                self.x = v;
            }
            TextField::Y(v) => {
                check_percent("y", v)?;
                self.y = v;
            }
            TextField::Position { x, y } => {
                check_percent("x", x)?;
                check_percent("y", y)?;
                self.x = x;
                self.y = y;
            }
            TextField::Rotation(v) => {
                check_finite("rotation", v)?;
                self.rotation = v;
            }
            TextField::FontSize(v) => {
                check_positive("font_size", v)?;
                self.font_size = v;
            }
            TextField::FontFamily(v) => {
                check_family(&v)?;
                self.font_family = v;
            }
            TextField::FontWeight(v) => {
                check_weight(v)?;
                self.font_weight = v;
            }
            TextField::Color(v) => self.color = v,
            TextField::LetterSpacing(v) => {
                check_finite("letter_spacing", v)?;
                self.letter_spacing = v;
            }
            TextField::LineHeight(v) => {
                check_line_height(v)?;
                self.line_height = v;
            }
            TextField::MaxWidth(v) => {
                check_percent("max_width", v)?;
                self.max_width = v;
            }
            TextField::Visible(v) => self.visible = v,
        }
        Ok(())
    }

    /// Detached copy placed with a new id and nudged by `+2/+2` (clamped to the slot).
    pub fn pasted_as(&self, id: LayerId) -> Self {
        let mut out = self.clone();
        out.id = id;
        out.x = clamp_percent(self.x + 2.0);
        out.y = clamp_percent(self.y + 2.0);
        out
    }
}

/// Whole-field replacement for a [`TextLayer`].
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TextField {
    /// Replace the content.
    Content(String),
    /// Replace the anchor x percentage.
    X(f64),
    /// Replace the anchor y percentage.
    Y(f64),
    /// Replace both anchor coordinates at once (drag).
    Position {
        /// Anchor x percentage.
        x: f64,
        /// Anchor y percentage.
        y: f64,
    },
    /// Replace the rotation in degrees.
    Rotation(f64),
    /// Replace the font size in reference pixels.
    FontSize(f64),
    /// Replace the font family.
    FontFamily(String),
    /// Replace the numeric weight.
    FontWeight(u16),
    /// Replace the fill color.
    Color(Rgba8),
    /// Replace the letter spacing in reference pixels.
    LetterSpacing(f64),
    /// Replace the line height multiplier.
    LineHeight(f64),
    /// Replace the wrap width percentage.
    MaxWidth(f64),
    /// Show or hide the layer.
    Visible(bool),
}

fn check_percent(name: &str, v: f64) -> SlideResult<()> {
    if !is_percent(v) {
        return Err(SlideError::validation(format!(
            "{name} must be a percentage in [0, 100], got {v}"
        )));
    }
    Ok(())
}

fn check_finite(name: &str, v: f64) -> SlideResult<()> {
    if !v.is_finite() {
        return Err(SlideError::validation(format!("{name} must be finite")));
    }
    Ok(())
}

fn check_positive(name: &str, v: f64) -> SlideResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(SlideError::validation(format!(
            "{name} must be finite and > 0, got {v}"
        )));
    }
    Ok(())
}

fn check_line_height(v: f64) -> SlideResult<()> {
    if !v.is_finite() || !LINE_HEIGHT_RANGE.contains(&v) {
        return Err(SlideError::validation(format!(
            "line_height must be in [0.5, 2.5], got {v}"
        )));
    }
    Ok(())
}

fn check_weight(v: u16) -> SlideResult<()> {
    if !(1..=1000).contains(&v) {
        return Err(SlideError::validation(format!(
            "font_weight must be in 1..=1000, got {v}"
        )));
    }
    Ok(())
}

fn check_family(v: &str) -> SlideResult<()> {
    if v.trim().is_empty() {
        return Err(SlideError::validation("font_family must be non-empty"));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/layers/text.rs"]
mod tests;
