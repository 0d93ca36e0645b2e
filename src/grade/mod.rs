//! Project-wide color grade.
//!
//! A grade is a named preset (a chain of CSS-style filter functions) followed by a sharpness
//! adjustment. The chain is folded into one affine color matrix and applied to the base image
//! draw only; stickers and text are never graded.

use crate::foundation::error::{SlideError, SlideResult};

/// Neutral sharpness.
pub const NEUTRAL_SHARPNESS: f64 = 100.0;
/// Accepted sharpness values.
pub const SHARPNESS_RANGE: std::ops::RangeInclusive<f64> = 0.0..=200.0;

/// One CSS filter function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FilterOp {
    /// `grayscale(amount)`.
    Grayscale(f64),
    /// `sepia(amount)`.
    Sepia(f64),
    /// `saturate(amount)`.
    Saturate(f64),
    /// `hue-rotate(deg)`.
    HueRotate(f64),
    /// `brightness(amount)`.
    Brightness(f64),
    /// `contrast(amount)`.
    Contrast(f64),
}

impl FilterOp {
    /// Matrix of this filter on straight-alpha RGB.
    pub fn matrix(self) -> ColorMatrix {
        match self {
            Self::Grayscale(a) => {
                let k = 1.0 - a.clamp(0.0, 1.0);
                ColorMatrix::rgb([
                    [0.2126 + 0.7874 * k, 0.7152 - 0.7152 * k, 0.0722 - 0.0722 * k],
                    [0.2126 - 0.2126 * k, 0.7152 + 0.2848 * k, 0.0722 - 0.0722 * k],
                    [0.2126 - 0.2126 * k, 0.7152 - 0.7152 * k, 0.0722 + 0.9278 * k],
                ])
            }
            Self::Sepia(a) => {
                let k = 1.0 - a.clamp(0.0, 1.0);
                ColorMatrix::rgb([
                    [0.393 + 0.607 * k, 0.769 - 0.769 * k, 0.189 - 0.189 * k],
                    [0.349 - 0.349 * k, 0.686 + 0.314 * k, 0.168 - 0.168 * k],
                    [0.272 - 0.272 * k, 0.534 - 0.534 * k, 0.131 + 0.869 * k],
                ])
            }
            Self::Saturate(s) => {
                let s = s.max(0.0);
                ColorMatrix::rgb([
                    [0.213 + 0.787 * s, 0.715 - 0.715 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 + 0.285 * s, 0.072 - 0.072 * s],
                    [0.213 - 0.213 * s, 0.715 - 0.715 * s, 0.072 + 0.928 * s],
                ])
            }
            Self::HueRotate(deg) => {
                let (sin, cos) = deg.to_radians().sin_cos();
                ColorMatrix::rgb([
                    [
                        0.213 + cos * 0.787 - sin * 0.213,
                        0.715 - cos * 0.715 - sin * 0.715,
                        0.072 - cos * 0.072 + sin * 0.928,
                    ],
                    [
                        0.213 - cos * 0.213 + sin * 0.143,
                        0.715 + cos * 0.285 + sin * 0.140,
                        0.072 - cos * 0.072 - sin * 0.283,
                    ],
                    [
                        0.213 - cos * 0.213 - sin * 0.787,
                        0.715 - cos * 0.715 + sin * 0.715,
                        0.072 + cos * 0.928 + sin * 0.072,
                    ],
                ])
            }
            Self::Brightness(b) => {
                let b = b.max(0.0);
                ColorMatrix::rgb([[b, 0.0, 0.0], [0.0, b, 0.0], [0.0, 0.0, b]])
            }
            Self::Contrast(c) => {
                let c = c.max(0.0);
                let o = 0.5 - 0.5 * c;
                ColorMatrix {
                    rows: [[c, 0.0, 0.0, o], [0.0, c, 0.0, o], [0.0, 0.0, c, o]],
                }
            }
        }
    }
}

/// Affine transform on straight-alpha RGB; alpha passes through.
///
/// Each row is `[r, g, b, offset]` with channels normalized to `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorMatrix {
    rows: [[f64; 4]; 3],
}

impl ColorMatrix {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ],
    };

    fn rgb(m: [[f64; 3]; 3]) -> Self {
        Self {
            rows: [
                [m[0][0], m[0][1], m[0][2], 0.0],
                [m[1][0], m[1][1], m[1][2], 0.0],
                [m[2][0], m[2][1], m[2][2], 0.0],
            ],
        }
    }

    /// `self` followed by `next`.
    pub fn then(self, next: Self) -> Self {
        let a = &next.rows;
        let b = &self.rows;
        let mut out = [[0.0; 4]; 3];
        for (i, row) in out.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate().take(3) {
                *cell = a[i][0] * b[0][j] + a[i][1] * b[1][j] + a[i][2] * b[2][j];
            }
            row[3] = a[i][0] * b[0][3] + a[i][1] * b[1][3] + a[i][2] * b[2][3] + a[i][3];
        }
        Self { rows: out }
    }

    /// Apply to one straight-alpha RGB triple (no clamping).
    pub fn apply_rgb(&self, rgb: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (o, r) in out.iter_mut().zip(&self.rows) {
            *o = r[0] * rgb[0] + r[1] * rgb[1] + r[2] * rgb[2] + r[3];
        }
        out
    }

    /// Return `true` when every coefficient is within `1e-9` of the identity.
    pub fn is_identity(&self) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(Self::IDENTITY.rows.iter().flatten())
            .all(|(a, b)| (a - b).abs() < 1e-9)
    }

    /// Row-major 4x5 RGBA matrix (the layout `feColorMatrix` uses).
    #[rustfmt::skip]
    pub fn to_rgba_4x5(&self) -> [f32; 20] {
        let r = &self.rows;
        [
            r[0][0] as f32, r[0][1] as f32, r[0][2] as f32, 0.0, r[0][3] as f32,
            r[1][0] as f32, r[1][1] as f32, r[1][2] as f32, 0.0, r[1][3] as f32,
            r[2][0] as f32, r[2][1] as f32, r[2][2] as f32, 0.0, r[2][3] as f32,
            0.0, 0.0, 0.0, 1.0, 0.0,
        ]
    }
}

/// Named grade presets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum GradePreset {
    /// No color change.
    #[default]
    Original,
    /// Warm, slightly saturated.
    WarmSun,
    /// Cool blue cast.
    IceCold,
    /// Faded sepia.
    SoftVintage,
    /// High contrast, desaturated.
    DeepCinematic,
    /// Monochrome.
    BlackAndWhite,
    /// Bright and saturated, softened contrast.
    PastelGlow,
    /// Strong hue shift.
    NeonNight,
}

impl GradePreset {
    /// Every preset in menu order.
    pub const ALL: [Self; 8] = [
        Self::Original,
        Self::WarmSun,
        Self::IceCold,
        Self::SoftVintage,
        Self::DeepCinematic,
        Self::BlackAndWhite,
        Self::PastelGlow,
        Self::NeonNight,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Original => "Original",
            Self::WarmSun => "Warm Sun",
            Self::IceCold => "Ice Cold",
            Self::SoftVintage => "Soft Vintage",
            Self::DeepCinematic => "Deep Cinematic",
            Self::BlackAndWhite => "Black & White",
            Self::PastelGlow => "Pastel Glow",
            Self::NeonNight => "Neon Night",
        }
    }

    /// Look a preset up by display name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> SlideResult<Self> {
        let needle = name.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| SlideError::validation(format!("unknown grade preset '{name}'")))
    }

    /// The preset's filter chain, in application order.
    pub fn filters(self) -> Vec<FilterOp> {
        use FilterOp::*;
        match self {
            Self::Original => vec![],
            Self::WarmSun => vec![Sepia(0.3), Saturate(1.2), HueRotate(-10.0)],
            Self::IceCold => vec![Saturate(0.8), HueRotate(180.0), Brightness(1.1)],
            Self::SoftVintage => vec![Sepia(0.5), Contrast(0.8), Brightness(1.05)],
            Self::DeepCinematic => vec![
                Contrast(1.3),
                Saturate(0.8),
                Brightness(0.9),
                HueRotate(-5.0),
            ],
            Self::BlackAndWhite => vec![Grayscale(1.0), Contrast(1.1)],
            Self::PastelGlow => vec![Brightness(1.1), Saturate(1.3), Contrast(0.9)],
            Self::NeonNight => vec![HueRotate(45.0), Saturate(1.5), Contrast(1.1)],
        }
    }
}

impl TryFrom<String> for GradePreset {
    type Error = SlideError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_name(&value)
    }
}

impl From<GradePreset> for String {
    fn from(p: GradePreset) -> Self {
        p.name().to_owned()
    }
}

/// Preset plus sharpness, applied to every slot's base image.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColorGrade {
    /// Selected preset.
    #[serde(default)]
    pub preset: GradePreset,
    /// Sharpness in `[0, 200]`; 100 is neutral.
    #[serde(default = "neutral_sharpness")]
    pub sharpness: f64,
}

fn neutral_sharpness() -> f64 {
    NEUTRAL_SHARPNESS
}

impl Default for ColorGrade {
    fn default() -> Self {
        Self {
            preset: GradePreset::Original,
            sharpness: NEUTRAL_SHARPNESS,
        }
    }
}

impl ColorGrade {
    /// Validated grade.
    pub fn new(preset: GradePreset, sharpness: f64) -> SlideResult<Self> {
        check_sharpness(sharpness)?;
        Ok(Self { preset, sharpness })
    }

    /// Full filter chain: the preset followed by the sharpness adjustment.
    ///
    /// Sharpness `s = sharpness / 100` appends `contrast(1 + (s-1)*0.2)` and
    /// `brightness(1 + (s-1)*0.05)`; at neutral sharpness nothing is appended.
    pub fn filters(&self) -> Vec<FilterOp> {
        let mut out = self.preset.filters();
        if self.sharpness != NEUTRAL_SHARPNESS {
            let s = self.sharpness / 100.0;
            out.push(FilterOp::Contrast(1.0 + (s - 1.0) * 0.2));
            out.push(FilterOp::Brightness(1.0 + (s - 1.0) * 0.05));
        }
        out
    }

    /// The chain folded into one matrix.
    pub fn matrix(&self) -> ColorMatrix {
        self.filters()
            .into_iter()
            .fold(ColorMatrix::IDENTITY, |m, f| m.then(f.matrix()))
    }

    /// Return `true` when applying the grade would not change any pixel.
    pub fn is_identity(&self) -> bool {
        self.matrix().is_identity()
    }

    /// Grade premultiplied RGBA8 pixels in place.
    pub fn apply_rgba8_premul(&self, rgba: &mut [u8]) {
        let m = self.matrix();
        if m.is_identity() {
            return;
        }
        crate::render::composite::color_matrix_rgba8_premul_in_place(rgba, m.to_rgba_4x5());
    }
}

pub(crate) fn check_sharpness(v: f64) -> SlideResult<()> {
    if !v.is_finite() || !SHARPNESS_RANGE.contains(&v) {
        return Err(SlideError::validation(format!(
            "sharpness must be in [0, 200], got {v}"
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/grade/grade.rs"]
mod tests;
