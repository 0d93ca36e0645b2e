use crate::foundation::core::Rgba8;
use crate::foundation::error::{SlideError, SlideResult};
use crate::render::composite::unpremultiply_rgba8;
use crate::transform::scale::ShadowGeometry;

/// A rendered slot as RGBA8 pixels.
///
/// Frames are **premultiplied alpha**. The `premultiplied` flag makes this explicit at API
/// boundaries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether the `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba8(&self) -> Vec<u8> {
        if self.premultiplied {
            unpremultiply_rgba8(&self.data)
        } else {
            self.data.clone()
        }
    }

    /// Premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as a lossless PNG (straight alpha).
    pub fn encode_png(&self) -> SlideResult<Vec<u8>> {
        let rgba = image::RgbaImage::from_raw(self.width, self.height, self.to_straight_rgba8())
            .ok_or_else(|| SlideError::render("frame byte len does not match its size"))?;
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(rgba)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .map_err(|e| SlideError::render(format!("png encode failed: {e}")))?;
        Ok(out)
    }
}

/// The fixed soft drop shadow drawn under every text line.
///
/// `blur` and `offset_y` are reference pixels and scale with the layer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShadowStyle {
    /// Shadow color (straight alpha).
    pub color: Rgba8,
    /// Blur amount, reference pixels.
    pub blur: f64,
    /// Downward offset, reference pixels.
    pub offset_y: f64,
}

impl Default for ShadowStyle {
    fn default() -> Self {
        Self {
            color: Rgba8::rgba(0, 0, 0, 153),
            blur: 16.0,
            offset_y: 4.0,
        }
    }
}

impl ShadowStyle {
    pub(crate) fn geometry(&self) -> ShadowGeometry {
        ShadowGeometry {
            blur: self.blur,
            offset_y: self.offset_y,
        }
    }
}

/// Options for the CPU compositor.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderOpts {
    pub(crate) clear_rgba: Option<[u8; 4]>,
    pub(crate) shadow: ShadowStyle,
}

impl RenderOpts {
    /// Return options with a configured clear color (straight RGBA) under the base image.
    pub fn with_clear_rgba(mut self, clear: Option<[u8; 4]>) -> Self {
        self.clear_rgba = clear;
        self
    }

    /// Return options with a different text shadow.
    pub fn with_shadow(mut self, shadow: ShadowStyle) -> Self {
        self.shadow = shadow;
        self
    }

    /// The configured text shadow.
    pub fn shadow(&self) -> ShadowStyle {
        self.shadow
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
