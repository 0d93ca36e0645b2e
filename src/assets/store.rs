use std::sync::Arc;

use crate::foundation::error::{SlideError, SlideResult};

/// Decoded raster image held in premultiplied RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Premultiplied RGBA8 bytes, row-major.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl PreparedImage {
    /// Wrap premultiplied RGBA8 bytes, checking the buffer length.
    pub fn from_premul(width: u32, height: u32, rgba8_premul: Vec<u8>) -> SlideResult<Self> {
        if width == 0 || height == 0 {
            return Err(SlideError::asset("image must have non-zero dimensions"));
        }
        let expected = (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4);
        if rgba8_premul.len() != expected {
            return Err(SlideError::asset(format!(
                "image byte len mismatch: expected {expected}, got {}",
                rgba8_premul.len()
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(rgba8_premul),
        })
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Parsed SVG document.
#[derive(Clone)]
pub struct PreparedSvg {
    /// Parsed `usvg` tree.
    pub tree: Arc<usvg::Tree>,
}

impl PreparedSvg {
    /// Intrinsic `(width, height)` of the document.
    pub fn size(&self) -> (f64, f64) {
        let s = self.tree.size();
        (f64::from(s.width()), f64::from(s.height()))
    }

    /// Width divided by height.
    pub fn aspect(&self) -> f64 {
        let (w, h) = self.size();
        if h > 0.0 { w / h } else { 1.0 }
    }
}

impl std::fmt::Debug for PreparedSvg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (w, h) = self.size();
        f.debug_struct("PreparedSvg")
            .field("width", &w)
            .field("height", &h)
            .finish()
    }
}

/// Pixels of a sticker: raster images are drawn scaled, SVGs are rasterized at draw size.
#[derive(Clone, Debug)]
pub enum StickerImage {
    /// Decoded raster image.
    Raster(PreparedImage),
    /// Vector document.
    Svg(PreparedSvg),
}

impl StickerImage {
    /// Intrinsic width divided by height.
    pub fn aspect(&self) -> f64 {
        match self {
            Self::Raster(img) => img.aspect(),
            Self::Svg(svg) => svg.aspect(),
        }
    }
}

/// Lifecycle of an asset that may still be in flight.
#[derive(Clone, Debug)]
pub enum AssetState<T> {
    /// Reserved; acquisition has not finished.
    Pending,
    /// Decoded and usable.
    Ready(T),
    /// Acquisition failed with the given message.
    Failed(String),
}

impl<T> AssetState<T> {
    /// Borrow the ready value, or report why it cannot be used. `what` names the asset.
    pub fn ready(&self, what: &str) -> SlideResult<&T> {
        match self {
            Self::Ready(v) => Ok(v),
            Self::Pending => Err(SlideError::missing_asset(format!(
                "{what} is still loading"
            ))),
            Self::Failed(msg) => Err(SlideError::asset(format!("{what} failed to load: {msg}"))),
        }
    }

    /// Return `true` while acquisition is in flight.
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
