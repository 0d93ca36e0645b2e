use std::sync::Arc;

use anyhow::Context;

use crate::assets::store::{PreparedImage, PreparedSvg, StickerImage};
use crate::assets::svg_raster::rasterize_svg_to_premul_rgba8;
use crate::foundation::error::{SlideError, SlideResult};

/// What an upload is for; selects the downsizing limit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadKind {
    /// A slot's base photograph.
    BaseImage,
    /// A global sticker.
    Sticker,
}

/// Pixels produced by an image acquisition.
#[derive(Clone, Debug)]
pub enum DecodedPixels {
    /// Premultiplied raster pixels.
    Raster(PreparedImage),
    /// A vector document, kept as a tree.
    Svg(PreparedSvg),
}

/// Result of acquiring one uploaded image.
#[derive(Clone, Debug)]
pub struct DecodedImage {
    /// Decoded pixels.
    pub pixels: DecodedPixels,
    /// Detected MIME type of the uploaded bytes.
    pub mime_type: String,
    /// Width in pixels after downsizing (intrinsic width for SVG).
    pub width: u32,
    /// Height in pixels after downsizing (intrinsic height for SVG).
    pub height: u32,
    /// Size of the uploaded bytes.
    pub byte_len: usize,
}

impl DecodedImage {
    /// Raster pixels for a base image. SVG uploads are rasterized at their intrinsic size.
    pub fn into_raster(self) -> SlideResult<PreparedImage> {
        match self.pixels {
            DecodedPixels::Raster(img) => Ok(img),
            DecodedPixels::Svg(svg) => {
                let px = rasterize_svg_to_premul_rgba8(&svg.tree, self.width, self.height)?;
                PreparedImage::from_premul(self.width, self.height, px)
            }
        }
    }

    /// Sticker pixels; SVG stays vector so it can be rasterized at draw size.
    pub fn into_sticker(self) -> StickerImage {
        match self.pixels {
            DecodedPixels::Raster(img) => StickerImage::Raster(img),
            DecodedPixels::Svg(svg) => StickerImage::Svg(svg),
        }
    }
}

/// Image acquisition collaborator: raw upload bytes in, decoded pixels out.
pub trait ImageAcquirer {
    /// Decode `bytes` for the given use. Failures are upload-level [`SlideError::Asset`] errors.
    fn acquire(&self, bytes: &[u8], kind: UploadKind) -> SlideResult<DecodedImage>;
}

/// [`ImageAcquirer`] backed by the `image` crate (raster) and `usvg` (SVG).
///
/// Raster uploads larger than the limit for their [`UploadKind`] are downsized to fit,
/// keeping the aspect ratio.
#[derive(Clone, Copy, Debug)]
pub struct ImageDecoder {
    base_max_edge: u32,
    sticker_max_edge: u32,
}

impl Default for ImageDecoder {
    fn default() -> Self {
        Self {
            base_max_edge: 2048,
            sticker_max_edge: 1024,
        }
    }
}

impl ImageDecoder {
    /// Decoder with explicit downsizing limits (longest edge, in pixels).
    pub fn new(base_max_edge: u32, sticker_max_edge: u32) -> Self {
        Self {
            base_max_edge: base_max_edge.max(1),
            sticker_max_edge: sticker_max_edge.max(1),
        }
    }

    fn max_edge(&self, kind: UploadKind) -> u32 {
        match kind {
            UploadKind::BaseImage => self.base_max_edge,
            UploadKind::Sticker => self.sticker_max_edge,
        }
    }
}

impl ImageAcquirer for ImageDecoder {
    #[tracing::instrument(skip(self, bytes), fields(byte_len = bytes.len()))]
    fn acquire(&self, bytes: &[u8], kind: UploadKind) -> SlideResult<DecodedImage> {
        if bytes.is_empty() {
            return Err(SlideError::asset("upload is empty"));
        }

        if looks_like_svg(bytes) {
            let svg = parse_svg(bytes).map_err(as_asset_error)?;
            let (w, h) = svg.size();
            let width = (w.ceil() as u32).max(1);
            let height = (h.ceil() as u32).max(1);
            return Ok(DecodedImage {
                pixels: DecodedPixels::Svg(svg),
                mime_type: "image/svg+xml".to_owned(),
                width,
                height,
                byte_len: bytes.len(),
            });
        }

        let mime_type = image::guess_format(bytes)
            .map(|f| f.to_mime_type().to_owned())
            .unwrap_or_else(|_| "application/octet-stream".to_owned());
        let prepared = decode_image_fit(bytes, self.max_edge(kind)).map_err(as_asset_error)?;
        tracing::debug!(
            width = prepared.width,
            height = prepared.height,
            %mime_type,
            "decoded upload"
        );
        Ok(DecodedImage {
            width: prepared.width,
            height: prepared.height,
            pixels: DecodedPixels::Raster(prepared),
            mime_type,
            byte_len: bytes.len(),
        })
    }
}

/// Decode encoded image bytes and convert to premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> SlideResult<PreparedImage> {
    decode_image_fit(bytes, u32::MAX)
}

fn decode_image_fit(bytes: &[u8], max_edge: u32) -> SlideResult<PreparedImage> {
    let mut dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    if dyn_img.width() > max_edge || dyn_img.height() > max_edge {
        dyn_img = dyn_img.resize(max_edge, max_edge, image::imageops::FilterType::Triangle);
    }
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    PreparedImage::from_premul(width, height, rgba8_premul)
}

/// Parse SVG bytes into a prepared `usvg` tree.
pub fn parse_svg(bytes: &[u8]) -> SlideResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(512)];
    let Ok(text) = std::str::from_utf8(head) else {
        return false;
    };
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg"))
}

fn as_asset_error(err: SlideError) -> SlideError {
    match err {
        SlideError::Other(e) => SlideError::asset(format!("{e:#}")),
        other => other,
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
