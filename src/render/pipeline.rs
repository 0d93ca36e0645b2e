use crate::assets::store::{PreparedImage, StickerImage};
use crate::assets::svg_raster::{rasterize_svg_to_premul_rgba8, svg_raster_size};
use crate::fonts::{FontBook, FontRequest, ShapedLine};
use crate::foundation::core::{Affine, Rect, Rgba8, StickerId};
use crate::foundation::error::{SlideError, SlideResult};
use crate::grade::ColorGrade;
use crate::layers::sticker::StickerLayer;
use crate::layers::text::TextLayer;
use crate::layout::block::{TextPlacement, place_text};
use crate::render::backend::{FrameRGBA, RenderOpts};
use crate::render::blur::{PixelRegion, blur_region_rgba8_premul_q16, shadow_kernel};
use crate::render::composite::{fill_rgba8, premul_over_in_place};
use crate::render::cpu::{
    fill_image, fill_line, image_paint, image_to_rect, paint_pass, rgba_premul_to_image,
    surface_dims,
};
use crate::transform::affine::device_offset;
use crate::transform::scale::ScaleContext;

/// Everything one slot render reads. Nothing here is mutated.
#[derive(Clone, Copy, Debug)]
pub struct RenderInput<'a> {
    /// Base photo.
    pub base: &'a PreparedImage,
    /// Project-wide grade, applied to the base image only.
    pub grade: &'a ColorGrade,
    /// Stickers in paint order.
    pub stickers: &'a [StickerLayer],
    /// Text layers in paint order. Hidden layers are skipped.
    pub texts: &'a [TextLayer],
    /// Output width in pixels.
    pub target_width: u32,
}

/// Where a sticker landed in the output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StickerPlacement {
    /// Sticker id.
    pub id: StickerId,
    /// Draw rect in target pixels.
    pub rect: Rect,
}

/// A composed slot plus the geometry that produced it.
#[derive(Clone, Debug)]
pub struct RenderedSlot {
    /// Output pixels.
    pub frame: FrameRGBA,
    /// Layout of every visible text layer, in paint order.
    pub texts: Vec<TextPlacement>,
    /// Sticker rects, in paint order.
    pub stickers: Vec<StickerPlacement>,
}

/// Output size for `base` at `target_width`: the height keeps the base aspect ratio, rounded
/// to the nearest pixel and never below 1.
pub fn output_size(base: &PreparedImage, target_width: u32) -> SlideResult<(u32, u32)> {
    if target_width == 0 {
        return Err(SlideError::validation("target width must be > 0"));
    }
    if base.width == 0 || base.height == 0 {
        return Err(SlideError::validation("base image has no pixels"));
    }
    let num = u64::from(target_width) * u64::from(base.height);
    let den = u64::from(base.width);
    let h = ((num + den / 2) / den).max(1);
    let h = u32::try_from(h)
        .map_err(|_| SlideError::render(format!("output height {h} does not fit u32")))?;
    Ok((target_width, h))
}

/// Compose one slot: base image with the color grade, then stickers, then visible text layers
/// with their drop shadow.
///
/// Every asset must be ready and every layer valid before anything is painted; a render never
/// skips a layer it was asked to draw. A visible layer with text but no usable font face fails
/// with [`SlideError::NoFontFace`].
#[tracing::instrument(
    skip(input, fonts, opts),
    fields(
        width = input.target_width,
        stickers = input.stickers.len(),
        texts = input.texts.len()
    )
)]
pub fn render_slot(
    input: &RenderInput<'_>,
    fonts: &mut FontBook,
    opts: &RenderOpts,
) -> SlideResult<RenderedSlot> {
    let (width, height) = output_size(input.base, input.target_width)?;
    let (w16, h16) = surface_dims(width, height)?;
    let ctx = ScaleContext::new(width, height);

    let mut sticker_jobs = Vec::with_capacity(input.stickers.len());
    for sticker in input.stickers {
        let image = sticker.image.ready(&format!("sticker {}", sticker.id.0))?;
        let rect = ctx.sticker_rect(sticker, image.aspect())?;
        sticker_jobs.push((sticker.id, image, rect));
    }
    for layer in input.texts {
        layer.validate()?;
        if layer.visible && needs_glyphs(layer) && !fonts.can_draw(&layer.font_family) {
            return Err(SlideError::no_font_face(layer.font_family.clone()));
        }
    }

    let mut data = vec![0u8; (width as usize) * (height as usize) * 4];
    if let Some(clear) = opts.clear_rgba {
        fill_rgba8(
            &mut data,
            Rgba8::rgba(clear[0], clear[1], clear[2], clear[3]).premultiplied(),
        );
    }

    draw_base(&mut data, (w16, h16), input.base, input.grade)?;

    let mut stickers = Vec::with_capacity(sticker_jobs.len());
    for (id, image, rect) in sticker_jobs {
        draw_sticker(&mut data, (w16, h16), image, rect)?;
        stickers.push(StickerPlacement { id, rect });
    }

    let mut texts = Vec::new();
    for layer in input.texts.iter().filter(|l| l.visible) {
        let placement = place_text(layer, &ctx, opts.shadow.geometry(), fonts)?;
        draw_text(&mut data, (w16, h16), layer, &placement, fonts, opts)?;
        texts.push(placement);
    }

    tracing::debug!(width, height, texts = texts.len(), "slot composed");
    Ok(RenderedSlot {
        frame: FrameRGBA {
            width,
            height,
            data,
            premultiplied: true,
        },
        texts,
        stickers,
    })
}

fn draw_base(
    dst: &mut [u8],
    (w, h): (u16, u16),
    base: &PreparedImage,
    grade: &ColorGrade,
) -> SlideResult<()> {
    let paint = image_paint(base)?;
    let target = Rect::new(0.0, 0.0, f64::from(w), f64::from(h));
    let mut layer = paint_pass(w, h, |ctx| {
        fill_image(
            ctx,
            paint,
            base.width,
            base.height,
            image_to_rect(base.width, base.height, target),
        );
    });
    grade.apply_rgba8_premul(&mut layer);
    premul_over_in_place(dst, &layer)
}

fn draw_sticker(
    dst: &mut [u8],
    (w, h): (u16, u16),
    image: &StickerImage,
    rect: Rect,
) -> SlideResult<()> {
    // Zero-area stickers leave no pixels.
    if rect.width() <= 0.0 || rect.height() <= 0.0 {
        return Ok(());
    }
    let (paint, src_w, src_h) = match image {
        StickerImage::Raster(img) => (image_paint(img)?, img.width, img.height),
        StickerImage::Svg(svg) => {
            let (pw, ph) = svg_raster_size(rect.width(), rect.height())?;
            let bytes = rasterize_svg_to_premul_rgba8(&svg.tree, pw, ph)?;
            (rgba_premul_to_image(&bytes, pw, ph)?, pw, ph)
        }
    };
    let layer = paint_pass(w, h, |ctx| {
        fill_image(ctx, paint, src_w, src_h, image_to_rect(src_w, src_h, rect));
    });
    premul_over_in_place(dst, &layer)
}

fn needs_glyphs(layer: &TextLayer) -> bool {
    !layer.content.trim().is_empty()
}

fn draw_text(
    dst: &mut [u8],
    (w, h): (u16, u16),
    layer: &TextLayer,
    placement: &TextPlacement,
    fonts: &mut FontBook,
    opts: &RenderOpts,
) -> SlideResult<()> {
    let scaled = &placement.scaled;
    let req = FontRequest {
        family: &layer.font_family,
        weight: layer.font_weight,
        font_px: scaled.font_px,
        letter_spacing_px: scaled.letter_spacing_px,
    };

    let layer_xf = placement.transform();
    let mut lines: Vec<(ShapedLine, Affine)> = Vec::with_capacity(placement.lines.len());
    for placed in &placement.lines {
        if placed.text.trim().is_empty() {
            continue;
        }
        let shaped = fonts
            .shape_line(&req, &placed.text, layer.color)
            .ok_or_else(|| SlideError::no_font_face(layer.font_family.clone()))?;
        if shaped.glyphs.is_empty() {
            continue;
        }
        let xf = layer_xf
            * Affine::translate((-shaped.width / 2.0, placed.offset_y - shaped.middle_y));
        lines.push((shaped, xf));
    }
    if lines.is_empty() {
        return Ok(());
    }

    let shadow = opts.shadow;
    if shadow.color.a > 0 {
        let offset = device_offset(scaled.shadow_offset_px);
        let mut pass = paint_pass(w, h, |ctx| {
            for (line, xf) in &lines {
                fill_line(ctx, line, shadow.color, offset * *xf);
            }
        });
        let kernel = shadow_kernel(scaled.shadow_blur_px, u32::from(w.max(h)))?;
        let radius = (kernel.len() / 2) as u32;
        // Ink can overhang the em box, so pad by half an em on top of the kernel radius.
        let pad = radius.saturating_add((scaled.font_px / 2.0).ceil() as u32);
        let ink = offset.transform_rect_bbox(placement.device_bounds());
        if let Some(region) = PixelRegion::around(ink, pad, u32::from(w), u32::from(h)) {
            blur_region_rgba8_premul_q16(&mut pass, u32::from(w), region, &kernel);
        }
        premul_over_in_place(dst, &pass)?;
    }

    let pass = paint_pass(w, h, |ctx| {
        for (line, xf) in &lines {
            fill_line(ctx, line, line.color, *xf);
        }
    });
    premul_over_in_place(dst, &pass)
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
