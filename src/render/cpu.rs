use std::sync::Arc;

use crate::assets::store::PreparedImage;
use crate::fonts::ShapedLine;
use crate::foundation::core::{Affine, Rect, Rgba8};
use crate::foundation::error::{SlideError, SlideResult};

/// Largest surface edge `vello_cpu` can address.
pub(crate) const MAX_SURFACE_DIM: u32 = u16::MAX as u32;

/// Check that a `width x height` surface can be allocated.
pub(crate) fn surface_dims(width: u32, height: u32) -> SlideResult<(u16, u16)> {
    if width == 0 || height == 0 {
        return Err(SlideError::render(format!(
            "surface must be non-empty, got {width}x{height}"
        )));
    }
    let w: u16 = width
        .try_into()
        .map_err(|_| SlideError::render(format!("surface width {width} exceeds {MAX_SURFACE_DIM}")))?;
    let h: u16 = height.try_into().map_err(|_| {
        SlideError::render(format!("surface height {height} exceeds {MAX_SURFACE_DIM}"))
    })?;
    Ok((w, h))
}

/// Run one paint step in its own drawing context and return the premultiplied pixels.
///
/// Nothing set on the context (transform, paint) outlives the step.
pub(crate) fn paint_pass(
    width: u16,
    height: u16,
    draw: impl FnOnce(&mut vello_cpu::RenderContext),
) -> Vec<u8> {
    let mut ctx = vello_cpu::RenderContext::new(width, height);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    draw(&mut ctx);
    ctx.flush();
    let mut pixmap = vello_cpu::Pixmap::new(width, height);
    ctx.render_to_pixmap(&mut pixmap);
    pixmap.data_as_u8_slice().to_vec()
}

/// Fill `src_size` image space, mapped through `transform`, with `paint`.
pub(crate) fn fill_image(
    ctx: &mut vello_cpu::RenderContext,
    paint: vello_cpu::Image,
    src_w: u32,
    src_h: u32,
    transform: Affine,
) {
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(paint);
    ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
        0.0,
        0.0,
        f64::from(src_w),
        f64::from(src_h),
    ));
}

/// Transform that stretches a `src_w x src_h` image onto `dst`.
pub(crate) fn image_to_rect(src_w: u32, src_h: u32, dst: Rect) -> Affine {
    Affine::translate(dst.origin().to_vec2())
        * Affine::scale_non_uniform(
            dst.width() / f64::from(src_w),
            dst.height() / f64::from(src_h),
        )
}

/// Fill shaped glyphs with a solid color. `transform` maps line space to device space.
pub(crate) fn fill_line(
    ctx: &mut vello_cpu::RenderContext,
    line: &ShapedLine,
    color: Rgba8,
    transform: Affine,
) {
    if line.glyphs.is_empty() {
        return;
    }
    ctx.set_transform(affine_to_cpu(transform));
    ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
        color.r, color.g, color.b, color.a,
    ));
    // Unhinted, so glyph outlines scale exactly with the output width.
    ctx.glyph_run(&line.font)
        .font_size(line.font_size)
        .hint(false)
        .fill_glyphs(line.glyphs.iter().cloned());
}

pub(crate) fn image_paint(img: &PreparedImage) -> SlideResult<vello_cpu::Image> {
    rgba_premul_to_image(&img.rgba8_premul, img.width, img.height)
}

pub(crate) fn rgba_premul_to_image(
    bytes_premul: &[u8],
    width: u32,
    height: u32,
) -> SlideResult<vello_cpu::Image> {
    let pixmap = pixmap_from_premul_bytes(bytes_premul, width, height)?;
    Ok(vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    })
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> SlideResult<vello_cpu::Pixmap> {
    let (w, h) = surface_dims(width, height)?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(SlideError::render("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
