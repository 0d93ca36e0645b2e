use crate::foundation::error::{SlideError, SlideResult};

/// Largest edge an SVG is ever rasterized to.
pub(crate) const MAX_SVG_DIM: u32 = 16_384;

/// Pixel size for rasterizing an SVG so that it covers a `(w, h)` draw rect without upscaling.
pub(crate) fn svg_raster_size(w: f64, h: f64) -> SlideResult<(u32, u32)> {
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(SlideError::render("svg draw size must be finite and > 0"));
    }
    let pw = (w.ceil() as u32).max(1);
    let ph = (h.ceil() as u32).max(1);
    if pw > MAX_SVG_DIM || ph > MAX_SVG_DIM {
        return Err(SlideError::render(format!(
            "svg raster size too large: {pw}x{ph} (max {MAX_SVG_DIM}x{MAX_SVG_DIM})"
        )));
    }
    Ok((pw, ph))
}

/// Render the whole document stretched to `width x height`, returning premultiplied RGBA8.
pub(crate) fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> SlideResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| SlideError::render("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.data().to_vec())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
