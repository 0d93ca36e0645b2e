use crate::foundation::error::{SlideError, SlideResult};

/// Kernel radius cap on small surfaces, in pixels.
pub(crate) const MAX_BLUR_RADIUS: u32 = 256;

/// Larger surfaces raise the cap to `longest edge / BLUR_CAP_DIVISOR`.
const BLUR_CAP_DIVISOR: u32 = 16;

/// Kernel radius cap for a surface whose longest edge is `surface_edge` pixels.
pub(crate) fn blur_radius_cap(surface_edge: u32) -> u32 {
    MAX_BLUR_RADIUS.max(surface_edge / BLUR_CAP_DIVISOR)
}

/// Integer pixel rectangle `[x0, x1) x [y0, y1)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct PixelRegion {
    pub(crate) x0: u32,
    pub(crate) y0: u32,
    pub(crate) x1: u32,
    pub(crate) y1: u32,
}

impl PixelRegion {
    /// Region covering `r` expanded by `pad`, clipped to a `width x height` surface.
    pub(crate) fn around(r: kurbo::Rect, pad: u32, width: u32, height: u32) -> Option<Self> {
        if !(r.x0.is_finite() && r.y0.is_finite() && r.x1.is_finite() && r.y1.is_finite()) {
            return None;
        }
        let pad = f64::from(pad);
        let x0 = (r.x0 - pad).floor().max(0.0) as u32;
        let y0 = (r.y0 - pad).floor().max(0.0) as u32;
        let x1 = ((r.x1 + pad).ceil().max(0.0) as u32).min(width);
        let y1 = ((r.y1 + pad).ceil().max(0.0) as u32).min(height);
        (x0 < x1 && y0 < y1).then_some(Self { x0, y0, x1, y1 })
    }

    fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

/// Canvas-style shadow blur: `sigma = blur / 2`, kernel radius `ceil(3 * sigma)`.
///
/// Past [`blur_radius_cap`] sigma shrinks with the radius, so the kernel is never truncated.
pub(crate) fn shadow_kernel(blur_px: f64, surface_edge: u32) -> SlideResult<Vec<u32>> {
    if !blur_px.is_finite() || blur_px < 0.0 {
        return Err(SlideError::render("shadow blur must be finite and >= 0"));
    }
    let cap = blur_radius_cap(surface_edge);
    let sigma = (blur_px / 2.0).min(f64::from(cap) / 3.0);
    let radius = ((3.0 * sigma).ceil() as u32).min(cap);
    gaussian_kernel_q16(radius, sigma as f32)
}

pub(crate) fn gaussian_kernel_q16(radius: u32, sigma: f32) -> SlideResult<Vec<u32>> {
    if radius == 0 {
        return Ok(vec![1 << 16]);
    }
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(SlideError::validation("blur sigma must be finite and > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = sigma as f64;
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = i as f64;
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(SlideError::render("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let target: i64 = 65536;
    let delta = target - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let mid_val = i64::from(weights[mid]);
        let new_mid = (mid_val + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

/// Blur `region` of a premultiplied RGBA8 surface in place. Pixels outside the region are
/// left untouched; the region's edge pixels are clamped when sampling.
pub(crate) fn blur_region_rgba8_premul_q16(
    rgba: &mut [u8],
    width: u32,
    region: PixelRegion,
    kernel_q16: &[u32],
) {
    if kernel_q16.len() <= 1 {
        return;
    }
    let rw = region.width();
    let rh = region.height();
    let row_bytes = rw as usize * 4;

    let mut src = vec![0u8; row_bytes * rh as usize];
    for (ry, chunk) in src.chunks_exact_mut(row_bytes).enumerate() {
        let start = (((region.y0 as usize + ry) * width as usize) + region.x0 as usize) * 4;
        chunk.copy_from_slice(&rgba[start..start + row_bytes]);
    }

    let mut tmp = vec![0u8; src.len()];
    let mut dst = vec![0u8; src.len()];
    horizontal_blur_q16(&src, &mut tmp, rw, rh, kernel_q16);
    vertical_blur_q16(&tmp, &mut dst, rw, rh, kernel_q16);

    for (ry, chunk) in dst.chunks_exact(row_bytes).enumerate() {
        let start = (((region.y0 as usize + ry) * width as usize) + region.x0 as usize) * 4;
        rgba[start..start + row_bytes].copy_from_slice(chunk);
    }
}

fn horizontal_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    for y in 0..height as i32 {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dx = ki as i32 - radius;
                let sx = (x + dx).clamp(0, w - 1);
                let idx = ((y * w + sx) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn vertical_blur_q16(src: &[u8], dst: &mut [u8], width: u32, height: u32, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let w = width as i32;
    let h = height as i32;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let dy = ki as i32 - radius;
                let sy = (y + dy).clamp(0, h - 1);
                let idx = ((sy * w + x) as usize) * 4;
                for c in 0..4 {
                    acc[c] += (kw as u64) * (src[idx + c] as u64);
                }
            }
            let out_idx = ((y * w + x) as usize) * 4;
            for c in 0..4 {
                dst[out_idx + c] = q16_to_u8(acc[c]);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    (v.min(255)) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/render/blur.rs"]
mod tests;
