use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::math::mul_div255_u8;

/// Source-over of premultiplied RGBA8 `src` onto `dst`, in place.
pub(crate) fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> SlideResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(SlideError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3] as u16;
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - sa;
        d[3] = s[3].saturating_add(mul_div255_u8(d[3] as u16, inv));
        for c in 0..3 {
            let dc = mul_div255_u8(d[c] as u16, inv);
            d[c] = s[c].saturating_add(dc);
        }
    }
    Ok(())
}

/// Apply a row-major 4x5 straight-alpha color matrix to premultiplied RGBA8, in place.
pub(crate) fn color_matrix_rgba8_premul_in_place(rgba: &mut [u8], m: [f32; 20]) {
    for d in rgba.chunks_exact_mut(4) {
        if d[3] == 0 {
            continue;
        }
        let pr = d[0] as f32 / 255.0;
        let pg = d[1] as f32 / 255.0;
        let pb = d[2] as f32 / 255.0;
        let pa = d[3] as f32 / 255.0;

        // premul -> straight
        let inv_a = 1.0 / pa;
        let r = (pr * inv_a).min(1.0);
        let g = (pg * inv_a).min(1.0);
        let b = (pb * inv_a).min(1.0);
        let a = pa;

        let out_r = (m[0] * r + m[1] * g + m[2] * b + m[3] * a + m[4]).clamp(0.0, 1.0);
        let out_g = (m[5] * r + m[6] * g + m[7] * b + m[8] * a + m[9]).clamp(0.0, 1.0);
        let out_b = (m[10] * r + m[11] * g + m[12] * b + m[13] * a + m[14]).clamp(0.0, 1.0);
        let out_a = (m[15] * r + m[16] * g + m[17] * b + m[18] * a + m[19]).clamp(0.0, 1.0);

        // straight -> premul
        d[0] = (out_r * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[1] = (out_g * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[2] = (out_b * out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        d[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}

/// Premultiplied RGBA8 to straight-alpha RGBA8.
pub(crate) fn unpremultiply_rgba8(src: &[u8]) -> Vec<u8> {
    let mut out = src.to_vec();
    for px in out.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 0 || a == 255 {
            continue;
        }
        for c in px.iter_mut().take(3) {
            *c = (((*c as u32) * 255 + a / 2) / a).min(255) as u8;
        }
    }
    out
}

/// Fill every pixel with one premultiplied color.
pub(crate) fn fill_rgba8(dst: &mut [u8], premul: [u8; 4]) {
    for px in dst.chunks_exact_mut(4) {
        px.copy_from_slice(&premul);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composite.rs"]
mod tests;
