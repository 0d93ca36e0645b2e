pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Clamp a percentage into `[0, 100]`, mapping NaN to 0.
pub(crate) fn clamp_percent(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 100.0) }
}

/// Return `true` when `v` is a finite percentage in `[0, 100]`.
pub(crate) fn is_percent(v: f64) -> bool {
    v.is_finite() && (0.0..=100.0).contains(&v)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
