//! Affine transform helpers.

use crate::foundation::core::{Affine, Point, Vec2};

/// Layer-local to device transform: rotate by `rotation_deg` (clockwise on screen) around
/// `anchor`, with the layer origin at the anchor.
#[inline]
pub fn layer_transform(anchor: Point, rotation_deg: f64) -> Affine {
    Affine::translate(anchor.to_vec2()) * Affine::rotate(rotation_deg.to_radians())
}

/// Device-space translation applied after the layer transform (shadow offsets ignore rotation).
#[inline]
pub fn device_offset(dy: f64) -> Affine {
    Affine::translate(Vec2::new(0.0, dy))
}

#[cfg(test)]
#[path = "../../tests/unit/transform/affine.rs"]
mod tests;
