use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{SlideError, SlideResult};
use crate::foundation::math::clamp_percent;

/// Convert a pointer position into slot percentages relative to the slot's on-screen box.
///
/// The result is clamped to `[0, 100]` on both axes, so dragging past an edge pins the layer
/// to that edge.
pub fn pointer_to_percent(pointer: Point, bounds: Rect) -> SlideResult<(f64, f64)> {
    let w = bounds.width();
    let h = bounds.height();
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(SlideError::validation(
            "slot bounds must have a finite, positive size",
        ));
    }
    let x = (pointer.x - bounds.x0) / w * 100.0;
    let y = (pointer.y - bounds.y0) / h * 100.0;
    Ok((clamp_percent(x), clamp_percent(y)))
}

/// Inverse of [`pointer_to_percent`] (without clamping).
pub fn percent_to_pointer(x: f64, y: f64, bounds: Rect) -> Point {
    Point::new(
        bounds.x0 + x / 100.0 * bounds.width(),
        bounds.y0 + y / 100.0 * bounds.height(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/transform/pointer.rs"]
mod tests;
