//! Wheel layout as the renderer draws it.
//!
//! Wedge `i` covers `[slice * i + rotation, slice * i + rotation + slice)`,
//! with angles measured the way a canvas measures them. The pointer sits
//! fixed at angle 0, the right-hand horizontal. [`crate::resolver::resolve`]
//! must agree with [`wedge_under_pointer`] for every rotation.

use std::f64::consts::TAU;

pub const POINTER_ANGLE: f64 = 0.0;

pub fn slice_angle(item_count: usize) -> f64 {
    TAU / item_count as f64
}

/// Start and end angle of a wedge, unnormalized.
pub fn wedge_span(index: usize, item_count: usize, rotation: f64) -> (f64, f64) {
    let slice = slice_angle(item_count);
    let start = slice * index as f64 + rotation;
    (start, start + slice)
}

/// Angle through the middle of a wedge, where its label is drawn.
pub fn label_angle(index: usize, item_count: usize, rotation: f64) -> f64 {
    let (start, end) = wedge_span(index, item_count, rotation);
    (start + end) / 2.0
}

/// Normalizes an angle into `[0, 2π)`.
pub fn normalize(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Wedge containing the pointer, found by walking the drawn spans.
/// `None` only for an empty wheel.
pub fn wedge_under_pointer(rotation: f64, item_count: usize) -> Option<usize> {
    if item_count == 0 {
        return None;
    }
    let slice = slice_angle(item_count);
    (0..item_count).find(|&i| {
        let (start, _) = wedge_span(i, item_count, rotation);
        // distance swept from the wedge start to the pointer, going forward
        let offset = normalize(POINTER_ANGLE - start);
        offset < slice
    })
}
