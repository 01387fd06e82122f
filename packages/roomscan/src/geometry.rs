//! Bounding-box arithmetic: normalized polygon to pixel rectangle.

use crate::types::{BoundingBox, NormalizedVertex};

/// Convert a detector's normalized polygon into an absolute pixel box.
///
/// Vertex coordinates are clamped into `[0, 1]` before scaling, so
/// out-of-range input shrinks to the image edge rather than failing.
/// Returns `None` for an empty vertex sequence (no box; the caller skips
/// the detection).
pub fn pixel_box(
    vertices: &[NormalizedVertex],
    width: u32,
    height: u32,
) -> Option<BoundingBox> {
    if vertices.is_empty() {
        return None;
    }

    let mut x_min = f64::INFINITY;
    let mut x_max = f64::NEG_INFINITY;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for v in vertices {
        x_min = x_min.min(v.x);
        x_max = x_max.max(v.x);
        y_min = y_min.min(v.y);
        y_max = y_max.max(v.y);
    }

    let x_min = x_min.clamp(0.0, 1.0);
    let x_max = x_max.clamp(0.0, 1.0);
    let y_min = y_min.clamp(0.0, 1.0);
    let y_max = y_max.clamp(0.0, 1.0);

    Some(BoundingBox {
        x: (x_min * f64::from(width)).floor() as u32,
        y: (y_min * f64::from(height)).floor() as u32,
        w: ((x_max - x_min) * f64::from(width)).floor() as u32,
        h: ((y_max - y_min) * f64::from(height)).floor() as u32,
    })
}

/// Intersect a pixel box with the actual image extents.
///
/// A box lying partially outside shrinks to the overlapping region; a box
/// entirely outside degrades to zero width or height. Never an error.
pub fn clip_box(bbox: &BoundingBox, width: u32, height: u32) -> BoundingBox {
    let x = bbox.x.min(width);
    let y = bbox.y.min(height);
    BoundingBox {
        x,
        y,
        w: bbox.w.min(width - x),
        h: bbox.h.min(height - y),
    }
}
