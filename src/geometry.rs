//! Conversion from the AI's normalized coordinates to page pixels

use crate::dom::{Point, Size};

/// Upper bound of the normalized scale the AI reports positions on
pub const NORMALIZED_SCALE: f64 = 1000.0;

/// Round to 3 decimal places
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

/// Map a point on the 0-1000 scale to absolute page pixels
///
/// Total: out-of-range input is transformed as-is and left for the spatial
/// lookup to reject.
pub fn to_absolute(relative: Point, size: Size) -> Point {
    Point {
        x: round3(relative.x / NORMALIZED_SCALE * size.width),
        y: round3(relative.y / NORMALIZED_SCALE * size.height),
    }
}
