//! # Geometry Primitives
//!
//! Canvas-local points and committed segments. Coordinates are plain `f64`
//! canvas pixels with the y axis pointing down, as delivered by the input
//! surface. Both types serialize to flat JSON objects (`{"x":..,"y":..}` and
//! `{"x1":..,"y1":..,"x2":..,"y2":..}`) so hosts can store them verbatim.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::geometry::{Point, Segment};
//!
//! let seg = Segment::between(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
//! assert_eq!(seg.length(), 50.0);
//! assert_eq!(seg.midpoint(), Point::new(15.0, 20.0));
//! ```

use serde::{Deserialize, Serialize};

/// The only directions a committed segment may take, in degrees, ascending.
///
/// The ascending order doubles as the snap tie-break order.
pub const SNAP_ANGLES_DEG: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Tolerance (radians) for checking a segment direction against the snap set.
pub const ANGLE_TOLERANCE_RAD: f64 = 1e-6;

/// Relative tolerance under which `|dx|` and `|dy|` count as equal.
pub const DIAGONAL_REL_TOLERANCE: f64 = 1e-9;

/// Normalize an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

// ============================================================================
// Point
// ============================================================================

/// A canvas-local position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// True when both coordinates are finite (no NaN / infinity)
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Subtract an origin, e.g. to turn client coordinates into canvas-local ones
    pub fn relative_to(&self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

// ============================================================================
// Segment
// ============================================================================

/// A committed line of the profile.
///
/// Segments are never edited after they are appended; the position in the
/// containing sequence (1-based) is the manufacturing order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Segment { x1, y1, x2, y2 }
    }

    /// Build a segment from its two endpoints
    pub fn between(start: Point, end: Point) -> Self {
        Segment::new(start.x, start.y, end.x, end.y)
    }

    pub fn start(&self) -> Point {
        Point::new(self.x1, self.y1)
    }

    pub fn end(&self) -> Point {
        Point::new(self.x2, self.y2)
    }

    pub fn dx(&self) -> f64 {
        self.x2 - self.x1
    }

    pub fn dy(&self) -> f64 {
        self.y2 - self.y1
    }

    /// Canvas length of the segment
    pub fn length(&self) -> f64 {
        self.dx().hypot(self.dy())
    }

    pub fn midpoint(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Direction in degrees, normalized to `[0, 360)`.
    pub fn angle_deg(&self) -> f64 {
        normalize_degrees(self.dy().atan2(self.dx()).to_degrees())
    }

    /// True when all four coordinates are finite
    pub fn is_finite(&self) -> bool {
        self.start().is_finite() && self.end().is_finite()
    }

    /// True when the direction is one of [`SNAP_ANGLES_DEG`] within
    /// [`ANGLE_TOLERANCE_RAD`].
    pub fn is_snapped(&self) -> bool {
        let angle = self.angle_deg();
        SNAP_ANGLES_DEG.iter().any(|&allowed| {
            let diff = (angle - allowed).abs();
            diff.min(360.0 - diff).to_radians() <= ANGLE_TOLERANCE_RAD
        })
    }

    /// True when the segment is at least as wide as it is tall.
    ///
    /// Widths within a relative `1e-9` of the height count as equal, so
    /// snapped diagonals (whose components differ only by rounding) always
    /// land in the horizontal class.
    pub fn is_near_horizontal(&self) -> bool {
        let (w, h) = (self.dx().abs(), self.dy().abs());
        w >= h - DIAGONAL_REL_TOLERANCE * w.max(h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_degrees() {
        assert_relative_eq!(normalize_degrees(-90.0), 270.0);
        assert_relative_eq!(normalize_degrees(360.0), 0.0);
        assert_relative_eq!(normalize_degrees(725.0), 5.0);
        assert!(normalize_degrees(-1e-15) < 360.0);
    }

    #[test]
    fn test_segment_metrics() {
        let seg = Segment::new(10.0, 10.0, 10.0, 30.0);
        assert_relative_eq!(seg.length(), 20.0);
        assert_eq!(seg.midpoint(), Point::new(10.0, 20.0));
        assert_relative_eq!(seg.angle_deg(), 90.0);
        assert!(!seg.is_near_horizontal());
    }

    #[test]
    fn test_diagonal_counts_as_horizontal() {
        // |dx| == |dy| resolves to the horizontal class
        let seg = Segment::new(0.0, 0.0, 5.0, -5.0);
        assert!(seg.is_near_horizontal());
        assert_relative_eq!(seg.angle_deg(), 315.0);
    }

    #[test]
    fn test_rounded_diagonal_counts_as_horizontal() {
        // 10·cos(3π/4) vs 10·sin(3π/4): the components differ in the last bit
        let seg = Segment::new(0.0, 0.0, -9.999999999999998, 10.000000000000002);
        assert!(seg.dx().abs() < seg.dy().abs());
        assert!(seg.is_near_horizontal());
        assert!(!Segment::new(0.0, 0.0, 9.99, 10.0).is_near_horizontal());
    }

    #[test]
    fn test_is_snapped() {
        assert!(Segment::new(0.0, 0.0, -3.0, 0.0).is_snapped());
        assert!(Segment::new(0.0, 0.0, 2.0, 2.0).is_snapped());
        assert!(!Segment::new(0.0, 0.0, 10.0, 1.0).is_snapped());
    }

    #[test]
    fn test_non_finite_detection() {
        assert!(!Segment::new(f64::NAN, 0.0, 1.0, 1.0).is_finite());
        assert!(!Point::new(0.0, f64::INFINITY).is_finite());
        assert!(Segment::new(0.0, 0.0, 1.0, 1.0).is_finite());
    }

    #[test]
    fn test_segment_json_shape() {
        let seg = Segment::new(1.0, 2.0, 3.0, 4.0);
        let json = serde_json::to_string(&seg).unwrap();
        assert_eq!(json, r#"{"x1":1.0,"y1":2.0,"x2":3.0,"y2":4.0}"#);
    }
}
