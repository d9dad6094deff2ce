//! # Snap Engine
//!
//! Angle-constrained projection of a raw pointer position around an anchor.
//! The direction is forced onto the nearest of the eight canonical angles in
//! [`SNAP_ANGLES_DEG`]; the distance from the anchor is kept as is.
//!
//! ## Tie-break policy
//!
//! Angular distance is measured around the circle rather than as a plain
//! absolute difference in `[0, 360)`, so 350° snaps to 0° instead of 315°.
//! When a raw angle is exactly halfway between two canonical angles (22.5°,
//! 67.5°, ... 337.5°) the angle listed first in ascending order
//! `[0, 45, ..., 315]` wins. This is a fixed, deterministic policy rather
//! than a geometric preference.
//!
//! ## Example
//!
//! ```rust
//! use profile_core::geometry::Point;
//! use profile_core::snap::project;
//!
//! let snapped = project(Point::new(0.0, 0.0), Point::new(10.0, 1.0));
//! assert!((snapped.x - 101.0_f64.sqrt()).abs() < 1e-9);
//! assert!(snapped.y.abs() < 1e-9);
//! ```

use crate::geometry::{normalize_degrees, Point, SNAP_ANGLES_DEG};

/// Snap a raw angle (degrees, any range) to the nearest canonical angle.
pub fn snap_angle_deg(raw_deg: f64) -> f64 {
    let raw = normalize_degrees(raw_deg);

    let mut best = SNAP_ANGLES_DEG[0];
    let mut best_diff = f64::INFINITY;
    for &candidate in SNAP_ANGLES_DEG.iter() {
        let diff = angular_distance(raw, candidate);
        // strict `<` keeps the earlier candidate on ties
        if diff < best_diff {
            best = candidate;
            best_diff = diff;
        }
    }
    best
}

/// Project `raw` onto the canonical direction closest to the anchor→raw
/// direction, preserving the anchor→raw distance.
///
/// A zero-length input returns `raw` unchanged: the direction is undefined
/// but the result coincides with the anchor anyway.
pub fn project(anchor: Point, raw: Point) -> Point {
    let dx = raw.x - anchor.x;
    let dy = raw.y - anchor.y;
    let distance = dx.hypot(dy);
    if distance == 0.0 {
        return raw;
    }

    let snapped = snap_angle_deg(dy.atan2(dx).to_degrees()).to_radians();
    Point::new(
        anchor.x + distance * snapped.cos(),
        anchor.y + distance * snapped.sin(),
    )
}

/// Shortest distance between two angles in `[0, 360)`, in degrees.
fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).abs();
    diff.min(360.0 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Segment, ANGLE_TOLERANCE_RAD};
    use approx::assert_relative_eq;

    fn angle_is_canonical(anchor: Point, p: Point) -> bool {
        Segment::between(anchor, p).is_snapped()
    }

    #[test]
    fn test_scenario_near_horizontal() {
        let anchor = Point::new(0.0, 0.0);
        let out = project(anchor, Point::new(10.0, 1.0));
        assert_relative_eq!(out.x, 10.0499, epsilon = 1e-4);
        assert_relative_eq!(out.y, 0.0, epsilon = 1e-9);
        assert_relative_eq!(anchor.distance_to(out), 101.0_f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn test_snap_angle_each_octant() {
        assert_eq!(snap_angle_deg(10.0), 0.0);
        assert_eq!(snap_angle_deg(50.0), 45.0);
        assert_eq!(snap_angle_deg(100.0), 90.0);
        assert_eq!(snap_angle_deg(150.0), 135.0);
        assert_eq!(snap_angle_deg(-170.0), 180.0);
        assert_eq!(snap_angle_deg(230.0), 225.0);
        assert_eq!(snap_angle_deg(260.0), 270.0);
        assert_eq!(snap_angle_deg(300.0), 315.0);
    }

    #[test]
    fn test_wraps_around_zero() {
        assert_eq!(snap_angle_deg(350.0), 0.0);
        assert_eq!(snap_angle_deg(-5.0), 0.0);
    }

    #[test]
    fn test_ties_prefer_earlier_angle() {
        assert_eq!(snap_angle_deg(22.5), 0.0);
        assert_eq!(snap_angle_deg(67.5), 45.0);
        assert_eq!(snap_angle_deg(337.5), 0.0);
    }

    #[test]
    fn test_zero_length_returns_raw() {
        let p = Point::new(4.0, -2.0);
        assert_eq!(project(p, p), p);
    }

    #[test]
    fn test_projection_properties_over_grid() {
        let anchors = [Point::new(0.0, 0.0), Point::new(-37.5, 120.25), Point::new(500.0, 3.0)];
        for anchor in anchors {
            for i in -12..=12 {
                for j in -12..=12 {
                    if i == 0 && j == 0 {
                        continue;
                    }
                    let raw = Point::new(anchor.x + i as f64 * 7.3, anchor.y + j as f64 * 4.1);
                    let out = project(anchor, raw);
                    assert!(angle_is_canonical(anchor, out), "{:?} -> {:?}", raw, out);
                    assert_relative_eq!(
                        anchor.distance_to(out),
                        anchor.distance_to(raw),
                        max_relative = 1e-12
                    );
                }
            }
        }
    }

    #[test]
    fn test_vertical_down_is_exactly_90() {
        let out = project(Point::new(0.0, 0.0), Point::new(1.0, 40.0));
        let angle = Segment::between(Point::new(0.0, 0.0), out).angle_deg();
        assert!((angle - 90.0).to_radians().abs() <= ANGLE_TOLERANCE_RAD);
    }
}
