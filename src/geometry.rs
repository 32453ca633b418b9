/*
 * Geometry Module
 *
 * Plain 2D helpers shared by movement, sensing and placement.
 * Everything here works on raw f64 coordinates so the simulation core
 * stays independent of the rendering layer's vector types.
 */

use std::f64::consts::{PI, TAU};

// Euclidean distance between two points
#[inline]
pub fn distance(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    (dx * dx + dy * dy).sqrt()
}

// Heading (radians) pointing from the first point towards the second
#[inline]
pub fn bearing(from_x: f64, from_y: f64, to_x: f64, to_y: f64) -> f64 {
    (to_y - from_y).atan2(to_x - from_x)
}

/// Smallest absolute difference between two headings, in `[0, π]`.
///
/// Headings are never normalised by the simulation, so both inputs may lie
/// anywhere on the real line.
pub fn angle_difference(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(TAU);
    if diff > PI {
        TAU - diff
    } else {
        diff
    }
}

/// Whether two circles overlap. Touching circles do not overlap.
#[inline]
pub fn circles_overlap(x1: f64, y1: f64, r1: f64, x2: f64, y2: f64, r2: f64) -> bool {
    distance(x1, y1, x2, y2) < r1 + r2
}

/// A point in arena space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parametric segment intersection test for `p1-p2` against `p3-p4`.
///
/// Parallel (and collinear) segments never intersect, so the denominator is
/// never divided by when it is zero. Endpoints count as intersections.
pub fn segments_intersect(p1: Point, p2: Point, p3: Point, p4: Point) -> bool {
    let denom = (p4.y - p3.y) * (p2.x - p1.x) - (p4.x - p3.x) * (p2.y - p1.y);
    if denom == 0.0 {
        return false;
    }

    let ua = ((p4.x - p3.x) * (p1.y - p3.y) - (p4.y - p3.y) * (p1.x - p3.x)) / denom;
    let ub = ((p2.x - p1.x) * (p1.y - p3.y) - (p2.y - p1.y) * (p1.x - p3.x)) / denom;

    (0.0..=1.0).contains(&ua) && (0.0..=1.0).contains(&ub)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn distance_is_euclidean() {
        assert_eq!(distance(0.0, 0.0, 3.0, 4.0), 5.0);
    }

    #[test]
    fn bearing_points_at_target() {
        assert!((bearing(0.0, 0.0, 0.0, 10.0) - FRAC_PI_2).abs() < 1e-12);
        assert!((bearing(5.0, 5.0, 0.0, 5.0) - PI).abs() < 1e-12);
    }

    #[test]
    fn angle_difference_wraps_around_full_turn() {
        assert!((angle_difference(0.1, TAU - 0.1) - 0.2).abs() < 1e-12);
        assert!((angle_difference(-0.1, 0.1) - 0.2).abs() < 1e-12);
        assert!((angle_difference(5.0 * TAU + 0.3, 0.0) - 0.3).abs() < 1e-9);
        assert!((angle_difference(0.0, PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn touching_circles_do_not_overlap() {
        assert!(!circles_overlap(0.0, 0.0, 5.0, 10.0, 0.0, 5.0));
        assert!(circles_overlap(0.0, 0.0, 5.0, 9.9, 0.0, 5.0));
    }

    #[test]
    fn crossing_segments_intersect() {
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert!(hit);
    }

    #[test]
    fn short_segment_does_not_reach() {
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(4.0, 4.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert!(!hit);
    }

    #[test]
    fn parallel_segments_never_intersect() {
        let hit = segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
        );
        assert!(!hit);
    }
}
