// Copyright 2025 Lars Brubaker
// License: MIT
//
// Integer geometry primitives shared by the builder, the sweep and the
// output stage.
//
// Coordinates are signed 64-bit integers. Products of coordinate differences
// fit in i64 only while every coordinate stays within LO_RANGE; beyond that the
// engine switches its slope tests to i128 cross products. Anything beyond
// HI_RANGE is rejected outright.

use crate::error::ClipError;

/// Largest coordinate magnitude for which 64-bit cross products cannot overflow.
pub const LO_RANGE: i64 = 0x3FFF_FFFF;
/// Largest coordinate magnitude accepted at all.
pub const HI_RANGE: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// A point with signed integer coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntPoint {
    pub x: i64,
    pub y: i64,
}

impl IntPoint {
    #[inline]
    pub const fn new(x: i64, y: i64) -> Self {
        IntPoint { x, y }
    }
}

impl From<(i64, i64)> for IntPoint {
    fn from((x, y): (i64, i64)) -> Self {
        IntPoint { x, y }
    }
}

pub type Path = Vec<IntPoint>;
pub type Paths = Vec<Path>;

/// Axis-aligned integer rectangle. `top` is the smaller Y.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct IntRect {
    pub left: i64,
    pub top: i64,
    pub right: i64,
    pub bottom: i64,
}

/// Result of a point-in-polygon query.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PointInPolygon {
    Outside,
    Inside,
    OnBoundary,
}

/// Rounds half away from zero.
#[inline]
pub fn round(val: f64) -> i64 {
    if val < 0.0 {
        (val - 0.5) as i64
    } else {
        (val + 0.5) as i64
    }
}

/// Checks `pt` against the coordinate ranges. Returns `Ok(true)` once the point
/// requires (or `use_full_range` already selects) 128-bit arithmetic.
pub fn range_test(pt: IntPoint, use_full_range: bool) -> Result<bool, ClipError> {
    let beyond = |limit: i64| pt.x > limit || pt.y > limit || -pt.x > limit || -pt.y > limit;
    // i64::MIN cannot be negated; it is out of range either way.
    if pt.x == i64::MIN || pt.y == i64::MIN || beyond(HI_RANGE) {
        return Err(ClipError::CoordinateOutOfRange { x: pt.x, y: pt.y });
    }
    Ok(use_full_range || beyond(LO_RANGE))
}

/// Signed area of a closed path. Positive when the path winds counter-clockwise
/// in a Y-up frame.
pub fn area(poly: &[IntPoint]) -> f64 {
    let size = poly.len();
    if size < 3 {
        return 0.0;
    }
    let mut a = 0.0f64;
    let mut j = size - 1;
    for i in 0..size {
        a += (poly[j].x as f64 + poly[i].x as f64) * (poly[j].y as f64 - poly[i].y as f64);
        j = i;
    }
    -a * 0.5
}

/// True when `area(poly) >= 0`.
#[inline]
pub fn orientation(poly: &[IntPoint]) -> bool {
    area(poly) >= 0.0
}

/// Winding test after Hormann & Agathos, "The Point in Polygon Problem for
/// Arbitrary Polygons". Works on any closed ring given as a point iterator
/// pair (current, next).
pub(crate) fn point_in_ring<I>(pt: IntPoint, edges: I) -> PointInPolygon
where
    I: IntoIterator<Item = (IntPoint, IntPoint)>,
{
    let mut inside = false;
    for (ip, ip_next) in edges {
        if ip_next.y == pt.y
            && (ip_next.x == pt.x || (ip.y == pt.y && ((ip_next.x > pt.x) == (ip.x < pt.x))))
        {
            return PointInPolygon::OnBoundary;
        }
        if (ip.y < pt.y) != (ip_next.y < pt.y) {
            if ip.x >= pt.x {
                if ip_next.x > pt.x {
                    inside = !inside;
                } else {
                    let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                        - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                    if d == 0.0 {
                        return PointInPolygon::OnBoundary;
                    }
                    if (d > 0.0) == (ip_next.y > ip.y) {
                        inside = !inside;
                    }
                }
            } else if ip_next.x > pt.x {
                let d = (ip.x - pt.x) as f64 * (ip_next.y - pt.y) as f64
                    - (ip_next.x - pt.x) as f64 * (ip.y - pt.y) as f64;
                if d == 0.0 {
                    return PointInPolygon::OnBoundary;
                }
                if (d > 0.0) == (ip_next.y > ip.y) {
                    inside = !inside;
                }
            }
        }
    }
    if inside {
        PointInPolygon::Inside
    } else {
        PointInPolygon::Outside
    }
}

/// Locates `pt` relative to the closed path `path`.
pub fn point_in_polygon(pt: IntPoint, path: &[IntPoint]) -> PointInPolygon {
    let cnt = path.len();
    if cnt < 3 {
        return PointInPolygon::Outside;
    }
    point_in_ring(pt, (0..cnt).map(|i| (path[i], path[(i + 1) % cnt])))
}

/// Exact comparison `a * b == c * d`, widened to 128 bits when requested.
#[inline]
fn products_equal(a: i64, b: i64, c: i64, d: i64, use_full_range: bool) -> bool {
    if use_full_range {
        (a as i128) * (b as i128) == (c as i128) * (d as i128)
    } else {
        a.wrapping_mul(b) == c.wrapping_mul(d)
    }
}

/// True when pt1-pt2 and pt2-pt3 have the same slope (the three are collinear).
#[inline]
pub fn slopes_equal3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, use_full_range: bool) -> bool {
    products_equal(pt1.y - pt2.y, pt2.x - pt3.x, pt1.x - pt2.x, pt2.y - pt3.y, use_full_range)
}

/// True when segment pt1-pt2 is parallel to segment pt3-pt4.
#[inline]
pub fn slopes_equal4(
    pt1: IntPoint,
    pt2: IntPoint,
    pt3: IntPoint,
    pt4: IntPoint,
    use_full_range: bool,
) -> bool {
    products_equal(pt1.y - pt2.y, pt3.x - pt4.x, pt1.x - pt2.x, pt3.y - pt4.y, use_full_range)
}

/// Inverse slope dx/dy of pt1->pt2, or `HORIZONTAL` when dy == 0.
#[inline]
pub fn get_dx(pt1: IntPoint, pt2: IntPoint) -> f64 {
    if pt1.y == pt2.y {
        HORIZONTAL
    } else {
        (pt2.x - pt1.x) as f64 / (pt2.y - pt1.y) as f64
    }
}

/// Marker slope of a horizontal edge.
pub const HORIZONTAL: f64 = -1.0e40;

/// True when pt2 lies strictly between pt1 and pt3 on their common line.
pub fn pt2_is_between_pt1_and_pt3(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint) -> bool {
    if pt1 == pt3 || pt1 == pt2 || pt3 == pt2 {
        false
    } else if pt1.x != pt3.x {
        (pt2.x > pt1.x) == (pt2.x < pt3.x)
    } else {
        (pt2.y > pt1.y) == (pt2.y < pt3.y)
    }
}

/// True when the open intervals [seg1a, seg1b] and [seg2a, seg2b] overlap.
pub fn horz_segments_overlap(mut seg1a: i64, mut seg1b: i64, mut seg2a: i64, mut seg2b: i64) -> bool {
    if seg1a > seg1b {
        std::mem::swap(&mut seg1a, &mut seg1b);
    }
    if seg2a > seg2b {
        std::mem::swap(&mut seg2a, &mut seg2b);
    }
    seg1a < seg2b && seg2a < seg1b
}

/// Intersection of the X intervals a1..a2 and b1..b2 (either order).
/// Returns `None` unless the overlap has positive length.
pub fn get_overlap(a1: i64, a2: i64, b1: i64, b2: i64) -> Option<(i64, i64)> {
    let (a_lo, a_hi) = if a1 < a2 { (a1, a2) } else { (a2, a1) };
    let (b_lo, b_hi) = if b1 < b2 { (b1, b2) } else { (b2, b1) };
    let left = a_lo.max(b_lo);
    let right = a_hi.min(b_hi);
    if left < right {
        Some((left, right))
    } else {
        None
    }
}

#[inline]
pub(crate) fn distance_sqrd(pt1: IntPoint, pt2: IntPoint) -> f64 {
    let dx = pt1.x as f64 - pt2.x as f64;
    let dy = pt1.y as f64 - pt2.y as f64;
    dx * dx + dy * dy
}

/// Squared perpendicular distance from `pt` to the line through ln1 and ln2.
pub(crate) fn distance_from_line_sqrd(pt: IntPoint, ln1: IntPoint, ln2: IntPoint) -> f64 {
    let a = (ln1.y - ln2.y) as f64;
    let b = (ln2.x - ln1.x) as f64;
    let c = a * ln1.x as f64 + b * ln1.y as f64;
    let c = a * pt.x as f64 + b * pt.y as f64 - c;
    (c * c) / (a * a + b * b)
}

/// Near-collinearity test. The point lying geometrically between the other two
/// is the one measured against the line, so spikes are caught too.
pub(crate) fn slopes_near_collinear(pt1: IntPoint, pt2: IntPoint, pt3: IntPoint, dist_sqrd: f64) -> bool {
    if (pt1.x - pt2.x).abs() > (pt1.y - pt2.y).abs() {
        if (pt1.x > pt2.x) == (pt1.x < pt3.x) {
            distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
        } else if (pt2.x > pt1.x) == (pt2.x < pt3.x) {
            distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
        } else {
            distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
        }
    } else if (pt1.y > pt2.y) == (pt1.y < pt3.y) {
        distance_from_line_sqrd(pt1, pt2, pt3) < dist_sqrd
    } else if (pt2.y > pt1.y) == (pt2.y < pt3.y) {
        distance_from_line_sqrd(pt2, pt1, pt3) < dist_sqrd
    } else {
        distance_from_line_sqrd(pt3, pt1, pt2) < dist_sqrd
    }
}

#[inline]
pub(crate) fn points_are_close(pt1: IntPoint, pt2: IntPoint, dist_sqrd: f64) -> bool {
    distance_sqrd(pt1, pt2) <= dist_sqrd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(x: i64, y: i64, size: i64) -> Path {
        vec![
            IntPoint::new(x, y),
            IntPoint::new(x + size, y),
            IntPoint::new(x + size, y + size),
            IntPoint::new(x, y + size),
        ]
    }

    #[test]
    fn area_sign_follows_orientation() {
        let mut sq = square(0, 0, 10);
        assert_eq!(area(&sq), 100.0);
        assert!(orientation(&sq));
        sq.reverse();
        assert_eq!(area(&sq), -100.0);
        assert!(!orientation(&sq));
    }

    #[test]
    fn area_of_degenerate_is_zero() {
        assert_eq!(area(&[IntPoint::new(0, 0), IntPoint::new(5, 5)]), 0.0);
    }

    #[test]
    fn point_in_polygon_cases() {
        let sq = square(0, 0, 10);
        assert_eq!(point_in_polygon(IntPoint::new(5, 5), &sq), PointInPolygon::Inside);
        assert_eq!(point_in_polygon(IntPoint::new(15, 5), &sq), PointInPolygon::Outside);
        assert_eq!(point_in_polygon(IntPoint::new(10, 5), &sq), PointInPolygon::OnBoundary);
        assert_eq!(point_in_polygon(IntPoint::new(0, 0), &sq), PointInPolygon::OnBoundary);
        assert_eq!(point_in_polygon(IntPoint::new(5, 10), &sq), PointInPolygon::OnBoundary);
    }

    #[test]
    fn slopes_equal_small_and_full_range() {
        let a = IntPoint::new(0, 0);
        let b = IntPoint::new(2, 2);
        let c = IntPoint::new(5, 5);
        assert!(slopes_equal3(a, b, c, false));
        assert!(slopes_equal3(a, b, c, true));
        assert!(!slopes_equal3(a, b, IntPoint::new(5, 6), false));

        // Products here exceed i64 but are exact in i128.
        let big = HI_RANGE / 2;
        let p1 = IntPoint::new(-big, -big);
        let p2 = IntPoint::new(0, 0);
        let p3 = IntPoint::new(big, big);
        assert!(slopes_equal3(p1, p2, p3, true));
        assert!(!slopes_equal3(p1, p2, IntPoint::new(big, big - 1), true));
        assert!(slopes_equal4(p1, p2, p2, p3, true));
    }

    #[test]
    fn range_test_switches_and_rejects() {
        assert_eq!(range_test(IntPoint::new(10, -10), false), Ok(false));
        assert_eq!(range_test(IntPoint::new(LO_RANGE + 1, 0), false), Ok(true));
        assert_eq!(range_test(IntPoint::new(0, 0), true), Ok(true));
        assert!(range_test(IntPoint::new(0, HI_RANGE + 1), false).is_err());
        assert!(range_test(IntPoint::new(i64::MIN, 0), true).is_err());
    }

    #[test]
    fn between_and_overlap_helpers() {
        let a = IntPoint::new(0, 0);
        let c = IntPoint::new(10, 0);
        assert!(pt2_is_between_pt1_and_pt3(a, IntPoint::new(4, 0), c));
        assert!(!pt2_is_between_pt1_and_pt3(a, IntPoint::new(14, 0), c));
        assert!(!pt2_is_between_pt1_and_pt3(a, a, c));

        assert!(horz_segments_overlap(0, 10, 9, 20));
        assert!(!horz_segments_overlap(0, 10, 10, 20));
        assert!(horz_segments_overlap(10, 0, 20, 5));

        assert_eq!(get_overlap(0, 10, 12, 4), Some((4, 10)));
        assert_eq!(get_overlap(0, 10, 10, 20), None);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round(2.5), 3);
        assert_eq!(round(-2.5), -3);
        assert_eq!(round(2.49), 2);
    }

    #[test]
    fn near_collinear_detects_spike() {
        let a = IntPoint::new(0, 0);
        let b = IntPoint::new(10, 1);
        let c = IntPoint::new(20, 0);
        assert!(slopes_near_collinear(a, b, c, 2.0));
        assert!(!slopes_near_collinear(a, IntPoint::new(10, 5), c, 2.0));
    }
}
