// Copyright 2025 Lars Brubaker
// License: MIT
//
// Convenience operations on paths built on top of the engine, plus a few
// vertex-level cleanups that do not need a sweep at all.

use crate::clipper::{ClipOptions, ClipType, Clipper, FillRule};
use crate::edge::PolyKind;
use crate::error::ClipError;
use crate::geom::{points_are_close, slopes_near_collinear, IntPoint, Path, Paths};

/// Distance used by `clean_polygon` callers that have no better value:
/// just over sqrt(2), so diagonal neighbours one unit apart are merged.
pub const DEFAULT_CLEAN_DISTANCE: f64 = 1.415;

fn simple_union(paths: &[Path], fill_rule: FillRule) -> Result<Paths, ClipError> {
    let mut c = Clipper::with_options(ClipOptions {
        strictly_simple: true,
        ..ClipOptions::default()
    });
    c.add_paths(paths, PolyKind::Subject, true)?;
    c.execute(ClipType::Union, fill_rule)
}

/// Resolves self-intersections: the union of the polygon with itself,
/// split into strictly simple contours.
pub fn simplify_polygon(path: &Path, fill_rule: FillRule) -> Result<Paths, ClipError> {
    simple_union(std::slice::from_ref(path), fill_rule)
}

pub fn simplify_polygons(paths: &Paths, fill_rule: FillRule) -> Result<Paths, ClipError> {
    simple_union(paths, fill_rule)
}

/// Removes vertices that lie within `distance` of their predecessor, that
/// leave their neighbours within `distance` of each other, or that lie within
/// `distance` of the line through their neighbours. Returns an empty path if
/// fewer than three vertices survive.
pub fn clean_polygon(path: &Path, distance: f64) -> Path {
    let n = path.len();
    if n == 0 {
        return Vec::new();
    }
    let mut next: Vec<usize> = (0..n).map(|i| (i + 1) % n).collect();
    let mut prev: Vec<usize> = (0..n).map(|i| (i + n - 1) % n).collect();
    let mut visited = vec![false; n];
    let dist_sqrd = distance * distance;

    let mut size = n;
    let mut op = 0;
    while !visited[op] && next[op] != prev[op] {
        let (p, c, nx) = (path[prev[op]], path[op], path[next[op]]);
        if points_are_close(c, p, dist_sqrd) {
            op = exclude(op, &mut next, &mut prev);
            visited[op] = false;
            size -= 1;
        } else if points_are_close(p, nx, dist_sqrd) {
            let after = next[op];
            let kept = exclude(after, &mut next, &mut prev);
            visited[kept] = false;
            op = exclude(op, &mut next, &mut prev);
            visited[op] = false;
            size -= 2;
        } else if slopes_near_collinear(p, c, nx, dist_sqrd) {
            op = exclude(op, &mut next, &mut prev);
            visited[op] = false;
            size -= 1;
        } else {
            visited[op] = true;
            op = next[op];
        }
    }

    if size < 3 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        out.push(path[op]);
        op = next[op];
    }
    out
}

/// Unlinks `op` and returns its predecessor, which must be looked at again.
fn exclude(op: usize, next: &mut [usize], prev: &mut [usize]) -> usize {
    let p = prev[op];
    let nx = next[op];
    next[p] = nx;
    prev[nx] = p;
    p
}

pub fn clean_polygons(paths: &Paths, distance: f64) -> Paths {
    paths.iter().map(|p| clean_polygon(p, distance)).collect()
}

#[inline]
pub fn reverse_path(path: &mut Path) {
    path.reverse();
}

pub fn reverse_paths(paths: &mut Paths) {
    for p in paths.iter_mut() {
        p.reverse();
    }
}

/// The path moved by `delta`.
pub fn translate_path(path: &Path, delta: IntPoint) -> Path {
    path.iter()
        .map(|p| IntPoint::new(p.x + delta.x, p.y + delta.y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::area;

    fn path(coords: &[(i64, i64)]) -> Path {
        coords.iter().map(|&p| p.into()).collect()
    }

    #[test]
    fn clean_drops_close_and_collinear_points() {
        let p = path(&[(0, 0), (5, 0), (10, 0), (10, 10), (10, 10), (0, 10)]);
        let c = clean_polygon(&p, DEFAULT_CLEAN_DISTANCE);
        assert_eq!(c.len(), 4);
        assert_eq!(area(&c), area(&p));
    }

    #[test]
    fn clean_collapses_tiny_polygons() {
        let p = path(&[(0, 0), (1, 0), (1, 1)]);
        assert!(clean_polygon(&p, DEFAULT_CLEAN_DISTANCE).is_empty());
        assert!(clean_polygon(&Vec::new(), 1.0).is_empty());
        assert!(clean_polygon(&path(&[(0, 0), (50, 50)]), 1.0).is_empty());
    }

    #[test]
    fn clean_keeps_a_clean_square() {
        let p = path(&[(0, 0), (10, 0), (10, 10), (0, 10)]);
        let c = clean_polygon(&p, DEFAULT_CLEAN_DISTANCE);
        assert_eq!(c.len(), 4);
        assert_eq!(clean_polygons(&vec![p.clone(), p], 1.0).len(), 2);
    }

    #[test]
    fn reverse_and_translate() {
        let mut p = path(&[(0, 0), (10, 0), (10, 10)]);
        let a = area(&p);
        reverse_path(&mut p);
        assert_eq!(area(&p), -a);
        let mut ps = vec![p.clone()];
        reverse_paths(&mut ps);
        assert_eq!(area(&ps[0]), a);
        let t = translate_path(&p, IntPoint::new(5, -3));
        assert_eq!(t[0], IntPoint::new(15, 7));
        assert_eq!(area(&t), area(&p));
    }
}
