// Copyright 2025 Lars Brubaker
// Shared test utilities for vatti-clip tests.

#![allow(dead_code)]

use vatti_clip::{area, ClipType, Clipper, FillRule, IntPoint, Path, Paths, PolyKind};

/// Build a path from `(x, y)` pairs.
pub fn path(coords: &[(i64, i64)]) -> Path {
    coords.iter().map(|&(x, y)| IntPoint::new(x, y)).collect()
}

/// Axis-aligned rectangle, wound so that its area is positive.
pub fn rect(left: i64, top: i64, right: i64, bottom: i64) -> Path {
    path(&[(left, top), (right, top), (right, bottom), (left, bottom)])
}

/// Regular star with `points` spikes; spikes alternate between the two radii.
pub fn star(cx: i64, cy: i64, outer: f64, inner: f64, points: usize) -> Path {
    (0..points * 2)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = i as f64 * std::f64::consts::PI / points as f64;
            IntPoint::new(cx + (r * a.cos()).round() as i64, cy + (r * a.sin()).round() as i64)
        })
        .collect()
}

/// Net signed area of a solution: outers count positive, holes negative.
pub fn net_area(paths: &Paths) -> f64 {
    paths.iter().map(|p| area(p)).sum()
}

/// Sum of the absolute contour areas.
pub fn total_abs_area(paths: &Paths) -> f64 {
    paths.iter().map(|p| area(p).abs()).sum()
}

/// Runs one closed-path operation with a fresh engine.
pub fn clip(op: ClipType, subject: &[Path], clip: &[Path], fill: FillRule) -> Paths {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyKind::Subject, true).unwrap();
    c.add_paths(clip, PolyKind::Clip, true).unwrap();
    let out = c.execute(op, fill).unwrap();
    verify_valid_output(&out);
    out
}

/// Vertex set of a path, sorted, for comparisons that ignore the start point
/// and direction.
pub fn sorted_points(p: &Path) -> Vec<(i64, i64)> {
    let mut pts: Vec<(i64, i64)> = p.iter().map(|q| (q.x, q.y)).collect();
    pts.sort_unstable();
    pts
}

/// Every contour has at least three vertices and no repeated neighbours.
pub fn verify_valid_output(paths: &Paths) {
    for (i, p) in paths.iter().enumerate() {
        assert!(p.len() >= 3, "contour {} has only {} vertices", i, p.len());
        for j in 0..p.len() {
            let next = p[(j + 1) % p.len()];
            assert_ne!(p[j], next, "contour {} repeats vertex {:?}", i, p[j]);
        }
        assert!(area(p) != 0.0, "contour {} has zero area", i);
    }
}
