// Copyright 2025 Lars Brubaker
// Boolean operation results checked by area and by vertex sets.

mod helpers;

use approx::assert_relative_eq;
use helpers::{clip, net_area, path, rect, sorted_points, star, total_abs_area};
use vatti_clip::{area, ClipType, Clipper, FillRule, PolyKind};

fn overlapping_squares() -> (Vec<vatti_clip::Path>, Vec<vatti_clip::Path>) {
    (vec![rect(0, 0, 10, 10)], vec![rect(5, 5, 15, 15)])
}

#[test]
fn squares_intersection() {
    let (a, b) = overlapping_squares();
    let out = clip(ClipType::Intersection, &a, &b, FillRule::NonZero);
    assert_eq!(out.len(), 1);
    assert_eq!(net_area(&out), 25.0);
    assert_eq!(sorted_points(&out[0]), sorted_points(&rect(5, 5, 10, 10)));
}

#[test]
fn squares_union() {
    let (a, b) = overlapping_squares();
    let out = clip(ClipType::Union, &a, &b, FillRule::NonZero);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 8);
    assert_eq!(net_area(&out), 175.0);
}

#[test]
fn squares_difference() {
    let (a, b) = overlapping_squares();
    let out = clip(ClipType::Difference, &a, &b, FillRule::NonZero);
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].len(), 6);
    assert_eq!(net_area(&out), 75.0);

    let reverse = clip(ClipType::Difference, &b, &a, FillRule::NonZero);
    assert_eq!(net_area(&reverse), 75.0);
}

#[test]
fn squares_xor() {
    let (a, b) = overlapping_squares();
    let out = clip(ClipType::Xor, &a, &b, FillRule::NonZero);
    assert_eq!(net_area(&out), 150.0);
    assert!(out.iter().all(|p| area(p) > 0.0));
}

#[test]
fn every_operation_is_positive_for_outers() {
    let (a, b) = overlapping_squares();
    for op in [ClipType::Intersection, ClipType::Union, ClipType::Difference] {
        let out = clip(op, &a, &b, FillRule::EvenOdd);
        assert!(out.iter().all(|p| area(p) > 0.0), "{:?} produced a negative outer", op);
    }
}

#[test]
fn disjoint_operands() {
    let a = vec![rect(0, 0, 10, 10)];
    let b = vec![rect(20, 0, 30, 10)];
    assert!(clip(ClipType::Intersection, &a, &b, FillRule::NonZero).is_empty());
    assert_eq!(clip(ClipType::Union, &a, &b, FillRule::NonZero).len(), 2);
    assert_eq!(net_area(&clip(ClipType::Difference, &a, &b, FillRule::NonZero)), 100.0);
    assert_eq!(net_area(&clip(ClipType::Xor, &a, &b, FillRule::NonZero)), 200.0);
}

#[test]
fn empty_clip_set() {
    let a = vec![rect(0, 0, 10, 10)];
    assert!(clip(ClipType::Intersection, &a, &[], FillRule::NonZero).is_empty());
    assert_eq!(net_area(&clip(ClipType::Union, &a, &[], FillRule::NonZero)), 100.0);
    assert_eq!(net_area(&clip(ClipType::Difference, &a, &[], FillRule::NonZero)), 100.0);
    assert_eq!(net_area(&clip(ClipType::Xor, &a, &[], FillRule::NonZero)), 100.0);
    assert!(clip(ClipType::Difference, &[], &a, FillRule::NonZero).is_empty());
}

#[test]
fn clip_contained_in_subject_makes_a_hole() {
    let a = vec![rect(0, 0, 30, 30)];
    let b = vec![rect(10, 10, 20, 20)];
    let out = clip(ClipType::Difference, &a, &b, FillRule::NonZero);
    assert_eq!(out.len(), 2);
    assert_eq!(out.iter().filter(|p| area(p) < 0.0).count(), 1);
    assert_eq!(net_area(&out), 800.0);
    assert_eq!(total_abs_area(&out), 1000.0);
}

#[test]
fn windows_outside_the_filled_area_clip_to_nothing() {
    let mut hole = rect(10, 10, 20, 20);
    hole.reverse();
    let donut = vec![rect(0, 0, 30, 30), hole];
    for window in [rect(40, 0, 50, 10), rect(12, 12, 18, 18)] {
        for fill in [FillRule::EvenOdd, FillRule::NonZero] {
            assert!(clip(ClipType::Intersection, &donut, &[window.clone()], fill).is_empty());
        }
    }
    // A window straddling the rim keeps only the filled part.
    let rim = clip(ClipType::Intersection, &donut, &[rect(5, 12, 15, 18)], FillRule::NonZero);
    assert_eq!(net_area(&rim), 30.0);
}

#[test]
fn intersection_with_self_is_identity() {
    let l_shape = path(&[(0, 0), (20, 0), (20, 10), (10, 10), (10, 20), (0, 20)]);
    let a = vec![l_shape.clone()];
    for op in [ClipType::Intersection, ClipType::Union] {
        let out = clip(op, &a, &a, FillRule::NonZero);
        assert_eq!(out.len(), 1, "{:?}", op);
        assert_eq!(sorted_points(&out[0]), sorted_points(&l_shape), "{:?}", op);
        assert_eq!(area(&out[0]), area(&l_shape).abs(), "{:?}", op);
    }
}

#[test]
fn xor_matches_union_of_differences() {
    let a = vec![star(0, 0, 1000.0, 400.0, 7)];
    let b = vec![star(300, 200, 900.0, 300.0, 5)];
    let xor = clip(ClipType::Xor, &a, &b, FillRule::NonZero);
    let ab = clip(ClipType::Difference, &a, &b, FillRule::NonZero);
    let ba = clip(ClipType::Difference, &b, &a, FillRule::NonZero);
    let rebuilt = clip(ClipType::Union, &ab, &ba, FillRule::NonZero);
    assert_relative_eq!(net_area(&xor), net_area(&rebuilt), max_relative = 1e-4);
    assert_relative_eq!(net_area(&xor), net_area(&ab) + net_area(&ba), max_relative = 1e-4);
}

#[test]
fn partition_property_holds() {
    let pairs = [
        (star(0, 0, 1000.0, 400.0, 7), star(300, 200, 900.0, 300.0, 5)),
        (rect(0, 0, 100, 50), star(50, 25, 60.0, 20.0, 6)),
        (
            path(&[(0, 0), (40, 0), (40, 40), (30, 40), (30, 10), (10, 10), (10, 40), (0, 40)]),
            rect(-5, 20, 45, 30),
        ),
    ];
    for (a, b) in pairs {
        let (sa, sb) = (vec![a.clone()], vec![b.clone()]);
        let union = net_area(&clip(ClipType::Union, &sa, &sb, FillRule::NonZero));
        let inter = net_area(&clip(ClipType::Intersection, &sa, &sb, FillRule::NonZero));
        let expected = area(&a).abs() + area(&b).abs() - inter;
        assert_relative_eq!(union, expected, max_relative = 1e-3);
    }
}

#[test]
fn union_round_trip_is_stable() {
    let a = vec![star(0, 0, 1000.0, 400.0, 7)];
    let b = vec![star(300, 200, 900.0, 300.0, 5), rect(-200, -200, 200, 200)];
    let first = clip(ClipType::Union, &a, &b, FillRule::NonZero);
    let second = clip(ClipType::Union, &first, &[], FillRule::NonZero);
    assert_eq!(first.len(), second.len());
    assert_relative_eq!(net_area(&first), net_area(&second), max_relative = 1e-9);
}

#[test]
fn repeated_execution_is_deterministic() {
    let mut c = Clipper::new();
    c.add_path(&star(0, 0, 1000.0, 400.0, 7), PolyKind::Subject, true).unwrap();
    c.add_path(&star(300, 200, 900.0, 300.0, 5), PolyKind::Clip, true).unwrap();
    let first = c.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
    let union = c.execute(ClipType::Union, FillRule::NonZero).unwrap();
    let again = c.execute(ClipType::Intersection, FillRule::NonZero).unwrap();
    assert_eq!(first, again);
    assert!(net_area(&union) > net_area(&first));
}

#[test]
fn mixed_fill_rules_per_operand() {
    // The subject overlaps itself; the clip covers everything.
    let subject = vec![rect(0, 0, 20, 20), rect(10, 10, 30, 30)];
    let cover = vec![rect(-10, -10, 40, 40)];
    let mut c = Clipper::new();
    c.add_paths(&subject, PolyKind::Subject, true).unwrap();
    c.add_paths(&cover, PolyKind::Clip, true).unwrap();
    let even = c
        .execute_with(ClipType::Intersection, FillRule::EvenOdd, FillRule::NonZero)
        .unwrap();
    let nonzero = c
        .execute_with(ClipType::Intersection, FillRule::NonZero, FillRule::NonZero)
        .unwrap();
    assert_eq!(net_area(&even), 600.0);
    assert_eq!(net_area(&nonzero), 700.0);
}

#[test]
fn clear_drops_every_path() {
    let mut c = Clipper::new();
    c.add_path(&rect(0, 0, 10, 10), PolyKind::Subject, true).unwrap();
    assert_eq!(c.bounds().right, 10);
    c.clear();
    assert!(c.execute(ClipType::Union, FillRule::NonZero).unwrap().is_empty());
}
