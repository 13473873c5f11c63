// Copyright 2025 Lars Brubaker
// Hierarchical output: nesting, hole state and open paths.

mod helpers;

use helpers::{net_area, path, rect};
use vatti_clip::{area, ClipType, Clipper, FillRule, PolyKind, PolyTree};

fn tree_of(subject: &[vatti_clip::Path], clip: &[vatti_clip::Path], op: ClipType) -> PolyTree {
    let mut c = Clipper::new();
    c.add_paths(subject, PolyKind::Subject, true).unwrap();
    c.add_paths(clip, PolyKind::Clip, true).unwrap();
    c.execute_tree(op, FillRule::EvenOdd, FillRule::EvenOdd).unwrap()
}

#[test]
fn three_levels_of_nesting() {
    let nest = vec![rect(0, 0, 50, 50), rect(10, 10, 40, 40), rect(20, 20, 30, 30)];
    let tree = tree_of(&nest, &[], ClipType::Union);
    assert_eq!(tree.total(), 3);
    assert_eq!(tree.children().len(), 1);

    let outer = tree.children()[0];
    assert!(!tree.is_hole(outer));
    assert_eq!(tree.node(outer).parent(), None);
    assert_eq!(area(tree.node(outer).contour()), 2500.0);
    assert_eq!(tree.node(outer).child_count(), 1);

    let hole = tree.node(outer).children()[0];
    assert!(tree.is_hole(hole));
    assert_eq!(tree.node(hole).parent(), Some(outer));
    assert_eq!(area(tree.node(hole).contour()), -900.0);

    let island = tree.node(hole).children()[0];
    assert!(!tree.is_hole(island));
    assert_eq!(area(tree.node(island).contour()), 100.0);
    assert!(tree.node(island).children().is_empty());
}

#[test]
fn siblings_record_their_index() {
    let outer = vec![rect(0, 0, 100, 100)];
    let holes = vec![rect(10, 10, 20, 20), rect(40, 40, 50, 50), rect(70, 10, 90, 30)];
    let tree = tree_of(&outer, &holes, ClipType::Difference);
    assert_eq!(tree.children().len(), 1);
    let root = tree.node(tree.children()[0]);
    assert_eq!(root.child_count(), 3);
    for (i, &child) in root.children().iter().enumerate() {
        assert_eq!(tree.node(child).index(), i);
        assert!(tree.is_hole(child));
    }
}

#[test]
fn tree_and_flat_output_agree() {
    let subject = vec![rect(0, 0, 50, 50), rect(10, 10, 40, 40)];
    let clip = vec![rect(25, -10, 60, 60)];
    let mut c = Clipper::new();
    c.add_paths(&subject, PolyKind::Subject, true).unwrap();
    c.add_paths(&clip, PolyKind::Clip, true).unwrap();
    let flat = c.execute(ClipType::Xor, FillRule::EvenOdd).unwrap();
    let tree = c
        .execute_tree(ClipType::Xor, FillRule::EvenOdd, FillRule::EvenOdd)
        .unwrap();
    assert_eq!(tree.total(), flat.len());
    assert_eq!(net_area(&tree.to_paths()), net_area(&flat));
    assert_eq!(tree.closed_paths().len(), flat.len());
    assert!(tree.open_paths().is_empty());
}

#[test]
fn open_line_through_rectangle() {
    let line = path(&[(5, -10), (5, 20)]);
    let window = rect(0, 0, 10, 10);

    let mut c = Clipper::new();
    assert!(c.add_path(&line, PolyKind::Subject, false).unwrap());
    c.add_path(&window, PolyKind::Clip, true).unwrap();

    let inside = c
        .execute_tree(ClipType::Intersection, FillRule::NonZero, FillRule::NonZero)
        .unwrap();
    let open = inside.open_paths();
    assert_eq!(open.len(), 1);
    assert!(inside.closed_paths().is_empty());
    let mut ys: Vec<i64> = open[0].iter().map(|p| p.y).collect();
    ys.sort_unstable();
    assert_eq!(ys, vec![0, 10]);
    assert!(open[0].iter().all(|p| p.x == 5));

    let outside = c
        .execute_tree(ClipType::Difference, FillRule::NonZero, FillRule::NonZero)
        .unwrap();
    let pieces = outside.open_paths();
    assert_eq!(pieces.len(), 2);
    for piece in &pieces {
        assert_eq!(piece.len(), 2);
        assert!(piece.iter().all(|p| p.y <= 0 || p.y >= 10));
    }
    for &n in outside.children() {
        assert!(outside.node(n).is_open());
        assert_eq!(outside.node(n).parent(), None);
    }
}

#[test]
fn open_and_closed_subjects_together() {
    let mut c = Clipper::new();
    c.add_path(&rect(0, 0, 10, 10), PolyKind::Subject, true).unwrap();
    c.add_path(&path(&[(20, -5), (20, 15)]), PolyKind::Subject, false).unwrap();
    c.add_path(&rect(-5, 0, 30, 10), PolyKind::Clip, true).unwrap();
    let tree = c
        .execute_tree(ClipType::Intersection, FillRule::NonZero, FillRule::NonZero)
        .unwrap();
    assert_eq!(tree.closed_paths().len(), 1);
    assert_eq!(tree.open_paths().len(), 1);
    assert_eq!(net_area(&tree.closed_paths()), 100.0);
}

#[test]
fn empty_tree() {
    let tree = PolyTree::new();
    assert!(tree.is_empty());
    assert_eq!(tree.total(), 0);
    assert!(tree.to_paths().is_empty());
}
