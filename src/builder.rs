// Copyright 2025 Lars Brubaker
// License: MIT
//
// Turns input paths into edges and local minima.
//
// Each accepted path is appended to the edge arena as a ring of edges. The
// ring is then cut into bounds: monotone chains that run from a local minimum
// (largest Y) up to a local maximum, linked through `next_in_lml`. Every
// minimum records its left and right bound; the sweep later inserts the pair
// into the active edge list when its scanbeam is reached.
//
// Open paths get a Skip edge where the ring closes, so each of their ends
// can start a bound that has only one side.

use crate::edge::{Edge, EdgeIdx, EdgeSide, LocalMinimum, OutIdx, PolyKind};
use crate::error::ClipError;
use crate::geom::{pt2_is_between_pt1_and_pt3, range_test, slopes_equal3, IntPoint, IntRect};

#[derive(Clone, Debug, Default)]
pub struct EdgeBuilder {
    pub edges: Vec<Edge>,
    pub minima: Vec<LocalMinimum>,
    pub use_full_range: bool,
    pub has_open_paths: bool,
}

impl EdgeBuilder {
    pub fn new() -> Self {
        EdgeBuilder::default()
    }

    pub fn clear(&mut self) {
        self.edges.clear();
        self.minima.clear();
        self.use_full_range = false;
        self.has_open_paths = false;
    }

    /// Adds one path. `Ok(false)` means the path had too few distinct
    /// vertices to matter and nothing was stored.
    pub fn add_path(
        &mut self,
        path: &[IntPoint],
        kind: PolyKind,
        closed: bool,
        preserve_collinear: bool,
    ) -> Result<bool, ClipError> {
        if !closed && kind == PolyKind::Clip {
            return Err(ClipError::OpenClipPath);
        }
        if path.is_empty() {
            return Ok(false);
        }

        let mut high = path.len() - 1;
        if closed {
            while high > 0 && path[high] == path[0] {
                high -= 1;
            }
        }
        while high > 0 && path[high] == path[high - 1] {
            high -= 1;
        }
        if (closed && high < 2) || (!closed && high < 1) {
            return Ok(false);
        }

        let mut full = self.use_full_range;
        for &pt in &path[..=high] {
            full = range_test(pt, full)?;
        }
        self.use_full_range = full;

        // 1. One edge per vertex, linked into a ring.
        let base = self.edges.len();
        let n = high + 1;
        for (i, &pt) in path[..=high].iter().enumerate() {
            let next = base + (i + 1) % n;
            let prev = base + (i + n - 1) % n;
            self.edges.push(Edge::new(pt, next, prev));
        }

        // 2. Drop duplicate vertices, and collinear vertices of closed paths.
        let mut e_start = base;
        let mut e = e_start;
        let mut loop_stop = e_start;
        loop {
            let next = self.edges[e].next;
            // Open paths may start and end on the same point.
            if self.edges[e].curr == self.edges[next].curr && (closed || next != e_start) {
                if e == next {
                    break;
                }
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                loop_stop = e;
                continue;
            }
            let prev = self.edges[e].prev;
            if prev == next {
                break;
            }
            let (p, c, nx) = (self.edges[prev].curr, self.edges[e].curr, self.edges[next].curr);
            if closed
                && slopes_equal3(p, c, nx, full)
                && (!preserve_collinear || !pt2_is_between_pt1_and_pt3(p, c, nx))
            {
                if e == e_start {
                    e_start = next;
                }
                e = self.remove_edge(e);
                e = self.edges[e].prev;
                loop_stop = e;
                continue;
            }
            e = self.edges[e].next;
            if e == loop_stop || (!closed && self.edges[e].next == e_start) {
                break;
            }
        }

        if (!closed && e == self.edges[e].next) || (closed && self.edges[e].prev == self.edges[e].next) {
            self.edges.truncate(base);
            return Ok(false);
        }

        if !closed {
            let last = self.edges[e_start].prev;
            self.edges[last].out_idx = OutIdx::Skip;
        }

        // 3. Orient each edge bottom to top.
        let mut is_flat = true;
        e = e_start;
        loop {
            self.init_edge2(e, kind);
            e = self.edges[e].next;
            if is_flat && self.edges[e].curr.y != self.edges[e_start].curr.y {
                is_flat = false;
            }
            if e == e_start {
                break;
            }
        }

        // 4. Register bounds with the minima list.
        if is_flat {
            if closed {
                self.edges.truncate(base);
                return Ok(false);
            }
            self.add_flat_open_path(e);
            self.has_open_paths = true;
            return Ok(true);
        }
        if !closed {
            self.has_open_paths = true;
        }

        // An open path whose ends meet would loop forever below.
        let last = self.edges[e].prev;
        if self.edges[last].bot == self.edges[last].top {
            e = self.edges[e].next;
        }

        let mut e_min: Option<EdgeIdx> = None;
        loop {
            e = find_next_loc_min(&self.edges, e);
            if Some(e) == e_min {
                break;
            }
            if e_min.is_none() {
                e_min = Some(e);
            }

            // e and its prev share a minimum; the steeper-left one starts the left bound.
            let y = self.edges[e].bot.y;
            let prev = self.edges[e].prev;
            let (left, right, left_is_forward) = if self.edges[e].dx < self.edges[prev].dx {
                (prev, e, false)
            } else {
                (e, prev, true)
            };

            let wind_delta = if !closed {
                0
            } else if self.edges[left].next == right {
                -1
            } else {
                1
            };
            self.edges[left].wind_delta = wind_delta;
            self.edges[right].wind_delta = -wind_delta;

            let mut e1 = self.process_bound(left, left_is_forward);
            if self.edges[e1].out_idx == OutIdx::Skip {
                e1 = self.process_bound(e1, left_is_forward);
            }
            let mut e2 = self.process_bound(right, !left_is_forward);
            if self.edges[e2].out_idx == OutIdx::Skip {
                e2 = self.process_bound(e2, !left_is_forward);
            }

            let mut lm = LocalMinimum {
                y,
                left_bound: Some(left),
                right_bound: Some(right),
            };
            if self.edges[left].out_idx == OutIdx::Skip {
                lm.left_bound = None;
            } else if self.edges[right].out_idx == OutIdx::Skip {
                lm.right_bound = None;
            }
            self.minima.push(lm);
            e = if left_is_forward { e1 } else { e2 };
        }
        Ok(true)
    }

    /// Bounding rectangle of everything added so far; all zero when empty.
    pub fn bounds(&self) -> IntRect {
        let mut rect: Option<IntRect> = None;
        for lm in &self.minima {
            for bound in [lm.left_bound, lm.right_bound].into_iter().flatten() {
                let mut cur = Some(bound);
                while let Some(i) = cur {
                    let edge = &self.edges[i];
                    for pt in [edge.bot, edge.top] {
                        rect = Some(match rect {
                            None => IntRect {
                                left: pt.x,
                                top: pt.y,
                                right: pt.x,
                                bottom: pt.y,
                            },
                            Some(r) => IntRect {
                                left: r.left.min(pt.x),
                                top: r.top.min(pt.y),
                                right: r.right.max(pt.x),
                                bottom: r.bottom.max(pt.y),
                            },
                        });
                    }
                    cur = edge.next_in_lml;
                }
            }
        }
        rect.unwrap_or_default()
    }

    /// Unlinks `e` from its ring and returns its successor. The slot stays in
    /// the arena but is no longer reachable.
    fn remove_edge(&mut self, e: EdgeIdx) -> EdgeIdx {
        let (prev, next) = (self.edges[e].prev, self.edges[e].next);
        self.edges[prev].next = next;
        self.edges[next].prev = prev;
        next
    }

    fn init_edge2(&mut self, e: EdgeIdx, kind: PolyKind) {
        let next_pt = self.edges[self.edges[e].next].curr;
        let edge = &mut self.edges[e];
        if edge.curr.y >= next_pt.y {
            edge.bot = edge.curr;
            edge.top = next_pt;
        } else {
            edge.top = edge.curr;
            edge.bot = next_pt;
        }
        edge.set_dx();
        edge.kind = kind;
    }

    /// A horizontal open path becomes a single right bound.
    fn add_flat_open_path(&mut self, mut e: EdgeIdx) {
        let last = self.edges[e].prev;
        self.edges[last].out_idx = OutIdx::Skip;
        let lm = LocalMinimum {
            y: self.edges[e].bot.y,
            left_bound: None,
            right_bound: Some(e),
        };
        self.edges[e].side = EdgeSide::Right;
        self.edges[e].wind_delta = 0;
        loop {
            let prev = self.edges[e].prev;
            if self.edges[e].bot.x != self.edges[prev].top.x {
                self.edges[e].reverse_horizontal();
            }
            let next = self.edges[e].next;
            if self.edges[next].out_idx == OutIdx::Skip {
                break;
            }
            self.edges[e].next_in_lml = Some(next);
            e = next;
        }
        self.minima.push(lm);
    }

    /// Links the bound starting at `e` through `next_in_lml`, walking forward
    /// or backward around the ring, and returns the first edge past the bound.
    fn process_bound(&mut self, mut e: EdgeIdx, next_is_forward: bool) -> EdgeIdx {
        let mut result = e;

        if self.edges[e].out_idx == OutIdx::Skip {
            // Edges beyond the skip edge get a minimum of their own.
            if next_is_forward {
                while self.edges[e].top.y == self.edges[self.edges[e].next].bot.y {
                    e = self.edges[e].next;
                }
                // Top horizontals belong to the opposite bound.
                while e != result && self.edges[e].is_horizontal() {
                    e = self.edges[e].prev;
                }
            } else {
                while self.edges[e].top.y == self.edges[self.edges[e].prev].bot.y {
                    e = self.edges[e].prev;
                }
                while e != result && self.edges[e].is_horizontal() {
                    e = self.edges[e].next;
                }
            }

            if e == result {
                result = if next_is_forward {
                    self.edges[e].next
                } else {
                    self.edges[e].prev
                };
            } else {
                e = if next_is_forward {
                    self.edges[result].next
                } else {
                    self.edges[result].prev
                };
                let lm = LocalMinimum {
                    y: self.edges[e].bot.y,
                    left_bound: None,
                    right_bound: Some(e),
                };
                self.edges[e].wind_delta = 0;
                result = self.process_bound(e, next_is_forward);
                self.minima.push(lm);
            }
            return result;
        }

        if self.edges[e].is_horizontal() {
            // Consecutive horizontals may head left before going right, and an
            // open path may put a horizontal right after its skip edge.
            let start = if next_is_forward {
                self.edges[e].prev
            } else {
                self.edges[e].next
            };
            if self.edges[start].is_horizontal() {
                if self.edges[start].bot.x != self.edges[e].bot.x
                    && self.edges[start].top.x != self.edges[e].top.x
                {
                    self.edges[e].reverse_horizontal();
                }
            } else if self.edges[start].bot.x != self.edges[e].bot.x {
                self.edges[e].reverse_horizontal();
            }
        }

        let e_start = e;
        if next_is_forward {
            loop {
                let next = self.edges[result].next;
                if self.edges[result].top.y == self.edges[next].bot.y && self.edges[next].out_idx != OutIdx::Skip {
                    result = next;
                } else {
                    break;
                }
            }
            let next = self.edges[result].next;
            if self.edges[result].is_horizontal() && self.edges[next].out_idx != OutIdx::Skip {
                // A top horizontal stays in this bound only if the preceding
                // edge meets its left end.
                let mut horz = result;
                while self.edges[self.edges[horz].prev].is_horizontal() {
                    horz = self.edges[horz].prev;
                }
                let before = self.edges[horz].prev;
                if self.edges[before].top.x > self.edges[next].top.x {
                    result = before;
                }
            }
            while e != result {
                let next = self.edges[e].next;
                self.edges[e].next_in_lml = Some(next);
                self.align_horizontal(e, e_start, self.edges[e].prev);
                e = next;
            }
            self.align_horizontal(e, e_start, self.edges[e].prev);
            self.edges[result].next
        } else {
            loop {
                let prev = self.edges[result].prev;
                if self.edges[result].top.y == self.edges[prev].bot.y && self.edges[prev].out_idx != OutIdx::Skip {
                    result = prev;
                } else {
                    break;
                }
            }
            let prev = self.edges[result].prev;
            if self.edges[result].is_horizontal() && self.edges[prev].out_idx != OutIdx::Skip {
                let mut horz = result;
                while self.edges[self.edges[horz].next].is_horizontal() {
                    horz = self.edges[horz].next;
                }
                let after = self.edges[horz].next;
                if self.edges[after].top.x >= self.edges[prev].top.x {
                    result = after;
                }
            }
            while e != result {
                let prev = self.edges[e].prev;
                self.edges[e].next_in_lml = Some(prev);
                self.align_horizontal(e, e_start, self.edges[e].next);
                e = prev;
            }
            self.align_horizontal(e, e_start, self.edges[e].next);
            self.edges[result].prev
        }
    }

    /// Flips a horizontal inside a bound so its bot meets the top of the edge below.
    #[inline]
    fn align_horizontal(&mut self, e: EdgeIdx, e_start: EdgeIdx, below: EdgeIdx) {
        if self.edges[e].is_horizontal() && e != e_start && self.edges[e].bot.x != self.edges[below].top.x {
            self.edges[e].reverse_horizontal();
        }
    }
}

/// Advances from `e` to the next edge that starts a local minimum. For a
/// horizontal minimum the result is the left-aligned edge.
fn find_next_loc_min(edges: &[Edge], mut e: EdgeIdx) -> EdgeIdx {
    loop {
        while edges[e].bot != edges[edges[e].prev].bot || edges[e].curr == edges[e].top {
            e = edges[e].next;
        }
        if !edges[e].is_horizontal() && !edges[edges[e].prev].is_horizontal() {
            break;
        }
        while edges[edges[e].prev].is_horizontal() {
            e = edges[e].prev;
        }
        let e2 = e;
        while edges[e].is_horizontal() {
            e = edges[e].next;
        }
        if edges[e].top.y == edges[edges[e].prev].bot.y {
            // Only an intermediate horizontal.
            continue;
        }
        if edges[edges[e2].prev].bot.x < edges[e].bot.x {
            e = e2;
        }
        break;
    }
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{HI_RANGE, LO_RANGE};

    fn pts(coords: &[(i64, i64)]) -> Vec<IntPoint> {
        coords.iter().map(|&p| p.into()).collect()
    }

    fn bound_len(b: &EdgeBuilder, start: EdgeIdx) -> usize {
        let mut n = 1;
        let mut e = start;
        while let Some(next) = b.edges[e].next_in_lml {
            n += 1;
            e = next;
        }
        n
    }

    #[test]
    fn triangle_has_one_minimum() {
        let mut b = EdgeBuilder::new();
        let ok = b
            .add_path(&pts(&[(0, 0), (10, 0), (5, 10)]), PolyKind::Subject, true, false)
            .unwrap();
        assert!(ok);
        assert_eq!(b.minima.len(), 1);
        let lm = b.minima[0];
        assert_eq!(lm.y, 10);
        let (l, r) = (lm.left_bound.unwrap(), lm.right_bound.unwrap());
        assert_eq!(b.edges[l].wind_delta, -b.edges[r].wind_delta);
        assert_eq!(b.edges[l].wind_delta.abs(), 1);
        assert_eq!(b.edges[l].bot, IntPoint::new(5, 10));
        // The top horizontal joins exactly one of the two bounds.
        assert_eq!(bound_len(&b, l) + bound_len(&b, r), 3);
    }

    #[test]
    fn degenerate_paths_are_rejected() {
        let mut b = EdgeBuilder::new();
        assert!(!b.add_path(&[], PolyKind::Subject, true, false).unwrap());
        assert!(!b
            .add_path(&pts(&[(0, 0), (10, 10)]), PolyKind::Subject, true, false)
            .unwrap());
        assert!(!b
            .add_path(&pts(&[(0, 0), (5, 5), (10, 10)]), PolyKind::Subject, true, false)
            .unwrap());
        assert!(!b
            .add_path(&pts(&[(3, 3), (3, 3), (3, 3), (3, 3)]), PolyKind::Clip, true, false)
            .unwrap());
        assert!(!b
            .add_path(&pts(&[(0, 4), (9, 4), (5, 4)]), PolyKind::Subject, true, false)
            .unwrap());
        assert!(b.minima.is_empty());
        assert!(b.edges.is_empty());
    }

    #[test]
    fn duplicates_and_closing_point_are_ignored() {
        let mut b = EdgeBuilder::new();
        let sq = pts(&[(0, 0), (0, 0), (10, 0), (10, 10), (10, 10), (0, 10), (0, 0)]);
        assert!(b.add_path(&sq, PolyKind::Subject, true, false).unwrap());
        assert_eq!(b.minima.len(), 1);
        assert_eq!(b.minima[0].y, 10);
    }

    #[test]
    fn open_clip_path_is_an_error() {
        let mut b = EdgeBuilder::new();
        let r = b.add_path(&pts(&[(0, 0), (5, 5)]), PolyKind::Clip, false, false);
        assert_eq!(r, Err(ClipError::OpenClipPath));
    }

    #[test]
    fn open_line_has_one_sided_minimum() {
        let mut b = EdgeBuilder::new();
        assert!(b
            .add_path(&pts(&[(0, 0), (10, 10)]), PolyKind::Subject, false, false)
            .unwrap());
        assert!(b.has_open_paths);
        assert_eq!(b.minima.len(), 1);
        let lm = b.minima[0];
        assert_eq!(lm.y, 10);
        assert!(lm.left_bound.is_none() != lm.right_bound.is_none());
        let e = lm.left_bound.or(lm.right_bound).unwrap();
        assert_eq!(b.edges[e].wind_delta, 0);
    }

    #[test]
    fn flat_open_path_is_kept() {
        let mut b = EdgeBuilder::new();
        assert!(b
            .add_path(&pts(&[(0, 5), (10, 5), (20, 5)]), PolyKind::Subject, false, false)
            .unwrap());
        assert_eq!(b.minima.len(), 1);
        assert!(b.minima[0].left_bound.is_none());
    }

    #[test]
    fn range_is_checked() {
        let mut b = EdgeBuilder::new();
        let big = pts(&[(0, 0), (LO_RANGE + 10, 0), (0, 10)]);
        assert!(b.add_path(&big, PolyKind::Subject, true, false).unwrap());
        assert!(b.use_full_range);

        let bad = pts(&[(0, 0), (HI_RANGE + 1, 0), (0, 10)]);
        let err = b.add_path(&bad, PolyKind::Subject, true, false).unwrap_err();
        assert_eq!(err, ClipError::CoordinateOutOfRange { x: HI_RANGE + 1, y: 0 });
    }

    #[test]
    fn bounds_cover_all_paths() {
        let mut b = EdgeBuilder::new();
        assert_eq!(b.bounds(), IntRect::default());
        b.add_path(&pts(&[(0, 0), (10, 0), (10, 10), (0, 10)]), PolyKind::Subject, true, false)
            .unwrap();
        b.add_path(&pts(&[(-5, 3), (4, 20), (2, 2)]), PolyKind::Clip, true, false)
            .unwrap();
        assert_eq!(
            b.bounds(),
            IntRect {
                left: -5,
                top: 0,
                right: 10,
                bottom: 20
            }
        );
        b.clear();
        assert!(b.minima.is_empty());
        assert!(!b.use_full_range);
    }
}
