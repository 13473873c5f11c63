// Copyright 2025 Lars Brubaker
// License: MIT
//
// Output contour arena.
//
// Every emitted vertex is an OutPt in one Vec; every contour is an OutRec in
// another. A contour's vertices form a circular doubly-linked ring through
// `next`/`prev` indices. `OutRec::pts` is the left-most end of the ring as the
// sweep builds it and `pts.prev` the right-most end.
//
// Merging two contours leaves the absorbed OutRec in place with `pts == None`
// and `idx` pointing at the survivor, so stale indices held by OutPts can be
// resolved with `get_out_rec`. Unlinked OutPts are simply never visited again.

use crate::edge::RecIdx;
use crate::geom::{
    get_dx, point_in_ring, pt2_is_between_pt1_and_pt3, slopes_equal3, IntPoint, Path, PointInPolygon,
};

/// Index into the OutPt arena.
pub type PtIdx = usize;

#[derive(Copy, Clone, Debug)]
pub struct OutPt {
    pub idx: RecIdx,
    pub pt: IntPoint,
    pub next: PtIdx,
    pub prev: PtIdx,
}

#[derive(Clone, Debug)]
pub struct OutRec {
    pub idx: RecIdx,
    pub is_hole: bool,
    pub is_open: bool,
    /// Nearest enclosing contour. A lookup link only.
    pub first_left: Option<RecIdx>,
    pub pts: Option<PtIdx>,
    pub bottom_pt: Option<PtIdx>,
}

/// Two output locations to be stitched together (or a ring to be split there)
/// once the sweep is done. `off_pt` disambiguates the shared segment.
#[derive(Copy, Clone, Debug)]
pub struct Join {
    pub op1: PtIdx,
    pub op2: PtIdx,
    pub off_pt: IntPoint,
}

/// A horizontal output run recorded while its partner is not yet known.
#[derive(Copy, Clone, Debug)]
pub struct GhostJoin {
    pub op: PtIdx,
    pub off_pt: IntPoint,
}

#[derive(Clone, Debug, Default)]
pub struct Contours {
    pub recs: Vec<OutRec>,
    pub pts: Vec<OutPt>,
}

impl Contours {
    pub fn new() -> Self {
        Contours::default()
    }

    pub fn create_rec(&mut self) -> RecIdx {
        let idx = self.recs.len();
        self.recs.push(OutRec {
            idx,
            is_hole: false,
            is_open: false,
            first_left: None,
            pts: None,
            bottom_pt: None,
        });
        idx
    }

    /// Starts the ring of `rec` with a single self-linked point.
    pub fn start_ring(&mut self, rec: RecIdx, pt: IntPoint) -> PtIdx {
        let op = self.pts.len();
        self.pts.push(OutPt {
            idx: rec,
            pt,
            next: op,
            prev: op,
        });
        self.recs[rec].pts = Some(op);
        op
    }

    /// Inserts a new point immediately before `at`.
    pub fn insert_before(&mut self, at: PtIdx, pt: IntPoint) -> PtIdx {
        let prev = self.pts[at].prev;
        let op = self.pts.len();
        self.pts.push(OutPt {
            idx: self.pts[at].idx,
            pt,
            next: at,
            prev,
        });
        self.pts[prev].next = op;
        self.pts[at].prev = op;
        op
    }

    /// Copies `op` into a new point placed after (or before) it.
    pub fn dup_out_pt(&mut self, op: PtIdx, insert_after: bool) -> PtIdx {
        let pt = self.pts[op].pt;
        if insert_after {
            let next = self.pts[op].next;
            self.insert_before(next, pt)
        } else {
            self.insert_before(op, pt)
        }
    }

    /// Links `a -> b`.
    #[inline]
    pub fn link(&mut self, a: PtIdx, b: PtIdx) {
        self.pts[a].next = b;
        self.pts[b].prev = a;
    }

    /// Reconnects two rings (or two places on one ring) through the point
    /// pairs `op1`/`op1b` and `op2`/`op2b`, where each `b` is a duplicate of
    /// its partner. `reverse` selects which way round the crossover goes.
    fn cross_link(&mut self, op1: PtIdx, op1b: PtIdx, op2: PtIdx, op2b: PtIdx, reverse: bool) {
        if reverse {
            self.link(op2, op1);
            self.link(op1b, op2b);
        } else {
            self.link(op1, op2);
            self.link(op2b, op1b);
        }
    }

    /// Joins the rings at `op1` and `op2` (which share a location) by
    /// duplicating both points and crossing the links over. Returns the
    /// duplicate of `op1`, which ends up on the other side of the seam.
    pub fn splice(&mut self, op1: PtIdx, op2: PtIdx, reverse: bool) -> PtIdx {
        let op1b = self.dup_out_pt(op1, !reverse);
        let op2b = self.dup_out_pt(op2, reverse);
        self.cross_link(op1, op1b, op2, op2b, reverse);
        op1b
    }

    /// Joins two horizontal runs, `op1..op1b` and `op2..op2b`, that overlap
    /// around `pt`. The runs must head in opposite directions. `discard_left`
    /// decides which side of `pt` loses its vertices.
    pub fn join_horz(
        &mut self,
        op1: PtIdx,
        op1b: PtIdx,
        op2: PtIdx,
        op2b: PtIdx,
        pt: IntPoint,
        discard_left: bool,
    ) -> bool {
        let dir1_ltr = self.pts[op1].pt.x <= self.pts[op1b].pt.x;
        let dir2_ltr = self.pts[op2].pt.x <= self.pts[op2b].pt.x;
        if dir1_ltr == dir2_ltr {
            return false;
        }
        let (op1, op1b) = self.horz_join_end(op1, dir1_ltr, pt, discard_left);
        let (op2, op2b) = self.horz_join_end(op2, dir2_ltr, pt, discard_left);
        self.cross_link(op1, op1b, op2, op2b, dir1_ltr == discard_left);
        true
    }

    /// Walks `op` along its run to `pt` and returns it with a fresh duplicate,
    /// inserting a vertex at `pt` first if none lies there.
    fn horz_join_end(&mut self, mut op: PtIdx, ltr: bool, pt: IntPoint, discard_left: bool) -> (PtIdx, PtIdx) {
        let insert_after = ltr != discard_left;
        loop {
            let (cur, next) = (self.pts[op].pt, self.pts[self.pts[op].next].pt);
            let advances = if ltr {
                next.x <= pt.x && next.x >= cur.x
            } else {
                next.x >= pt.x && next.x <= cur.x
            };
            if !advances || next.y != pt.y {
                break;
            }
            op = self.pts[op].next;
        }
        if !insert_after && self.pts[op].pt.x != pt.x {
            op = self.pts[op].next;
        }
        let mut opb = self.dup_out_pt(op, insert_after);
        if self.pts[opb].pt != pt {
            op = opb;
            self.pts[op].pt = pt;
            opb = self.dup_out_pt(op, insert_after);
        }
        (op, opb)
    }

    #[inline]
    pub fn next(&self, op: PtIdx) -> PtIdx {
        self.pts[op].next
    }

    #[inline]
    pub fn prev(&self, op: PtIdx) -> PtIdx {
        self.pts[op].prev
    }

    #[inline]
    pub fn pt(&self, op: PtIdx) -> IntPoint {
        self.pts[op].pt
    }

    /// Iterates the ring starting at `start`, following `next`.
    pub fn ring(&self, start: PtIdx) -> RingIter<'_> {
        RingIter {
            pts: &self.pts,
            start,
            cur: Some(start),
        }
    }

    /// Follows merge forwarding to the contour that currently owns `idx`.
    pub fn get_out_rec(&self, mut idx: RecIdx) -> RecIdx {
        while self.recs[idx].idx != idx {
            idx = self.recs[idx].idx;
        }
        idx
    }

    pub fn reverse_links(&mut self, start: PtIdx) {
        let mut p = start;
        loop {
            let next = self.pts[p].next;
            self.pts[p].next = self.pts[p].prev;
            self.pts[p].prev = next;
            p = next;
            if p == start {
                break;
            }
        }
    }

    /// Signed area of a ring, negated relative to `geom::area` of the same
    /// points in `next` order.
    pub fn ring_area(&self, start: PtIdx) -> f64 {
        let mut a = 0.0f64;
        for op in self.ring(start) {
            let p = self.pts[self.pts[op].prev].pt;
            let c = self.pts[op].pt;
            a += (p.x + c.x) as f64 * (p.y - c.y) as f64;
        }
        a * 0.5
    }

    pub fn rec_area(&self, rec: RecIdx) -> f64 {
        self.recs[rec].pts.map_or(0.0, |p| self.ring_area(p))
    }

    pub fn point_count(&self, start: Option<PtIdx>) -> usize {
        start.map_or(0, |s| self.ring(s).count())
    }

    pub fn point_in_ring(&self, pt: IntPoint, start: PtIdx) -> PointInPolygon {
        point_in_ring(pt, self.ring(start).map(|op| (self.pts[op].pt, self.pts[self.pts[op].next].pt)))
    }

    /// True when the ring at `op1` lies inside the ring at `op2`. Decided by the
    /// first vertex of `op1` that is not on `op2`'s boundary.
    pub fn poly2_contains_poly1(&self, op1: PtIdx, op2: PtIdx) -> bool {
        for op in self.ring(op1) {
            match self.point_in_ring(self.pts[op].pt, op2) {
                PointInPolygon::Inside => return true,
                PointInPolygon::Outside => return false,
                PointInPolygon::OnBoundary => {}
            }
        }
        true
    }

    /// The vertex with the largest Y (then smallest X). Where several vertices
    /// share that spot, the one whose neighbours fan out widest wins.
    pub fn bottom_pt(&self, mut pp: PtIdx) -> PtIdx {
        let mut dups: Option<PtIdx> = None;
        let mut p = self.pts[pp].next;
        while p != pp {
            let (ppt, cur) = (self.pts[p].pt, self.pts[pp].pt);
            if ppt.y > cur.y {
                pp = p;
                dups = None;
            } else if ppt.y == cur.y && ppt.x <= cur.x {
                if ppt.x < cur.x {
                    dups = None;
                    pp = p;
                } else if self.pts[p].next != pp && self.pts[p].prev != pp {
                    dups = Some(p);
                }
            }
            p = self.pts[p].next;
        }
        if let Some(mut d) = dups {
            while d != p {
                if !self.first_is_bottom_pt(p, d) {
                    pp = d;
                }
                d = self.pts[d].next;
                while self.pts[d].pt != self.pts[pp].pt {
                    d = self.pts[d].next;
                }
            }
        }
        pp
    }

    fn neighbour_dx(&self, op: PtIdx, forward: bool) -> f64 {
        let step = |p: PtIdx| if forward { self.pts[p].next } else { self.pts[p].prev };
        let mut p = step(op);
        while self.pts[p].pt == self.pts[op].pt && p != op {
            p = step(p);
        }
        get_dx(self.pts[op].pt, self.pts[p].pt).abs()
    }

    pub fn first_is_bottom_pt(&self, btm1: PtIdx, btm2: PtIdx) -> bool {
        let dx1p = self.neighbour_dx(btm1, false);
        let dx1n = self.neighbour_dx(btm1, true);
        let dx2p = self.neighbour_dx(btm2, false);
        let dx2n = self.neighbour_dx(btm2, true);
        if dx1p.max(dx1n) == dx2p.max(dx2n) && dx1p.min(dx1n) == dx2p.min(dx2n) {
            self.ring_area(btm1) > 0.0
        } else {
            (dx1p >= dx2p && dx1p >= dx2n) || (dx1n >= dx2p && dx1n >= dx2n)
        }
    }

    /// Of two contours, the one whose bottom point is lowest. Used to settle
    /// hole state when neither contour encloses the other.
    pub fn lowermost_rec(&mut self, rec1: RecIdx, rec2: RecIdx) -> RecIdx {
        let (Some(pts1), Some(pts2)) = (self.recs[rec1].pts, self.recs[rec2].pts) else {
            return rec1;
        };
        let b1 = match self.recs[rec1].bottom_pt {
            Some(b) => b,
            None => {
                let b = self.bottom_pt(pts1);
                self.recs[rec1].bottom_pt = Some(b);
                b
            }
        };
        let b2 = match self.recs[rec2].bottom_pt {
            Some(b) => b,
            None => {
                let b = self.bottom_pt(pts2);
                self.recs[rec2].bottom_pt = Some(b);
                b
            }
        };
        let (p1, p2) = (self.pts[b1].pt, self.pts[b2].pt);
        if p1.y > p2.y {
            rec1
        } else if p1.y < p2.y {
            rec2
        } else if p1.x < p2.x {
            rec1
        } else if p1.x > p2.x {
            rec2
        } else if self.pts[b1].next == b1 {
            rec2
        } else if self.pts[b2].next == b2 {
            rec1
        } else if self.first_is_bottom_pt(b1, b2) {
            rec1
        } else {
            rec2
        }
    }

    /// True when `rec2` is reachable from `rec1` through `first_left`.
    pub fn rec1_right_of_rec2(&self, rec1: RecIdx, rec2: RecIdx) -> bool {
        let mut cur = self.recs[rec1].first_left;
        while let Some(r) = cur {
            if r == rec2 {
                return true;
            }
            cur = self.recs[r].first_left;
        }
        false
    }

    /// Skips `first_left` links to contours that have been emptied.
    pub fn parse_first_left(&self, mut first_left: Option<RecIdx>) -> Option<RecIdx> {
        while let Some(fl) = first_left {
            if self.recs[fl].pts.is_some() {
                break;
            }
            first_left = self.recs[fl].first_left;
        }
        first_left
    }

    /// Points every vertex of `rec`'s ring back at `rec`.
    pub fn update_out_pt_idxs(&mut self, rec: RecIdx) {
        let Some(start) = self.recs[rec].pts else {
            return;
        };
        let mut op = start;
        loop {
            self.pts[op].idx = rec;
            op = self.pts[op].prev;
            if op == start {
                break;
            }
        }
    }

    /// Removes duplicate vertices and, unless `preserve_col`, collinear middle
    /// vertices. Spikes always go. Empties the contour if fewer than three
    /// vertices survive.
    pub fn fixup_out_polygon(&mut self, rec: RecIdx, preserve_col: bool, use_full_range: bool) {
        self.recs[rec].bottom_pt = None;
        let Some(mut pp) = self.recs[rec].pts else {
            return;
        };
        let mut last_ok: Option<PtIdx> = None;
        loop {
            let (prev, next) = (self.pts[pp].prev, self.pts[pp].next);
            if prev == pp || prev == next {
                self.recs[rec].pts = None;
                return;
            }
            let (p, c, n) = (self.pts[prev].pt, self.pts[pp].pt, self.pts[next].pt);
            if c == n
                || c == p
                || (slopes_equal3(p, c, n, use_full_range)
                    && (!preserve_col || !pt2_is_between_pt1_and_pt3(p, c, n)))
            {
                last_ok = None;
                self.link(prev, next);
                pp = prev;
            } else if Some(pp) == last_ok {
                break;
            } else {
                if last_ok.is_none() {
                    last_ok = Some(pp);
                }
                pp = next;
            }
        }
        self.recs[rec].pts = Some(pp);
    }

    /// Removes repeated consecutive vertices from an open contour.
    pub fn fixup_out_polyline(&mut self, rec: RecIdx) {
        let Some(start) = self.recs[rec].pts else {
            return;
        };
        let mut pp = start;
        let mut last = self.pts[pp].prev;
        while pp != last {
            pp = self.pts[pp].next;
            let prev = self.pts[pp].prev;
            if self.pts[pp].pt == self.pts[prev].pt {
                if pp == last {
                    last = prev;
                }
                let next = self.pts[pp].next;
                self.link(prev, next);
                pp = prev;
            }
        }
        if pp == self.pts[pp].prev {
            self.recs[rec].pts = None;
        }
    }

    /// Repoints `first_left` past contours with the same hole state or no
    /// points, so a hole's `first_left` is its true outer.
    pub fn fix_hole_linkage(&mut self, rec: RecIdx) {
        let Some(fl) = self.recs[rec].first_left else {
            return;
        };
        if self.recs[rec].is_hole != self.recs[fl].is_hole && self.recs[fl].pts.is_some() {
            return;
        }
        let is_hole = self.recs[rec].is_hole;
        let mut orfl = Some(fl);
        while let Some(o) = orfl {
            if self.recs[o].is_hole != is_hole && self.recs[o].pts.is_some() {
                break;
            }
            orfl = self.recs[o].first_left;
        }
        self.recs[rec].first_left = orfl;
    }

    /// After a split: contours that pointed at `old` move to `new` when `new`
    /// contains them.
    pub fn fixup_first_lefts1(&mut self, old: RecIdx, new: RecIdx) {
        let Some(new_pts) = self.recs[new].pts else {
            return;
        };
        for i in 0..self.recs.len() {
            let Some(pts) = self.recs[i].pts else {
                continue;
            };
            if self.parse_first_left(self.recs[i].first_left) == Some(old)
                && self.poly2_contains_poly1(pts, new_pts)
            {
                self.recs[i].first_left = Some(new);
            }
        }
    }

    /// After a split where `inner` ended up inside `outer`: re-home every
    /// contour that shared their container.
    pub fn fixup_first_lefts2(&mut self, inner: RecIdx, outer: RecIdx) {
        let (Some(inner_pts), Some(outer_pts)) = (self.recs[inner].pts, self.recs[outer].pts) else {
            return;
        };
        let orfl = self.recs[outer].first_left;
        for i in 0..self.recs.len() {
            let Some(pts) = self.recs[i].pts else {
                continue;
            };
            if i == outer || i == inner {
                continue;
            }
            let fl = self.parse_first_left(self.recs[i].first_left);
            if fl != orfl && fl != Some(inner) && fl != Some(outer) {
                continue;
            }
            if self.poly2_contains_poly1(pts, inner_pts) {
                self.recs[i].first_left = Some(inner);
            } else if self.poly2_contains_poly1(pts, outer_pts) {
                self.recs[i].first_left = Some(outer);
            } else if self.recs[i].first_left == Some(inner) || self.recs[i].first_left == Some(outer) {
                self.recs[i].first_left = orfl;
            }
        }
    }

    /// After a merge: everything that pointed at `old` now points at `new`.
    pub fn fixup_first_lefts3(&mut self, old: RecIdx, new: RecIdx) {
        for i in 0..self.recs.len() {
            if self.recs[i].pts.is_some() && self.parse_first_left(self.recs[i].first_left) == Some(old) {
                self.recs[i].first_left = Some(new);
            }
        }
    }

    /// The contour's vertices in output order (walking `prev` from the
    /// right-most end). `None` when fewer than `min_points` remain.
    pub fn path_of(&self, rec: RecIdx, min_points: usize) -> Option<Path> {
        let pts = self.recs[rec].pts?;
        let start = self.pts[pts].prev;
        let cnt = self.point_count(Some(start));
        if cnt < min_points {
            return None;
        }
        let mut path = Vec::with_capacity(cnt);
        let mut p = start;
        for _ in 0..cnt {
            path.push(self.pts[p].pt);
            p = self.pts[p].prev;
        }
        Some(path)
    }
}

pub struct RingIter<'a> {
    pts: &'a [OutPt],
    start: PtIdx,
    cur: Option<PtIdx>,
}

impl Iterator for RingIter<'_> {
    type Item = PtIdx;

    fn next(&mut self) -> Option<PtIdx> {
        let op = self.cur?;
        let next = self.pts[op].next;
        self.cur = if next == self.start { None } else { Some(next) };
        Some(op)
    }
}
