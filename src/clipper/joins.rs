// Copyright 2025 Lars Brubaker
// Post-sweep passes: joining contours along shared edges and splitting
// contours at touching vertices.

use log::trace;

use super::Sweep;
use crate::contour::{Contours, Join, PtIdx};
use crate::edge::RecIdx;
use crate::geom::{get_overlap, slopes_equal3, IntPoint};

impl Sweep {
    /// Resolves every recorded join. A join between two contours merges them;
    /// a join within one contour splits it in two.
    pub(super) fn join_common_edges(&mut self) {
        let joins = std::mem::take(&mut self.joins);
        for join in &joins {
            let rec1 = self.out.get_out_rec(self.out.pts[join.op1].idx);
            let mut rec2 = self.out.get_out_rec(self.out.pts[join.op2].idx);
            if self.out.recs[rec1].pts.is_none() || self.out.recs[rec2].pts.is_none() {
                continue;
            }
            if self.out.recs[rec1].is_open || self.out.recs[rec2].is_open {
                continue;
            }

            // Which of the two decides the hole state of a merged result.
            let hole_state_rec = if rec1 == rec2 {
                rec1
            } else if self.out.rec1_right_of_rec2(rec1, rec2) {
                rec2
            } else if self.out.rec1_right_of_rec2(rec2, rec1) {
                rec1
            } else {
                self.out.lowermost_rec(rec1, rec2)
            };

            let Some((op1, op2)) = self.join_points(join, rec1, rec2) else {
                continue;
            };

            if rec1 == rec2 {
                self.out.recs[rec1].pts = Some(op1);
                self.out.recs[rec1].bottom_pt = None;
                rec2 = self.out.create_rec();
                self.out.recs[rec2].pts = Some(op2);
                self.out.update_out_pt_idxs(rec2);
                trace!("join split contour {} off into {}", rec1, rec2);
                self.settle_split(rec1, rec2, true);
            } else {
                trace!("join merged contour {} into {}", rec2, rec1);
                let rec1_idx = self.out.recs[rec1].idx;
                let absorbed = &mut self.out.recs[rec2];
                absorbed.pts = None;
                absorbed.bottom_pt = None;
                absorbed.idx = rec1_idx;

                self.out.recs[rec1].is_hole = self.out.recs[hole_state_rec].is_hole;
                if hole_state_rec == rec2 {
                    self.out.recs[rec1].first_left = self.out.recs[rec2].first_left;
                }
                self.out.recs[rec2].first_left = Some(rec1);
                if self.using_tree {
                    self.out.fixup_first_lefts3(rec2, rec1);
                }
            }
        }
        self.joins = joins;
        self.joins.clear();
    }

    /// Sets hole state and containment after `rec2` was split off `rec1`.
    fn settle_split(&mut self, rec1: RecIdx, rec2: RecIdx, fix_orientation: bool) {
        let (Some(pts1), Some(pts2)) = (self.out.recs[rec1].pts, self.out.recs[rec2].pts) else {
            return;
        };
        if self.out.poly2_contains_poly1(pts2, pts1) {
            self.out.recs[rec2].is_hole = !self.out.recs[rec1].is_hole;
            self.out.recs[rec2].first_left = Some(rec1);
            if self.using_tree {
                self.out.fixup_first_lefts2(rec2, rec1);
            }
            if fix_orientation {
                self.orient_contour(rec2);
            }
        } else if self.out.poly2_contains_poly1(pts1, pts2) {
            self.out.recs[rec2].is_hole = self.out.recs[rec1].is_hole;
            self.out.recs[rec1].is_hole = !self.out.recs[rec2].is_hole;
            self.out.recs[rec2].first_left = self.out.recs[rec1].first_left;
            self.out.recs[rec1].first_left = Some(rec2);
            if self.using_tree {
                self.out.fixup_first_lefts2(rec1, rec2);
            }
            if fix_orientation {
                self.orient_contour(rec1);
            }
        } else {
            self.out.recs[rec2].is_hole = self.out.recs[rec1].is_hole;
            self.out.recs[rec2].first_left = self.out.recs[rec1].first_left;
            if self.using_tree {
                self.out.fixup_first_lefts1(rec1, rec2);
            }
        }
    }

    /// Stitches the rings at a join. Returns a point on each resulting ring
    /// (the same ring twice when two contours merged), or `None` when the join
    /// no longer applies.
    fn join_points(&mut self, join: &Join, rec1: RecIdx, rec2: RecIdx) -> Option<(PtIdx, PtIdx)> {
        let (mut op1, mut op2) = (join.op1, join.op2);
        let off = join.off_pt;
        let out = &mut self.out;
        let is_horizontal = out.pt(op1).y == off.y;

        if is_horizontal && off == out.pt(op1) && off == out.pt(op2) {
            // Two contributing edges touching at a vertex (strictly simple).
            if rec1 != rec2 {
                return None;
            }
            let mut op1b = out.next(op1);
            while op1b != op1 && out.pt(op1b) == off {
                op1b = out.next(op1b);
            }
            let reverse1 = out.pt(op1b).y > off.y;
            let mut op2b = out.next(op2);
            while op2b != op2 && out.pt(op2b) == off {
                op2b = out.next(op2b);
            }
            let reverse2 = out.pt(op2b).y > off.y;
            if reverse1 == reverse2 {
                return None;
            }
            let op1b = out.splice(op1, op2, reverse1);
            return Some((op1, op1b));
        }

        if is_horizontal {
            // Expand both points to the full horizontal runs they sit on.
            let mut op1b = op1;
            while out.pt(out.prev(op1)).y == out.pt(op1).y && out.prev(op1) != op1b && out.prev(op1) != op2 {
                op1 = out.prev(op1);
            }
            while out.pt(out.next(op1b)).y == out.pt(op1b).y && out.next(op1b) != op1 && out.next(op1b) != op2 {
                op1b = out.next(op1b);
            }
            if out.next(op1b) == op1 || out.next(op1b) == op2 {
                return None;
            }

            let mut op2b = op2;
            while out.pt(out.prev(op2)).y == out.pt(op2).y && out.prev(op2) != op2b && out.prev(op2) != op1b {
                op2 = out.prev(op2);
            }
            while out.pt(out.next(op2b)).y == out.pt(op2b).y && out.next(op2b) != op2 && out.next(op2b) != op1 {
                op2b = out.next(op2b);
            }
            if out.next(op2b) == op2 || out.next(op2b) == op1 {
                return None;
            }

            let (p1, p1b, p2, p2b) = (out.pt(op1), out.pt(op1b), out.pt(op2), out.pt(op2b));
            let (left, right) = get_overlap(p1.x, p1b.x, p2.x, p2b.x)?;
            let within = |x: i64| x >= left && x <= right;

            // Keep op1 and op2 off the discarded side; later joins may need them.
            let (pt, discard_left) = if within(p1.x) {
                (p1, p1.x > p1b.x)
            } else if within(p2.x) {
                (p2, p2.x > p2b.x)
            } else if within(p1b.x) {
                (p1b, p1b.x > p1.x)
            } else {
                (p2b, p2b.x > p2.x)
            };
            if !out.join_horz(op1, op1b, op2, op2b, pt, discard_left) {
                return None;
            }
            return Some((op1, op2));
        }

        // The shared edge runs from each point towards `off`; find which
        // neighbour of each point lies along it.
        let full = self.use_full_range;
        let (op1b, reverse1) = along_shared_edge(out, op1, off, full)?;
        let (op2b, reverse2) = along_shared_edge(out, op2, off, full)?;
        if op1b == op1 || op2b == op2 || op1b == op2b || (rec1 == rec2 && reverse1 == reverse2) {
            return None;
        }
        let op1b = out.splice(op1, op2, reverse1);
        Some((op1, op1b))
    }

    /// Splits every contour at vertices it touches itself at, so no output
    /// contour touches itself.
    pub(super) fn do_simple_polygons(&mut self) {
        let mut i = 0;
        while i < self.out.recs.len() {
            let rec = i;
            i += 1;
            let Some(start) = self.out.recs[rec].pts else {
                continue;
            };
            if self.out.recs[rec].is_open {
                continue;
            }
            let mut op = start;
            loop {
                let mut op2 = self.out.next(op);
                while Some(op2) != self.out.recs[rec].pts {
                    let out = &self.out;
                    if out.pt(op) == out.pt(op2) && out.next(op2) != op && out.prev(op2) != op {
                        let op3 = self.out.prev(op);
                        let op4 = self.out.prev(op2);
                        self.out.link(op4, op);
                        self.out.link(op3, op2);
                        self.out.recs[rec].pts = Some(op);

                        let rec2 = self.out.create_rec();
                        self.out.recs[rec2].pts = Some(op2);
                        self.out.update_out_pt_idxs(rec2);
                        self.settle_split(rec, rec2, false);
                        op2 = op;
                    }
                    op2 = self.out.next(op2);
                }
                op = self.out.next(op);
                if Some(op) == self.out.recs[rec].pts {
                    break;
                }
            }
        }
    }
}

/// From `op`, the first distinct neighbour along the shared edge towards
/// `off`, trying `next` before `prev`. The flag is true when it was `prev`.
fn along_shared_edge(out: &Contours, op: PtIdx, off: IntPoint, full: bool) -> Option<(PtIdx, bool)> {
    let pt = out.pt(op);
    let mut opb = out.next(op);
    while out.pt(opb) == pt && opb != op {
        opb = out.next(opb);
    }
    if out.pt(opb).y <= pt.y && slopes_equal3(pt, out.pt(opb), off, full) {
        return Some((opb, false));
    }
    let mut opb = out.prev(op);
    while out.pt(opb) == pt && opb != op {
        opb = out.prev(opb);
    }
    if out.pt(opb).y > pt.y || !slopes_equal3(pt, out.pt(opb), off, full) {
        return None;
    }
    Some((opb, true))
}
