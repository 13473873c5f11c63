// Copyright 2025 Lars Brubaker
// Output emission during the sweep, and extraction of the final contours.

use super::Sweep;
use crate::contour::{Join, PtIdx};
use crate::edge::{EdgeIdx, EdgeSide, OutIdx, RecIdx};
use crate::geom::{slopes_equal4, IntPoint, Paths};
use crate::polytree::PolyTree;

impl Sweep {
    /// Appends `pt` to the contour `e` is building, at the end matching `e`'s
    /// side, starting a new contour if `e` has none. A point equal to the
    /// current end is not repeated.
    pub(super) fn add_out_pt(&mut self, e: EdgeIdx, pt: IntPoint) -> PtIdx {
        let Some(rec) = self.edges[e].out_idx.rec() else {
            let rec = self.out.create_rec();
            let is_open = self.edges[e].wind_delta == 0;
            self.out.recs[rec].is_open = is_open;
            let op = self.out.start_ring(rec, pt);
            if !is_open {
                self.set_hole_state(e, rec);
            }
            self.edges[e].out_idx = OutIdx::Assigned(rec);
            return op;
        };

        let Some(first) = self.out.recs[rec].pts else {
            return self.out.start_ring(rec, pt);
        };
        let to_front = self.edges[e].side == EdgeSide::Left;
        if to_front && pt == self.out.pt(first) {
            return first;
        }
        let last = self.out.prev(first);
        if !to_front && pt == self.out.pt(last) {
            return last;
        }
        let op = self.out.insert_before(first, pt);
        self.out.pts[op].idx = self.out.recs[rec].idx;
        if to_front {
            self.out.recs[rec].pts = Some(op);
        }
        op
    }

    /// The most recent point `e` emitted.
    pub(super) fn last_out_pt(&self, e: EdgeIdx) -> Option<PtIdx> {
        let first = self.out.recs[self.edges[e].out_idx.rec()?].pts?;
        match self.edges[e].side {
            EdgeSide::Left => Some(first),
            EdgeSide::Right => Some(self.out.prev(first)),
        }
    }

    /// A new contour is a hole when an odd number of contributing edges lie
    /// to its left. The nearest unpaired one names its container.
    fn set_hole_state(&mut self, e: EdgeIdx, rec: RecIdx) {
        let mut tmp: Option<EdgeIdx> = None;
        let mut e2 = self.ael.prev(e);
        while let Some(p) = e2 {
            let edge = &self.edges[p];
            if edge.out_idx.is_assigned() && edge.wind_delta != 0 {
                match tmp {
                    None => tmp = Some(p),
                    Some(t) if self.edges[t].out_idx == edge.out_idx => tmp = None,
                    Some(_) => {}
                }
            }
            e2 = self.ael.prev(p);
        }
        match tmp.and_then(|t| self.edges[t].out_idx.rec()) {
            None => {
                self.out.recs[rec].first_left = None;
                self.out.recs[rec].is_hole = false;
            }
            Some(fl) => {
                self.out.recs[rec].first_left = Some(fl);
                self.out.recs[rec].is_hole = !self.out.recs[fl].is_hole;
            }
        }
    }

    /// Starts a contour at a local minimum shared by `e1` and `e2`.
    pub(super) fn add_local_min_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) -> PtIdx {
        let (result, e, prev_e) = if self.edges[e2].is_horizontal() || self.edges[e1].dx > self.edges[e2].dx {
            let result = self.add_out_pt(e1, pt);
            self.edges[e2].out_idx = self.edges[e1].out_idx;
            self.edges[e1].side = EdgeSide::Left;
            self.edges[e2].side = EdgeSide::Right;
            let prev_e = if self.ael.prev(e1) == Some(e2) {
                self.ael.prev(e2)
            } else {
                self.ael.prev(e1)
            };
            (result, e1, prev_e)
        } else {
            let result = self.add_out_pt(e2, pt);
            self.edges[e1].out_idx = self.edges[e2].out_idx;
            self.edges[e1].side = EdgeSide::Right;
            self.edges[e2].side = EdgeSide::Left;
            let prev_e = if self.ael.prev(e2) == Some(e1) {
                self.ael.prev(e1)
            } else {
                self.ael.prev(e2)
            };
            (result, e2, prev_e)
        };

        // A contributing neighbour heading up along the same line.
        if let Some(p) = prev_e {
            let (edge, prev) = (&self.edges[e], &self.edges[p]);
            if prev.out_idx.is_assigned() && prev.top.y < pt.y && edge.top.y < pt.y {
                let x_prev = prev.top_x(pt.y);
                let x_e = edge.top_x(pt.y);
                if x_prev == x_e
                    && edge.wind_delta != 0
                    && prev.wind_delta != 0
                    && slopes_equal4(
                        IntPoint::new(x_prev, pt.y),
                        prev.top,
                        IntPoint::new(x_e, pt.y),
                        edge.top,
                        self.use_full_range,
                    )
                {
                    let off_pt = edge.top;
                    let op = self.add_out_pt(p, pt);
                    self.joins.push(Join { op1: result, op2: op, off_pt });
                }
            }
        }
        result
    }

    /// Closes the contour (or merges the two contours) `e1` and `e2` form at a
    /// local maximum.
    pub(super) fn add_local_max_poly(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) {
        self.add_out_pt(e1, pt);
        if self.edges[e2].wind_delta == 0 {
            self.add_out_pt(e2, pt);
        }
        let (Some(r1), Some(r2)) = (self.edges[e1].out_idx.rec(), self.edges[e2].out_idx.rec()) else {
            return;
        };
        if r1 == r2 {
            self.edges[e1].out_idx = OutIdx::Unassigned;
            self.edges[e2].out_idx = OutIdx::Unassigned;
        } else if r1 < r2 {
            self.append_polygon(e1, e2);
        } else {
            self.append_polygon(e2, e1);
        }
    }

    /// Splices `e2`'s contour onto the end of `e1`'s and retires `e2`'s.
    fn append_polygon(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let (Some(rec1), Some(rec2)) = (self.edges[e1].out_idx.rec(), self.edges[e2].out_idx.rec()) else {
            return;
        };
        let (Some(p1_lft), Some(p2_lft)) = (self.out.recs[rec1].pts, self.out.recs[rec2].pts) else {
            return;
        };

        let hole_state_rec = if self.out.rec1_right_of_rec2(rec1, rec2) {
            rec2
        } else if self.out.rec1_right_of_rec2(rec2, rec1) {
            rec1
        } else {
            self.out.lowermost_rec(rec1, rec2)
        };

        let p1_rt = self.out.prev(p1_lft);
        let p2_rt = self.out.prev(p2_lft);
        let side1 = self.edges[e1].side;
        match (side1, self.edges[e2].side) {
            (EdgeSide::Left, EdgeSide::Left) => {
                self.out.reverse_links(p2_lft);
                self.out.link(p2_lft, p1_lft);
                self.out.link(p1_rt, p2_rt);
                self.out.recs[rec1].pts = Some(p2_rt);
            }
            (EdgeSide::Left, EdgeSide::Right) => {
                self.out.link(p2_rt, p1_lft);
                self.out.link(p1_rt, p2_lft);
                self.out.recs[rec1].pts = Some(p2_lft);
            }
            (EdgeSide::Right, EdgeSide::Right) => {
                self.out.reverse_links(p2_lft);
                self.out.link(p1_rt, p2_rt);
                self.out.link(p2_lft, p1_lft);
            }
            (EdgeSide::Right, EdgeSide::Left) => {
                self.out.link(p1_rt, p2_lft);
                self.out.link(p2_rt, p1_lft);
            }
        }

        self.out.recs[rec1].bottom_pt = None;
        if hole_state_rec == rec2 {
            if self.out.recs[rec2].first_left != Some(rec1) {
                self.out.recs[rec1].first_left = self.out.recs[rec2].first_left;
            }
            self.out.recs[rec1].is_hole = self.out.recs[rec2].is_hole;
        }
        let retired = &mut self.out.recs[rec2];
        retired.pts = None;
        retired.bottom_pt = None;
        retired.first_left = Some(rec1);

        self.edges[e1].out_idx = OutIdx::Unassigned;
        self.edges[e2].out_idx = OutIdx::Unassigned;

        // The edge still building rec2 carries on rec1.
        let mut cur = self.ael.head;
        while let Some(e) = cur {
            if self.edges[e].out_idx == OutIdx::Assigned(rec2) {
                self.edges[e].out_idx = OutIdx::Assigned(rec1);
                self.edges[e].side = side1;
                break;
            }
            cur = self.ael.next(e);
        }

        self.out.recs[rec2].idx = self.out.recs[rec1].idx;
    }

    /// Makes outers positive and holes negative (or the reverse).
    pub(super) fn orient_contour(&mut self, rec: RecIdx) {
        let Some(pts) = self.out.recs[rec].pts else {
            return;
        };
        let want_negative = self.out.recs[rec].is_hole ^ self.options.reverse_solution;
        if want_negative == (self.out.ring_area(pts) > 0.0) {
            self.out.reverse_links(pts);
        }
    }

    // ─────── Results ──────────────────────────────────────────────────────────

    pub(super) fn build_result(&self) -> Paths {
        (0..self.out.recs.len())
            .filter_map(|rec| {
                let min_points = if self.out.recs[rec].is_open { 2 } else { 3 };
                self.out.path_of(rec, min_points)
            })
            .collect()
    }

    pub(super) fn build_tree(&mut self) -> PolyTree {
        let mut tree = PolyTree::new();
        let mut node_of = vec![None; self.out.recs.len()];
        for rec in 0..self.out.recs.len() {
            let is_open = self.out.recs[rec].is_open;
            let min_points = if is_open { 2 } else { 3 };
            let Some(contour) = self.out.path_of(rec, min_points) else {
                continue;
            };
            self.out.fix_hole_linkage(rec);
            node_of[rec] = Some(tree.add_node(contour, is_open));
        }

        for rec in 0..self.out.recs.len() {
            let Some(node) = node_of[rec] else {
                continue;
            };
            let parent = if self.out.recs[rec].is_open {
                None
            } else {
                self.out.recs[rec].first_left.and_then(|fl| node_of[fl])
            };
            tree.attach(parent, node);
        }
        tree
    }
}
