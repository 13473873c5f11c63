// Copyright 2025 Lars Brubaker
// Edge crossings: winding updates at a crossing and the per-scanbeam
// intersection pass.

use log::{trace, warn};

use super::{ClipType, Sweep};
use crate::edge::{intersect_point, EdgeIdx, IntersectNode, OutIdx, PolyKind};
use crate::edge_list::EdgeList;
use crate::error::ClipError;
use crate::geom::IntPoint;

/// Winding count of 0 or 1 under the edge's rule: the crossing does not take
/// it deeper than one level inside.
#[inline]
fn is_shallow(wc: i32) -> bool {
    wc == 0 || wc == 1
}

impl Sweep {
    /// Updates winding and output state of two edges crossing at `pt`.
    /// `e1` is left of `e2` in the AEL before the swap.
    pub(super) fn intersect_edges(&mut self, e1: EdgeIdx, e2: EdgeIdx, pt: IntPoint) {
        let e1_contributing = self.edges[e1].out_idx.is_assigned();
        let e2_contributing = self.edges[e2].out_idx.is_assigned();
        let (kind1, kind2) = (self.edges[e1].kind, self.edges[e2].kind);
        let (wd1, wd2) = (self.edges[e1].wind_delta, self.edges[e2].wind_delta);

        // Open paths only ever start or stop output here.
        if wd1 == 0 || wd2 == 0 {
            if wd1 == 0 && wd2 == 0 {
                return;
            }
            if kind1 == kind2 && wd1 != wd2 && self.clip_type == ClipType::Union {
                if wd1 == 0 {
                    if e2_contributing {
                        self.add_out_pt(e1, pt);
                        if e1_contributing {
                            self.edges[e1].out_idx = OutIdx::Unassigned;
                        }
                    }
                } else if e1_contributing {
                    self.add_out_pt(e2, pt);
                    if e2_contributing {
                        self.edges[e2].out_idx = OutIdx::Unassigned;
                    }
                }
            } else if kind1 != kind2 {
                let (ed1, ed2) = (&self.edges[e1], &self.edges[e2]);
                if wd1 == 0
                    && ed2.wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || ed2.wind_cnt2 == 0)
                {
                    self.add_out_pt(e1, pt);
                    if e1_contributing {
                        self.edges[e1].out_idx = OutIdx::Unassigned;
                    }
                } else if wd2 == 0
                    && ed1.wind_cnt.abs() == 1
                    && (self.clip_type != ClipType::Union || ed1.wind_cnt2 == 0)
                {
                    self.add_out_pt(e2, pt);
                    if e2_contributing {
                        self.edges[e2].out_idx = OutIdx::Unassigned;
                    }
                }
            }
            return;
        }

        if kind1 == kind2 {
            if self.is_even_odd(kind1) {
                let wc = self.edges[e1].wind_cnt;
                self.edges[e1].wind_cnt = self.edges[e2].wind_cnt;
                self.edges[e2].wind_cnt = wc;
            } else {
                let ed1 = &mut self.edges[e1];
                ed1.wind_cnt = if ed1.wind_cnt + wd2 == 0 {
                    -ed1.wind_cnt
                } else {
                    ed1.wind_cnt + wd2
                };
                let ed2 = &mut self.edges[e2];
                ed2.wind_cnt = if ed2.wind_cnt - wd1 == 0 {
                    -ed2.wind_cnt
                } else {
                    ed2.wind_cnt - wd1
                };
            }
        } else {
            let toggle = |wc: i32| if wc == 0 { 1 } else { 0 };
            let ed1_wc2 = self.edges[e1].wind_cnt2;
            self.edges[e1].wind_cnt2 = if self.is_even_odd(kind2) {
                toggle(ed1_wc2)
            } else {
                ed1_wc2 + wd2
            };
            let ed2_wc2 = self.edges[e2].wind_cnt2;
            self.edges[e2].wind_cnt2 = if self.is_even_odd(kind1) {
                toggle(ed2_wc2)
            } else {
                ed2_wc2 - wd1
            };
        }

        let (fill1, alt1) = self.fill_rules(kind1);
        let (fill2, alt2) = self.fill_rules(kind2);
        let e1_wc = fill1.count(self.edges[e1].wind_cnt);
        let e2_wc = fill2.count(self.edges[e2].wind_cnt);

        if e1_contributing && e2_contributing {
            if !is_shallow(e1_wc)
                || !is_shallow(e2_wc)
                || (kind1 != kind2 && self.clip_type != ClipType::Xor)
            {
                self.add_local_max_poly(e1, e2, pt);
            } else {
                self.add_out_pt(e1, pt);
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e1_contributing {
            if is_shallow(e2_wc) {
                self.add_out_pt(e1, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if e2_contributing {
            if is_shallow(e1_wc) {
                self.add_out_pt(e2, pt);
                self.swap_sides(e1, e2);
                self.swap_poly_indexes(e1, e2);
            }
        } else if is_shallow(e1_wc) && is_shallow(e2_wc) {
            // Neither contributes yet: maybe a new minimum starts here.
            let e1_wc2 = alt1.count(self.edges[e1].wind_cnt2);
            let e2_wc2 = alt2.count(self.edges[e2].wind_cnt2);

            if kind1 != kind2 {
                self.add_local_min_poly(e1, e2, pt);
            } else if e1_wc == 1 && e2_wc == 1 {
                let starts = match self.clip_type {
                    ClipType::Intersection => e1_wc2 > 0 && e2_wc2 > 0,
                    ClipType::Union => e1_wc2 <= 0 && e2_wc2 <= 0,
                    ClipType::Difference => {
                        (kind1 == PolyKind::Clip && e1_wc2 > 0 && e2_wc2 > 0)
                            || (kind1 == PolyKind::Subject && e1_wc2 <= 0 && e2_wc2 <= 0)
                    }
                    ClipType::Xor => true,
                };
                if starts {
                    self.add_local_min_poly(e1, e2, pt);
                }
            } else {
                self.swap_sides(e1, e2);
            }
        }
    }

    /// Resolves every crossing between `top_y` and the current scanline.
    pub(super) fn process_intersections(&mut self, top_y: i64) -> Result<(), ClipError> {
        if self.ael.is_empty() {
            return Ok(());
        }
        self.build_intersect_list(top_y);
        if !self.intersections.is_empty() {
            trace!("{} intersections below y = {}", self.intersections.len(), top_y);
        }
        let ordered = match self.intersections.len() {
            0 | 1 => true,
            _ => self.fixup_intersection_order(),
        };
        self.sel.clear();
        if !ordered {
            warn!(
                "could not order {} intersections below y = {}",
                self.intersections.len(),
                top_y
            );
            self.intersections.clear();
            return Err(ClipError::IntersectionOrder);
        }
        self.process_intersect_list();
        Ok(())
    }

    /// Bubble-sorts a copy of the AEL by X at `top_y`; every swap is a crossing.
    fn build_intersect_list(&mut self, top_y: i64) {
        let mut order: Vec<EdgeIdx> = self.ael.iter().collect();
        for &e in &order {
            let x = self.edges[e].top_x(top_y);
            self.edges[e].curr.x = x;
        }

        let mut end = order.len();
        while end > 1 {
            let mut modified = false;
            for i in 0..end - 1 {
                let (e, next) = (order[i], order[i + 1]);
                if self.edges[e].curr.x > self.edges[next].curr.x {
                    let mut pt = intersect_point(&self.edges[e], &self.edges[next]);
                    if pt.y < top_y {
                        pt = IntPoint::new(self.edges[e].top_x(top_y), top_y);
                    }
                    self.intersections.push(IntersectNode {
                        edge1: e,
                        edge2: next,
                        pt,
                    });
                    order.swap(i, i + 1);
                    modified = true;
                }
            }
            if !modified {
                break;
            }
            end -= 1;
        }
    }

    /// Orders crossings bottom-up so that each one swaps edges that are
    /// adjacent at the moment it is processed. False if no such order exists.
    fn fixup_intersection_order(&mut self) -> bool {
        self.sel.copy_from(&self.ael);
        self.intersections.sort_by(|a, b| b.pt.y.cmp(&a.pt.y));

        let adjacent = |sel: &EdgeList, node: &IntersectNode| {
            sel.next(node.edge1) == Some(node.edge2) || sel.prev(node.edge1) == Some(node.edge2)
        };
        let cnt = self.intersections.len();
        for i in 0..cnt {
            if !adjacent(&self.sel, &self.intersections[i]) {
                let Some(j) = (i + 1..cnt).find(|&j| adjacent(&self.sel, &self.intersections[j])) else {
                    return false;
                };
                self.intersections.swap(i, j);
            }
            let node = self.intersections[i];
            self.sel.swap_positions(node.edge1, node.edge2);
        }
        true
    }

    fn process_intersect_list(&mut self) {
        let nodes = std::mem::take(&mut self.intersections);
        for node in &nodes {
            self.intersect_edges(node.edge1, node.edge2, node.pt);
            self.ael.swap_positions(node.edge1, node.edge2);
        }
        self.intersections = nodes;
        self.intersections.clear();
    }
}

