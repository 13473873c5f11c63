// Copyright 2025 Lars Brubaker
// Horizontal edge processing.

use super::Sweep;
use crate::contour::{GhostJoin, Join, PtIdx};
use crate::edge::EdgeIdx;
use crate::geom::{horz_segments_overlap, IntPoint};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    LeftToRight,
    RightToLeft,
}

impl Sweep {
    /// Drains the SEL, processing each horizontal in turn.
    pub(super) fn process_horizontals(&mut self) {
        while let Some(horz) = self.sel.pop_front() {
            self.process_horizontal(horz);
        }
    }

    /// (direction, left x, right x)
    fn horz_direction(&self, e: EdgeIdx) -> (Direction, i64, i64) {
        let edge = &self.edges[e];
        if edge.bot.x < edge.top.x {
            (Direction::LeftToRight, edge.bot.x, edge.top.x)
        } else {
            (Direction::RightToLeft, edge.top.x, edge.bot.x)
        }
    }

    fn next_in_ael(&self, e: EdgeIdx, dir: Direction) -> Option<EdgeIdx> {
        match dir {
            Direction::LeftToRight => self.ael.next(e),
            Direction::RightToLeft => self.ael.prev(e),
        }
    }

    /// Records joins between the horizontal output run ending at `op` and any
    /// pending horizontal in the SEL that overlaps `horz`.
    fn join_overlapping_horizontals(&mut self, horz: EdgeIdx, op: PtIdx) {
        let (bx, tx) = (self.edges[horz].bot.x, self.edges[horz].top.x);
        let mut cur = self.sel.head;
        while let Some(h) = cur {
            let other = &self.edges[h];
            if other.out_idx.is_assigned() && horz_segments_overlap(bx, tx, other.bot.x, other.top.x) {
                if let Some(op2) = self.last_out_pt(h) {
                    self.joins.push(Join {
                        op1: op2,
                        op2: op,
                        off_pt: self.edges[h].top,
                    });
                }
            }
            cur = self.sel.next(h);
        }
    }

    /// Walks a horizontal (and any horizontals following it in its bound)
    /// across the AEL, crossing every edge it passes.
    ///
    /// A horizontal is processed at its Y only; edges it passes are crossed at
    /// their current X. Where a maximum in the same scanbeam touches the
    /// horizontal an extra output vertex is inserted (strictly simple only).
    fn process_horizontal(&mut self, mut horz: EdgeIdx) {
        let is_open = self.edges[horz].wind_delta == 0;
        let (mut dir, mut horz_left, mut horz_right) = self.horz_direction(horz);

        let mut last_horz = horz;
        while let Some(next) = self.edges[last_horz].next_in_lml {
            if !self.edges[next].is_horizontal() {
                break;
            }
            last_horz = next;
        }
        let max_pair = if self.edges[last_horz].next_in_lml.is_none() {
            self.maxima_pair(last_horz)
        } else {
            None
        };

        // Cursors into the sorted maxima: `max_i` walks up, `max_r` counts
        // down (the current value is maxima[max_r - 1]).
        let len = self.maxima.len();
        let bot_x = self.edges[horz].bot.x;
        let last_top_x = self.edges[last_horz].top.x;
        let mut max_i = 0;
        while max_i < len && self.maxima[max_i] <= bot_x {
            max_i += 1;
        }
        if max_i < len && self.maxima[max_i] >= last_top_x {
            max_i = len;
        }
        let mut max_r = len;
        while max_r > 0 && self.maxima[max_r - 1] > bot_x {
            max_r -= 1;
        }
        if max_r > 0 && self.maxima[max_r - 1] <= last_top_x {
            max_r = 0;
        }

        let mut op1: Option<PtIdx> = None;
        loop {
            let is_last_horz = horz == last_horz;
            let mut cur = self.next_in_ael(horz, dir);
            while let Some(e) = cur {
                let emits = self.edges[horz].out_idx.is_assigned() && !is_open;
                let (horz_y, e_x) = (self.edges[horz].bot.y, self.edges[e].curr.x);
                match dir {
                    Direction::LeftToRight => {
                        while max_i < len && self.maxima[max_i] < e_x {
                            if emits {
                                self.add_out_pt(horz, IntPoint::new(self.maxima[max_i], horz_y));
                            }
                            max_i += 1;
                        }
                    }
                    Direction::RightToLeft => {
                        while max_r > 0 && self.maxima[max_r - 1] > e_x {
                            if emits {
                                self.add_out_pt(horz, IntPoint::new(self.maxima[max_r - 1], horz_y));
                            }
                            max_r -= 1;
                        }
                    }
                }

                if (dir == Direction::LeftToRight && e_x > horz_right)
                    || (dir == Direction::RightToLeft && e_x < horz_left)
                {
                    break;
                }

                // At the end of an intermediate horizontal, stop before edges
                // the next edge of the bound would not cross.
                if e_x == self.edges[horz].top.x {
                    if let Some(next) = self.edges[horz].next_in_lml {
                        if self.edges[e].dx < self.edges[next].dx {
                            break;
                        }
                    }
                }

                if emits {
                    let op = self.add_out_pt(horz, self.edges[e].curr);
                    op1 = Some(op);
                    self.join_overlapping_horizontals(horz, op);
                    self.ghost_joins.push(GhostJoin {
                        op,
                        off_pt: self.edges[horz].bot,
                    });
                }

                if Some(e) == max_pair && is_last_horz {
                    if self.edges[horz].out_idx.is_assigned() {
                        self.add_local_max_poly(horz, e, self.edges[horz].top);
                    }
                    self.ael.remove(horz);
                    self.ael.remove(e);
                    return;
                }

                let pt = IntPoint::new(e_x, self.edges[horz].curr.y);
                match dir {
                    Direction::LeftToRight => self.intersect_edges(horz, e, pt),
                    Direction::RightToLeft => self.intersect_edges(e, horz, pt),
                }
                let next = self.next_in_ael(e, dir);
                self.ael.swap_positions(horz, e);
                cur = next;
            }

            match self.edges[horz].next_in_lml {
                Some(next) if self.edges[next].is_horizontal() => {}
                _ => break,
            }
            horz = self.update_edge_into_ael(horz);
            if self.edges[horz].out_idx.is_assigned() {
                self.add_out_pt(horz, self.edges[horz].bot);
            }
            (dir, horz_left, horz_right) = self.horz_direction(horz);
        }

        if op1.is_none() && self.edges[horz].out_idx.is_assigned() {
            if let Some(op) = self.last_out_pt(horz) {
                self.join_overlapping_horizontals(horz, op);
                self.ghost_joins.push(GhostJoin {
                    op,
                    off_pt: self.edges[horz].top,
                });
            }
        }

        if self.edges[horz].next_in_lml.is_some() {
            if self.edges[horz].out_idx.is_assigned() {
                let op = self.add_out_pt(horz, self.edges[horz].top);
                horz = self.update_edge_into_ael(horz);
                if self.edges[horz].wind_delta == 0 {
                    return;
                }
                // No longer horizontal.
                let neighbour = [self.ael.prev(horz), self.ael.next(horz)]
                    .into_iter()
                    .flatten()
                    .find(|&n| self.shares_bottom_segment(horz, n, false));
                if let Some(n) = neighbour {
                    let (bot, top) = (self.edges[horz].bot, self.edges[horz].top);
                    let op2 = self.add_out_pt(n, bot);
                    self.joins.push(Join { op1: op, op2, off_pt: top });
                }
            } else {
                self.update_edge_into_ael(horz);
            }
        } else {
            if self.edges[horz].out_idx.is_assigned() {
                self.add_out_pt(horz, self.edges[horz].top);
            }
            self.ael.remove(horz);
        }
    }
}
