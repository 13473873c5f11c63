// Copyright 2025 Lars Brubaker
// License: MIT
//
// Working edge representation used by the builder and the sweep.
//
// Every input vertex becomes one Edge in a Vec arena; the ring of a path is
// kept through `next`/`prev` indices, and the chain of edges that makes up one
// bound (from a local minimum up to a local maximum) through `next_in_lml`.
// Membership in the active and sorted edge lists lives in separate EdgeList
// instances, not in the Edge itself.

use crate::geom::{round, IntPoint, HORIZONTAL};

/// Index into the edge arena.
pub type EdgeIdx = usize;
/// Index into the contour (OutRec) arena.
pub type RecIdx = usize;

/// Which operand a path belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PolyKind {
    Subject,
    Clip,
}

/// Side of its output contour an edge currently forms.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum EdgeSide {
    #[default]
    Left,
    Right,
}

/// Output state of an edge. Exactly one holds at any time.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum OutIdx {
    /// Not currently contributing to any contour.
    #[default]
    Unassigned,
    /// Contributing to the given contour.
    Assigned(RecIdx),
    /// Closing edge of an open path; never enters the sweep.
    Skip,
}

impl OutIdx {
    #[inline]
    pub fn rec(self) -> Option<RecIdx> {
        match self {
            OutIdx::Assigned(r) => Some(r),
            _ => None,
        }
    }

    #[inline]
    pub fn is_assigned(self) -> bool {
        matches!(self, OutIdx::Assigned(_))
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    /// Lower endpoint in sweep order (larger Y).
    pub bot: IntPoint,
    /// Position at the current scanline.
    pub curr: IntPoint,
    /// Upper endpoint in sweep order (smaller Y).
    pub top: IntPoint,
    /// dx/dy, or `HORIZONTAL`.
    pub dx: f64,
    pub kind: PolyKind,
    pub side: EdgeSide,
    /// +1 / -1 for closed paths, 0 for open paths.
    pub wind_delta: i32,
    pub wind_cnt: i32,
    /// Winding count of the other operand at this edge.
    pub wind_cnt2: i32,
    pub out_idx: OutIdx,
    /// Ring neighbours within the source path.
    pub next: EdgeIdx,
    pub prev: EdgeIdx,
    /// Next edge up the same bound.
    pub next_in_lml: Option<EdgeIdx>,
}

impl Edge {
    pub(crate) fn new(curr: IntPoint, next: EdgeIdx, prev: EdgeIdx) -> Self {
        Edge {
            bot: IntPoint::default(),
            curr,
            top: IntPoint::default(),
            dx: 0.0,
            kind: PolyKind::Subject,
            side: EdgeSide::Left,
            wind_delta: 0,
            wind_cnt: 0,
            wind_cnt2: 0,
            out_idx: OutIdx::Unassigned,
            next,
            prev,
            next_in_lml: None,
        }
    }

    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.dx == HORIZONTAL
    }

    pub(crate) fn set_dx(&mut self) {
        let dy = self.top.y - self.bot.y;
        self.dx = if dy == 0 {
            HORIZONTAL
        } else {
            (self.top.x - self.bot.x) as f64 / dy as f64
        };
    }

    /// X where this edge crosses `current_y`.
    #[inline]
    pub fn top_x(&self, current_y: i64) -> i64 {
        if current_y == self.top.y {
            self.top.x
        } else {
            self.bot.x + round(self.dx * (current_y - self.bot.y) as f64)
        }
    }

    /// Swaps the X of bot and top so the horizontal's bottom end lines up with
    /// the adjoining lower edge of its bound.
    pub(crate) fn reverse_horizontal(&mut self) {
        std::mem::swap(&mut self.top.x, &mut self.bot.x);
    }
}

/// Entry point of the sweep: a vertex where a left and a right bound start.
/// Either bound may be absent at the end of an open path.
#[derive(Copy, Clone, Debug)]
pub struct LocalMinimum {
    pub y: i64,
    pub left_bound: Option<EdgeIdx>,
    pub right_bound: Option<EdgeIdx>,
}

/// Crossing point of two edges within a scanbeam.
#[derive(Copy, Clone, Debug)]
pub struct IntersectNode {
    pub edge1: EdgeIdx,
    pub edge2: EdgeIdx,
    pub pt: IntPoint,
}

/// Point where two edges cross, clamped to lie within both edges' Y span and
/// not below the current scanline.
pub fn intersect_point(edge1: &Edge, edge2: &Edge) -> IntPoint {
    let mut ip = IntPoint::default();
    if edge1.dx == edge2.dx {
        ip.y = edge1.curr.y;
        ip.x = edge1.top_x(ip.y);
        return ip;
    } else if edge1.dx == 0.0 {
        ip.x = edge1.bot.x;
        if edge2.is_horizontal() {
            ip.y = edge2.bot.y;
        } else {
            let b2 = edge2.bot.y as f64 - (edge2.bot.x as f64 / edge2.dx);
            ip.y = round(ip.x as f64 / edge2.dx + b2);
        }
    } else if edge2.dx == 0.0 {
        ip.x = edge2.bot.x;
        if edge1.is_horizontal() {
            ip.y = edge1.bot.y;
        } else {
            let b1 = edge1.bot.y as f64 - (edge1.bot.x as f64 / edge1.dx);
            ip.y = round(ip.x as f64 / edge1.dx + b1);
        }
    } else {
        let b1 = edge1.bot.x as f64 - edge1.bot.y as f64 * edge1.dx;
        let b2 = edge2.bot.x as f64 - edge2.bot.y as f64 * edge2.dx;
        let q = (b2 - b1) / (edge1.dx - edge2.dx);
        ip.y = round(q);
        ip.x = if edge1.dx.abs() < edge2.dx.abs() {
            round(edge1.dx * q + b1)
        } else {
            round(edge2.dx * q + b2)
        };
    }

    if ip.y < edge1.top.y || ip.y < edge2.top.y {
        ip.y = edge1.top.y.max(edge2.top.y);
        ip.x = if edge1.dx.abs() < edge2.dx.abs() {
            edge1.top_x(ip.y)
        } else {
            edge2.top_x(ip.y)
        };
    }
    // Never below the bottom of the scanbeam.
    if ip.y > edge1.curr.y {
        ip.y = edge1.curr.y;
        ip.x = if edge1.dx.abs() > edge2.dx.abs() {
            edge2.top_x(ip.y)
        } else {
            edge1.top_x(ip.y)
        };
    }
    ip
}

/// True when `e2` belongs before `e1` in the active edge list.
/// Equal current X is resolved by where the edges head above.
pub fn e2_inserts_before_e1(e1: &Edge, e2: &Edge) -> bool {
    if e2.curr.x == e1.curr.x {
        if e2.top.y > e1.top.y {
            e2.top.x < e1.top_x(e2.top.y)
        } else {
            e1.top.x > e2.top_x(e1.top.y)
        }
    } else {
        e2.curr.x < e1.curr.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(bot: (i64, i64), top: (i64, i64)) -> Edge {
        let mut e = Edge::new(bot.into(), 0, 0);
        e.bot = bot.into();
        e.top = top.into();
        e.set_dx();
        e
    }

    #[test]
    fn top_x_interpolates() {
        let e = edge((0, 10), (10, 0));
        assert_eq!(e.top_x(5), 5);
        assert_eq!(e.top_x(0), 10);
        assert_eq!(e.top_x(10), 0);
    }

    #[test]
    fn horizontal_detection_and_reverse() {
        let mut e = edge((0, 5), (8, 5));
        assert!(e.is_horizontal());
        e.reverse_horizontal();
        assert_eq!(e.bot, IntPoint::new(8, 5));
        assert_eq!(e.top, IntPoint::new(0, 5));
    }

    #[test]
    fn intersect_point_of_crossing_diagonals() {
        let e1 = edge((0, 10), (10, 0));
        let e2 = edge((10, 10), (0, 0));
        let ip = intersect_point(&e1, &e2);
        assert_eq!(ip, IntPoint::new(5, 5));
    }

    #[test]
    fn intersect_point_with_vertical() {
        let e1 = edge((4, 10), (4, 0));
        let e2 = edge((0, 10), (10, 0));
        assert_eq!(intersect_point(&e1, &e2), IntPoint::new(4, 6));
    }

    #[test]
    fn insertion_order_by_heading() {
        let left = edge((5, 10), (0, 0));
        let right = edge((5, 10), (10, 0));
        assert!(e2_inserts_before_e1(&right, &left));
        assert!(!e2_inserts_before_e1(&left, &right));
    }

    #[test]
    fn out_idx_states() {
        assert_eq!(OutIdx::Assigned(3).rec(), Some(3));
        assert!(OutIdx::Assigned(0).is_assigned());
        assert_eq!(OutIdx::Skip.rec(), None);
        assert!(!OutIdx::Unassigned.is_assigned());
    }
}
