// Copyright 2025 Lars Brubaker
// License: MIT
//
// Vatti scanline clipping engine.
//
// `Clipper` holds the edges and local minima built from the added paths.
// Every execution clones them into a private `Sweep`, which owns the active
// edge list, the sorted edge list, the scanbeam queue and the output contour
// arena for the duration of that one call. The sweep runs from the largest Y
// to the smallest; an edge's `bot` is its larger-Y end.
//
// The sweep is split across child modules the same way its sub-passes are:
// horizontal edges, intersections within a scanbeam, output emission and
// result extraction, and the post-sweep join/split passes.

mod horizontal;
mod intersect;
mod joins;
mod output;

use log::{debug, log_enabled, trace, Level};

use crate::builder::EdgeBuilder;
use crate::contour::{Contours, GhostJoin, Join};
use crate::edge::{
    e2_inserts_before_e1, Edge, EdgeIdx, EdgeSide, IntersectNode, LocalMinimum, OutIdx, PolyKind,
};
use crate::edge_list::EdgeList;
use crate::error::ClipError;
use crate::geom::{horz_segments_overlap, slopes_equal4, IntPoint, IntRect, Paths};
use crate::polytree::PolyTree;
use crate::scanbeam::Scanbeam;

// ─────────────────────────────── Public types ──────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipType {
    Intersection,
    Union,
    Difference,
    Xor,
}

/// How winding counts map to inside/outside.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    EvenOdd,
    NonZero,
    Positive,
    Negative,
}

impl FillRule {
    /// Winding count as seen by this rule: signed for Positive/Negative,
    /// magnitude otherwise.
    #[inline]
    pub(crate) fn count(self, wind_cnt: i32) -> i32 {
        match self {
            FillRule::Positive => wind_cnt,
            FillRule::Negative => -wind_cnt,
            _ => wind_cnt.abs(),
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipOptions {
    /// Outers negative, holes positive.
    pub reverse_solution: bool,
    /// Split contours at every touching vertex.
    pub strictly_simple: bool,
    /// Keep collinear vertices of the input and the output.
    pub preserve_collinear: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ClipOption {
    ReverseSolution,
    StrictlySimple,
    PreserveCollinear,
}

// ─────────────────────────── Clipper ──────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Clipper {
    builder: EdgeBuilder,
    options: ClipOptions,
    executing: bool,
}

impl Clipper {
    pub fn new() -> Self {
        Clipper::default()
    }

    pub fn with_options(options: ClipOptions) -> Self {
        Clipper {
            options,
            ..Clipper::default()
        }
    }

    pub fn options(&self) -> ClipOptions {
        self.options
    }

    pub fn set_option(&mut self, option: ClipOption, value: bool) {
        match option {
            ClipOption::ReverseSolution => self.options.reverse_solution = value,
            ClipOption::StrictlySimple => self.options.strictly_simple = value,
            ClipOption::PreserveCollinear => self.options.preserve_collinear = value,
        }
    }

    pub fn set_reverse_solution(&mut self, value: bool) {
        self.options.reverse_solution = value;
    }

    pub fn set_strictly_simple(&mut self, value: bool) {
        self.options.strictly_simple = value;
    }

    pub fn set_preserve_collinear(&mut self, value: bool) {
        self.options.preserve_collinear = value;
    }

    /// Adds one path. `Ok(false)` means it was degenerate and was skipped.
    pub fn add_path(&mut self, path: &[IntPoint], kind: PolyKind, closed: bool) -> Result<bool, ClipError> {
        let added = self
            .builder
            .add_path(path, kind, closed, self.options.preserve_collinear)?;
        if !added {
            trace!("skipped degenerate {:?} path of {} points", kind, path.len());
        }
        Ok(added)
    }

    /// Adds several paths; `Ok(true)` when at least one was kept. Stops at the
    /// first hard error.
    pub fn add_paths(&mut self, paths: &[Vec<IntPoint>], kind: PolyKind, closed: bool) -> Result<bool, ClipError> {
        let mut any = false;
        for path in paths {
            if self.add_path(path, kind, closed)? {
                any = true;
            }
        }
        Ok(any)
    }

    pub fn clear(&mut self) {
        self.builder.clear();
    }

    /// Bounding rectangle of every accepted path.
    pub fn bounds(&self) -> IntRect {
        self.builder.bounds()
    }

    /// Clips with the same fill rule for both operands.
    pub fn execute(&mut self, clip_type: ClipType, fill_rule: FillRule) -> Result<Paths, ClipError> {
        self.execute_with(clip_type, fill_rule, fill_rule)
    }

    /// Clips closed paths and returns the output contours. Outers have positive
    /// area, holes negative, unless `reverse_solution` is set.
    pub fn execute_with(
        &mut self,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
    ) -> Result<Paths, ClipError> {
        if self.executing {
            return Err(ClipError::Reentrant);
        }
        if self.builder.has_open_paths {
            return Err(ClipError::OpenPathsNeedTree);
        }
        let sweep = self.run(clip_type, subj_fill, clip_fill, false)?;
        Ok(sweep.build_result())
    }

    /// Clips and returns the contours nested by containment. Open subject
    /// paths are only supported here.
    pub fn execute_tree(
        &mut self,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
    ) -> Result<PolyTree, ClipError> {
        if self.executing {
            return Err(ClipError::Reentrant);
        }
        let mut sweep = self.run(clip_type, subj_fill, clip_fill, true)?;
        Ok(sweep.build_tree())
    }

    fn run(
        &mut self,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
        using_tree: bool,
    ) -> Result<Sweep, ClipError> {
        self.executing = true;
        let mut sweep = Sweep::new(&self.builder, clip_type, subj_fill, clip_fill, self.options, using_tree);
        let result = sweep.execute();
        self.executing = false;
        result.map(|()| sweep)
    }
}

// ─────────────────────────── Sweep state ──────────────────────────────────────

pub(crate) struct Sweep {
    edges: Vec<Edge>,
    minima: Vec<LocalMinimum>,
    current_lm: usize,
    scanbeam: Scanbeam,
    ael: EdgeList,
    sel: EdgeList,
    out: Contours,
    joins: Vec<Join>,
    ghost_joins: Vec<GhostJoin>,
    intersections: Vec<IntersectNode>,
    /// X of maxima met in the current scanbeam (strictly simple only).
    maxima: Vec<i64>,
    clip_type: ClipType,
    subj_fill: FillRule,
    clip_fill: FillRule,
    use_full_range: bool,
    options: ClipOptions,
    using_tree: bool,
}

impl Sweep {
    fn new(
        builder: &EdgeBuilder,
        clip_type: ClipType,
        subj_fill: FillRule,
        clip_fill: FillRule,
        options: ClipOptions,
        using_tree: bool,
    ) -> Self {
        let mut edges = builder.edges.clone();
        let mut minima = builder.minima.clone();
        // Stable: minima at the same Y keep insertion order.
        minima.sort_by(|a, b| b.y.cmp(&a.y));

        let mut scanbeam = Scanbeam::new();
        for lm in &minima {
            scanbeam.insert(lm.y);
            if let Some(e) = lm.left_bound {
                let edge = &mut edges[e];
                edge.curr = edge.bot;
                edge.side = EdgeSide::Left;
                edge.out_idx = OutIdx::Unassigned;
            }
            if let Some(e) = lm.right_bound {
                let edge = &mut edges[e];
                edge.curr = edge.bot;
                edge.side = EdgeSide::Right;
                edge.out_idx = OutIdx::Unassigned;
            }
        }

        let n = edges.len();
        Sweep {
            edges,
            minima,
            current_lm: 0,
            scanbeam,
            ael: EdgeList::new(n),
            sel: EdgeList::new(n),
            out: Contours::new(),
            joins: Vec::new(),
            ghost_joins: Vec::new(),
            intersections: Vec::new(),
            maxima: Vec::new(),
            clip_type,
            subj_fill,
            clip_fill,
            use_full_range: builder.use_full_range,
            options,
            using_tree,
        }
    }

    fn execute(&mut self) -> Result<(), ClipError> {
        let Some(mut bot_y) = self.scanbeam.pop() else {
            return Ok(());
        };
        self.insert_local_minima_into_ael(bot_y);
        loop {
            let top_y = match self.scanbeam.pop() {
                Some(y) => y,
                None if self.local_minima_pending() => bot_y,
                None => break,
            };
            if log_enabled!(Level::Trace) {
                trace!("scanbeam {} -> {}, {} active edges", bot_y, top_y, self.ael.iter().count());
            }
            self.process_horizontals();
            self.ghost_joins.clear();
            self.process_intersections(top_y)?;
            self.process_edges_at_top_of_scanbeam(top_y)?;
            bot_y = top_y;
            self.insert_local_minima_into_ael(bot_y);
        }

        for rec in 0..self.out.recs.len() {
            if self.out.recs[rec].pts.is_some() && !self.out.recs[rec].is_open {
                self.orient_contour(rec);
            }
        }

        let join_count = self.joins.len();
        if join_count > 0 {
            self.join_common_edges();
        }

        let preserve_col = self.options.preserve_collinear || self.options.strictly_simple;
        for rec in 0..self.out.recs.len() {
            if self.out.recs[rec].pts.is_none() {
                continue;
            }
            if self.out.recs[rec].is_open {
                self.out.fixup_out_polyline(rec);
            } else {
                self.out.fixup_out_polygon(rec, preserve_col, self.use_full_range);
            }
        }

        if self.options.strictly_simple {
            self.do_simple_polygons();
            // Split-off pieces can be spikes or two-point slivers.
            for rec in 0..self.out.recs.len() {
                if !self.out.recs[rec].is_open {
                    self.out.fixup_out_polygon(rec, preserve_col, self.use_full_range);
                }
            }
        }

        debug!(
            "{:?} (subject {:?}, clip {:?}): {} contours, {} joins",
            self.clip_type,
            self.subj_fill,
            self.clip_fill,
            self.out.recs.iter().filter(|r| r.pts.is_some()).count(),
            join_count
        );
        Ok(())
    }

    // ─────── Local minima ─────────────────────────────────────────────────────

    fn local_minima_pending(&self) -> bool {
        self.current_lm < self.minima.len()
    }

    fn pop_local_minima(&mut self, y: i64) -> Option<LocalMinimum> {
        let lm = *self.minima.get(self.current_lm)?;
        if lm.y != y {
            return None;
        }
        self.current_lm += 1;
        Some(lm)
    }

    fn insert_local_minima_into_ael(&mut self, bot_y: i64) {
        while let Some(lm) = self.pop_local_minima(bot_y) {
            let (lb, rb) = (lm.left_bound, lm.right_bound);
            let mut op1 = None;
            match (lb, rb) {
                (None, Some(rb)) => {
                    self.insert_edge_into_ael(rb, None);
                    self.set_winding_count(rb);
                    if self.is_contributing(rb) {
                        op1 = Some(self.add_out_pt(rb, self.edges[rb].bot));
                    }
                }
                (Some(lb), None) => {
                    self.insert_edge_into_ael(lb, None);
                    self.set_winding_count(lb);
                    if self.is_contributing(lb) {
                        op1 = Some(self.add_out_pt(lb, self.edges[lb].bot));
                    }
                    self.scanbeam.insert(self.edges[lb].top.y);
                }
                (Some(lb), Some(rb)) => {
                    self.insert_edge_into_ael(lb, None);
                    self.insert_edge_into_ael(rb, Some(lb));
                    self.set_winding_count(lb);
                    self.edges[rb].wind_cnt = self.edges[lb].wind_cnt;
                    self.edges[rb].wind_cnt2 = self.edges[lb].wind_cnt2;
                    if self.is_contributing(lb) {
                        op1 = Some(self.add_local_min_poly(lb, rb, self.edges[lb].bot));
                    }
                    self.scanbeam.insert(self.edges[lb].top.y);
                }
                (None, None) => continue,
            }

            if let Some(rb) = rb {
                if self.edges[rb].is_horizontal() {
                    self.sel.push_front(rb);
                    if let Some(next) = self.edges[rb].next_in_lml {
                        self.scanbeam.insert(self.edges[next].top.y);
                    }
                } else {
                    self.scanbeam.insert(self.edges[rb].top.y);
                }
            }

            let (Some(lb), Some(rb)) = (lb, rb) else {
                continue;
            };

            // A horizontal right bound overlapping a horizontal output run left
            // behind earlier in this scanbeam will need stitching to it.
            if let Some(op1) = op1 {
                if self.edges[rb].is_horizontal() && self.edges[rb].wind_delta != 0 {
                    let (bx, tx) = (self.edges[rb].bot.x, self.edges[rb].top.x);
                    for i in 0..self.ghost_joins.len() {
                        let gj = self.ghost_joins[i];
                        if horz_segments_overlap(self.out.pt(gj.op).x, gj.off_pt.x, bx, tx) {
                            self.joins.push(Join {
                                op1: gj.op,
                                op2: op1,
                                off_pt: gj.off_pt,
                            });
                        }
                    }
                }
            }

            if let (Some(op1), Some(prev)) = (op1, self.ael.prev(lb)) {
                let (l, p) = (&self.edges[lb], &self.edges[prev]);
                if l.out_idx.is_assigned()
                    && p.curr.x == l.bot.x
                    && p.out_idx.is_assigned()
                    && slopes_equal4(p.bot, p.top, l.curr, l.top, self.use_full_range)
                    && l.wind_delta != 0
                    && p.wind_delta != 0
                {
                    let (bot, top) = (l.bot, l.top);
                    let op2 = self.add_out_pt(prev, bot);
                    self.joins.push(Join { op1, op2, off_pt: top });
                }
            }

            if self.ael.next(lb) != Some(rb) {
                if let (Some(op1), Some(prev)) = (op1, self.ael.prev(rb)) {
                    let (r, p) = (&self.edges[rb], &self.edges[prev]);
                    if r.out_idx.is_assigned()
                        && p.out_idx.is_assigned()
                        && slopes_equal4(p.curr, p.top, r.curr, r.top, self.use_full_range)
                        && r.wind_delta != 0
                        && p.wind_delta != 0
                    {
                        let (bot, top) = (r.bot, r.top);
                        let op2 = self.add_out_pt(prev, bot);
                        self.joins.push(Join { op1, op2, off_pt: top });
                    }
                }

                // rb must end up right of everything between the two bounds.
                let pt = self.edges[lb].curr;
                let mut e = self.ael.next(lb);
                while let Some(cur) = e {
                    if cur == rb {
                        break;
                    }
                    self.intersect_edges(rb, cur, pt);
                    e = self.ael.next(cur);
                }
            }
        }
    }

    // ─────── Active edge list ─────────────────────────────────────────────────

    fn insert_edge_into_ael(&mut self, edge: EdgeIdx, start: Option<EdgeIdx>) {
        let Some(head) = self.ael.head else {
            self.ael.push_front(edge);
            return;
        };
        if start.is_none() && e2_inserts_before_e1(&self.edges[head], &self.edges[edge]) {
            self.ael.push_front(edge);
            return;
        }
        let mut pos = start.unwrap_or(head);
        while let Some(next) = self.ael.next(pos) {
            if e2_inserts_before_e1(&self.edges[next], &self.edges[edge]) {
                break;
            }
            pos = next;
        }
        self.ael.insert_after(pos, edge);
    }

    /// Replaces `e` in the AEL with the next edge of its bound, carrying over
    /// the output and winding state. Returns the new edge.
    fn update_edge_into_ael(&mut self, e: EdgeIdx) -> EdgeIdx {
        debug_assert!(self.edges[e].next_in_lml.is_some(), "edge has no successor in its bound");
        let Some(next) = self.edges[e].next_in_lml else {
            return e;
        };
        let (out_idx, side, wind_delta, wind_cnt, wind_cnt2) = {
            let old = &self.edges[e];
            (old.out_idx, old.side, old.wind_delta, old.wind_cnt, old.wind_cnt2)
        };
        let edge = &mut self.edges[next];
        edge.out_idx = out_idx;
        edge.side = side;
        edge.wind_delta = wind_delta;
        edge.wind_cnt = wind_cnt;
        edge.wind_cnt2 = wind_cnt2;
        edge.curr = edge.bot;
        self.ael.replace(e, next);
        if !self.edges[next].is_horizontal() {
            self.scanbeam.insert(self.edges[next].top.y);
        }
        next
    }

    fn swap_sides(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let side = self.edges[e1].side;
        self.edges[e1].side = self.edges[e2].side;
        self.edges[e2].side = side;
    }

    fn swap_poly_indexes(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        let out_idx = self.edges[e1].out_idx;
        self.edges[e1].out_idx = self.edges[e2].out_idx;
        self.edges[e2].out_idx = out_idx;
    }

    fn is_maxima(&self, e: EdgeIdx, y: i64) -> bool {
        let edge = &self.edges[e];
        edge.top.y == y && edge.next_in_lml.is_none()
    }

    fn is_intermediate(&self, e: EdgeIdx, y: i64) -> bool {
        let edge = &self.edges[e];
        edge.top.y == y && edge.next_in_lml.is_some()
    }

    /// The other edge ending at `e`'s top as a maximum.
    fn maxima_pair(&self, e: EdgeIdx) -> Option<EdgeIdx> {
        let edge = &self.edges[e];
        let (next, prev) = (&self.edges[edge.next], &self.edges[edge.prev]);
        if next.top == edge.top && next.next_in_lml.is_none() {
            Some(edge.next)
        } else if prev.top == edge.top && prev.next_in_lml.is_none() {
            Some(edge.prev)
        } else {
            None
        }
    }

    /// As `maxima_pair`, but only a partner that is active (or horizontal).
    fn maxima_pair_ex(&self, e: EdgeIdx) -> Option<EdgeIdx> {
        let pair = self.maxima_pair(e)?;
        let edge = &self.edges[pair];
        if edge.out_idx == OutIdx::Skip || (!self.ael.contains(pair) && !edge.is_horizontal()) {
            None
        } else {
            Some(pair)
        }
    }

    /// True when `other` starts where `e` starts, still rises, contributes, and
    /// lies along the same line, so their output edges will overlap.
    /// `by_curr` compares slopes through the current positions rather than the
    /// stored endpoints.
    fn shares_bottom_segment(&self, e: EdgeIdx, other: EdgeIdx, by_curr: bool) -> bool {
        let (edge, o) = (&self.edges[e], &self.edges[other]);
        if o.curr != edge.bot
            || o.wind_delta == 0
            || edge.wind_delta == 0
            || !o.out_idx.is_assigned()
            || o.curr.y <= o.top.y
        {
            return false;
        }
        if by_curr {
            slopes_equal4(edge.curr, edge.top, o.curr, o.top, self.use_full_range)
        } else {
            slopes_equal4(edge.top, edge.bot, o.top, o.bot, self.use_full_range)
        }
    }

    // ─────── Winding ──────────────────────────────────────────────────────────

    /// (own fill rule, other operand's fill rule)
    fn fill_rules(&self, kind: PolyKind) -> (FillRule, FillRule) {
        match kind {
            PolyKind::Subject => (self.subj_fill, self.clip_fill),
            PolyKind::Clip => (self.clip_fill, self.subj_fill),
        }
    }

    fn is_even_odd(&self, kind: PolyKind) -> bool {
        self.fill_rules(kind).0 == FillRule::EvenOdd
    }

    fn is_even_odd_alt(&self, kind: PolyKind) -> bool {
        self.fill_rules(kind).1 == FillRule::EvenOdd
    }

    fn set_winding_count(&mut self, edge: EdgeIdx) {
        let kind = self.edges[edge].kind;
        let wind_delta = self.edges[edge].wind_delta;

        // Nearest closed edge of the same operand to the left.
        let mut e = self.ael.prev(edge);
        while let Some(p) = e {
            if self.edges[p].kind == kind && self.edges[p].wind_delta != 0 {
                break;
            }
            e = self.ael.prev(p);
        }

        let (wind_cnt, mut wind_cnt2, mut cursor) = match e {
            None => {
                let wc = if wind_delta != 0 {
                    wind_delta
                } else if self.fill_rules(kind).0 == FillRule::Negative {
                    -1
                } else {
                    1
                };
                (wc, 0, self.ael.head)
            }
            Some(p) if wind_delta == 0 && self.clip_type != ClipType::Union => {
                (1, self.edges[p].wind_cnt2, self.ael.next(p))
            }
            Some(p) if self.is_even_odd(kind) => {
                let wc = if wind_delta == 0 {
                    // Inside a subject polygon?
                    let mut inside = true;
                    let mut e2 = self.ael.prev(p);
                    while let Some(q) = e2 {
                        if self.edges[q].kind == self.edges[p].kind && self.edges[q].wind_delta != 0 {
                            inside = !inside;
                        }
                        e2 = self.ael.prev(q);
                    }
                    if inside {
                        0
                    } else {
                        1
                    }
                } else {
                    wind_delta
                };
                (wc, self.edges[p].wind_cnt2, self.ael.next(p))
            }
            Some(p) => {
                let (pwc, pwd) = (self.edges[p].wind_cnt, self.edges[p].wind_delta);
                let wc = if pwc * pwd < 0 {
                    // p heads toward zero: we are outside its polygon.
                    if pwc.abs() > 1 {
                        if pwd * wind_delta < 0 {
                            pwc
                        } else {
                            pwc + wind_delta
                        }
                    } else if wind_delta == 0 {
                        1
                    } else {
                        wind_delta
                    }
                } else if wind_delta == 0 {
                    if pwc < 0 {
                        pwc - 1
                    } else {
                        pwc + 1
                    }
                } else if pwd * wind_delta < 0 {
                    pwc
                } else {
                    pwc + wind_delta
                };
                (wc, self.edges[p].wind_cnt2, self.ael.next(p))
            }
        };

        let alt_even_odd = self.is_even_odd_alt(kind);
        while let Some(c) = cursor {
            if c == edge {
                break;
            }
            let wd = self.edges[c].wind_delta;
            if alt_even_odd {
                if wd != 0 {
                    wind_cnt2 = if wind_cnt2 == 0 { 1 } else { 0 };
                }
            } else {
                wind_cnt2 += wd;
            }
            cursor = self.ael.next(c);
        }

        self.edges[edge].wind_cnt = wind_cnt;
        self.edges[edge].wind_cnt2 = wind_cnt2;
    }

    fn is_contributing(&self, e: EdgeIdx) -> bool {
        let edge = &self.edges[e];
        let (pft, pft2) = self.fill_rules(edge.kind);

        let inside = match pft {
            // An open subject line flagged as inside a subject polygon.
            FillRule::EvenOdd => !(edge.wind_delta == 0 && edge.wind_cnt != 1),
            FillRule::NonZero => edge.wind_cnt.abs() == 1,
            FillRule::Positive => edge.wind_cnt == 1,
            FillRule::Negative => edge.wind_cnt == -1,
        };
        if !inside {
            return false;
        }

        let wc2 = edge.wind_cnt2;
        let other_inside = match pft2 {
            FillRule::EvenOdd | FillRule::NonZero => wc2 != 0,
            FillRule::Positive => wc2 > 0,
            FillRule::Negative => wc2 < 0,
        };
        match self.clip_type {
            ClipType::Intersection => other_inside,
            ClipType::Union => !other_inside,
            ClipType::Difference => match edge.kind {
                PolyKind::Subject => !other_inside,
                PolyKind::Clip => other_inside,
            },
            // Closed edges always contribute to XOR.
            ClipType::Xor => edge.wind_delta != 0 || !other_inside,
        }
    }

    // ─────── Top of scanbeam ──────────────────────────────────────────────────

    fn do_maxima(&mut self, e: EdgeIdx) -> Result<(), ClipError> {
        let Some(max_pair) = self.maxima_pair_ex(e) else {
            if self.edges[e].out_idx.is_assigned() {
                self.add_out_pt(e, self.edges[e].top);
            }
            self.ael.remove(e);
            return Ok(());
        };

        let top = self.edges[e].top;
        let mut next = self.ael.next(e);
        while let Some(n) = next {
            if n == max_pair {
                break;
            }
            self.intersect_edges(e, n, top);
            self.ael.swap_positions(e, n);
            next = self.ael.next(e);
        }

        match (self.edges[e].out_idx, self.edges[max_pair].out_idx) {
            (OutIdx::Unassigned, OutIdx::Unassigned) => {}
            (OutIdx::Assigned(_), OutIdx::Assigned(_)) => {
                self.add_local_max_poly(e, max_pair, top);
            }
            _ if self.edges[e].wind_delta == 0 => {
                if self.edges[e].out_idx.is_assigned() {
                    self.add_out_pt(e, top);
                    self.edges[e].out_idx = OutIdx::Unassigned;
                }
                if self.edges[max_pair].out_idx.is_assigned() {
                    self.add_out_pt(max_pair, top);
                    self.edges[max_pair].out_idx = OutIdx::Unassigned;
                }
            }
            _ => return Err(ClipError::MaximaPair),
        }
        self.ael.remove(e);
        self.ael.remove(max_pair);
        Ok(())
    }

    fn process_edges_at_top_of_scanbeam(&mut self, top_y: i64) -> Result<(), ClipError> {
        let strict = self.options.strictly_simple;

        // 1. Maxima are closed like bent horizontals, except where the partner
        //    really is horizontal; that one is left to the horizontal pass.
        let mut cur = self.ael.head;
        while let Some(mut e) = cur {
            let mut is_maxima_edge = self.is_maxima(e, top_y);
            if is_maxima_edge {
                if let Some(pair) = self.maxima_pair_ex(e) {
                    is_maxima_edge = !self.edges[pair].is_horizontal();
                }
            }

            if is_maxima_edge {
                if strict {
                    self.maxima.push(self.edges[e].top.x);
                }
                let prev = self.ael.prev(e);
                self.do_maxima(e)?;
                cur = match prev {
                    Some(p) => self.ael.next(p),
                    None => self.ael.head,
                };
                continue;
            }

            // 2. Promote edges that turn horizontal here, otherwise advance.
            let turns_horizontal = self.is_intermediate(e, top_y)
                && self.edges[e]
                    .next_in_lml
                    .is_some_and(|n| self.edges[n].is_horizontal());
            if turns_horizontal {
                e = self.update_edge_into_ael(e);
                if self.edges[e].out_idx.is_assigned() {
                    self.add_out_pt(e, self.edges[e].bot);
                }
                self.sel.push_front(e);
            } else {
                let x = self.edges[e].top_x(top_y);
                self.edges[e].curr = IntPoint::new(x, top_y);
            }

            // Touching contributing edges both get a vertex here, joined later.
            if strict {
                if let Some(prev) = self.ael.prev(e) {
                    let (edge, p) = (&self.edges[e], &self.edges[prev]);
                    if edge.out_idx.is_assigned()
                        && edge.wind_delta != 0
                        && p.out_idx.is_assigned()
                        && p.curr.x == edge.curr.x
                        && p.wind_delta != 0
                    {
                        let pt = edge.curr;
                        let op1 = self.add_out_pt(prev, pt);
                        let op2 = self.add_out_pt(e, pt);
                        self.joins.push(Join { op1, op2, off_pt: pt });
                    }
                }
            }

            cur = self.ael.next(e);
        }

        // 3. Horizontals at the top of the scanbeam.
        self.maxima.sort_unstable();
        self.process_horizontals();
        self.maxima.clear();

        // 4. Intermediate vertices.
        let mut cur = self.ael.head;
        while let Some(mut e) = cur {
            if self.is_intermediate(e, top_y) {
                let op = if self.edges[e].out_idx.is_assigned() {
                    Some(self.add_out_pt(e, self.edges[e].top))
                } else {
                    None
                };
                e = self.update_edge_into_ael(e);

                if let Some(op) = op {
                    let neighbour = [self.ael.prev(e), self.ael.next(e)]
                        .into_iter()
                        .flatten()
                        .find(|&n| self.shares_bottom_segment(e, n, true));
                    if let Some(n) = neighbour {
                        let (bot, top) = (self.edges[e].bot, self.edges[e].top);
                        let op2 = self.add_out_pt(n, bot);
                        self.joins.push(Join { op1: op, op2, off_pt: top });
                    }
                }
            }
            cur = self.ael.next(e);
        }
        Ok(())
    }
}
