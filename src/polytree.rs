// Copyright 2025 Lars Brubaker
// License: MIT
//
// Hierarchical clipping result.
//
// Nodes live in one Vec and refer to each other by index. Top-level nodes
// (outers and open paths) are the tree's own children; holes are children of
// the outer they lie in, islands inside a hole are children of that hole, and
// so on. Hole state follows from depth.

use crate::geom::{Path, Paths};

/// Index of a node in its `PolyTree`.
pub type NodeIdx = usize;

#[derive(Clone, Debug, Default)]
pub struct PolyNode {
    contour: Path,
    is_open: bool,
    parent: Option<NodeIdx>,
    children: Vec<NodeIdx>,
    index: usize,
}

impl PolyNode {
    pub fn contour(&self) -> &Path {
        &self.contour
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// `None` for top-level nodes.
    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Position among the parent's (or the tree's) children.
    pub fn index(&self) -> usize {
        self.index
    }
}

#[derive(Clone, Debug, Default)]
pub struct PolyTree {
    nodes: Vec<PolyNode>,
    roots: Vec<NodeIdx>,
}

impl PolyTree {
    pub fn new() -> Self {
        PolyTree::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Number of nodes at every depth.
    pub fn total(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes.
    pub fn children(&self) -> &[NodeIdx] {
        &self.roots
    }

    pub fn node(&self, idx: NodeIdx) -> &PolyNode {
        &self.nodes[idx]
    }

    /// Every node in creation order.
    pub fn nodes(&self) -> &[PolyNode] {
        &self.nodes
    }

    /// True for closed nodes at odd depth below the top level.
    pub fn is_hole(&self, idx: NodeIdx) -> bool {
        let mut hole = false;
        let mut parent = self.nodes[idx].parent;
        while let Some(p) = parent {
            hole = !hole;
            parent = self.nodes[p].parent;
        }
        hole
    }

    pub(crate) fn add_node(&mut self, contour: Path, is_open: bool) -> NodeIdx {
        self.nodes.push(PolyNode {
            contour,
            is_open,
            ..PolyNode::default()
        });
        self.nodes.len() - 1
    }

    /// Makes `node` the last child of `parent`, or of the tree when `None`.
    pub(crate) fn attach(&mut self, parent: Option<NodeIdx>, node: NodeIdx) {
        let siblings = match parent {
            Some(p) => &mut self.nodes[p].children,
            None => &mut self.roots,
        };
        let index = siblings.len();
        siblings.push(node);
        self.nodes[node].parent = parent;
        self.nodes[node].index = index;
    }

    /// Every contour, parents before children.
    pub fn to_paths(&self) -> Paths {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect(&self.roots, true, &mut out);
        out
    }

    /// Closed contours only, parents before children.
    pub fn closed_paths(&self) -> Paths {
        let mut out = Vec::with_capacity(self.nodes.len());
        self.collect(&self.roots, false, &mut out);
        out
    }

    /// Open contours; these are always top-level.
    pub fn open_paths(&self) -> Paths {
        self.roots
            .iter()
            .map(|&n| &self.nodes[n])
            .filter(|n| n.is_open)
            .map(|n| n.contour.clone())
            .collect()
    }

    fn collect(&self, level: &[NodeIdx], include_open: bool, out: &mut Paths) {
        for &n in level {
            let node = &self.nodes[n];
            if node.is_open && !include_open {
                continue;
            }
            if !node.contour.is_empty() {
                out.push(node.contour.clone());
            }
            self.collect(&node.children, include_open, out);
        }
    }
}
