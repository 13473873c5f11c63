// Copyright 2025 Lars Brubaker
// License: MIT
//
// An intrusive-style doubly-linked list over edge indices.
//
// The sweep keeps two of these: the active edge list (edges crossing the
// current scanbeam, ordered by X) and the sorted edge list (scratch space for
// horizontals and intersection sorting). Each list owns its own prev/next
// arrays sized to the edge arena, so an edge can sit in both at once.
// Ordering is the caller's business; the list only links and unlinks.

use crate::edge::EdgeIdx;

#[derive(Clone, Debug, Default)]
pub struct EdgeList {
    pub head: Option<EdgeIdx>,
    next: Vec<Option<EdgeIdx>>,
    prev: Vec<Option<EdgeIdx>>,
    member: Vec<bool>,
}

impl EdgeList {
    pub fn new(capacity: usize) -> Self {
        EdgeList {
            head: None,
            next: vec![None; capacity],
            prev: vec![None; capacity],
            member: vec![false; capacity],
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub fn contains(&self, e: EdgeIdx) -> bool {
        self.member[e]
    }

    #[inline]
    pub fn next(&self, e: EdgeIdx) -> Option<EdgeIdx> {
        self.next[e]
    }

    #[inline]
    pub fn prev(&self, e: EdgeIdx) -> Option<EdgeIdx> {
        self.prev[e]
    }

    /// Iterates the list from head to tail.
    pub fn iter(&self) -> EdgeListIter<'_> {
        EdgeListIter {
            list: self,
            cur: self.head,
        }
    }

    pub fn clear(&mut self) {
        while let Some(e) = self.head {
            self.remove(e);
        }
    }

    pub fn push_front(&mut self, e: EdgeIdx) {
        debug_assert!(!self.member[e]);
        self.prev[e] = None;
        self.next[e] = self.head;
        if let Some(h) = self.head {
            self.prev[h] = Some(e);
        }
        self.head = Some(e);
        self.member[e] = true;
    }

    /// Detaches and returns the head.
    pub fn pop_front(&mut self) -> Option<EdgeIdx> {
        let e = self.head?;
        self.remove(e);
        Some(e)
    }

    pub fn insert_after(&mut self, pos: EdgeIdx, e: EdgeIdx) {
        debug_assert!(self.member[pos] && !self.member[e]);
        let after = self.next[pos];
        self.next[e] = after;
        self.prev[e] = Some(pos);
        if let Some(a) = after {
            self.prev[a] = Some(e);
        }
        self.next[pos] = Some(e);
        self.member[e] = true;
    }

    pub fn remove(&mut self, e: EdgeIdx) {
        if !self.member[e] {
            return;
        }
        let prev = self.prev[e];
        let next = self.next[e];
        match prev {
            Some(p) => self.next[p] = next,
            None => self.head = next,
        }
        if let Some(n) = next {
            self.prev[n] = prev;
        }
        self.next[e] = None;
        self.prev[e] = None;
        self.member[e] = false;
    }

    /// Puts `new` in the slot currently held by `old`, unlinking `old`.
    pub fn replace(&mut self, old: EdgeIdx, new: EdgeIdx) {
        debug_assert!(self.member[old] && !self.member[new]);
        let prev = self.prev[old];
        let next = self.next[old];
        match prev {
            Some(p) => self.next[p] = Some(new),
            None => self.head = Some(new),
        }
        if let Some(n) = next {
            self.prev[n] = Some(new);
        }
        self.prev[new] = prev;
        self.next[new] = next;
        self.member[new] = true;
        self.prev[old] = None;
        self.next[old] = None;
        self.member[old] = false;
    }

    /// Exchanges the positions of two member edges, adjacent or not.
    pub fn swap_positions(&mut self, e1: EdgeIdx, e2: EdgeIdx) {
        if e1 == e2 || !self.member[e1] || !self.member[e2] {
            return;
        }
        // Self-referential links are avoided by handling adjacency first.
        if self.next[e1] == Some(e2) {
            let next = self.next[e2];
            let prev = self.prev[e1];
            self.link(prev, e2);
            self.link(Some(e2), e1);
            self.link_back(e1, next);
        } else if self.next[e2] == Some(e1) {
            let next = self.next[e1];
            let prev = self.prev[e2];
            self.link(prev, e1);
            self.link(Some(e1), e2);
            self.link_back(e2, next);
        } else {
            let (p1, n1) = (self.prev[e1], self.next[e1]);
            let (p2, n2) = (self.prev[e2], self.next[e2]);
            self.link(p2, e1);
            self.link_back(e1, n2);
            self.link(p1, e2);
            self.link_back(e2, n1);
        }
    }

    /// Makes this list an exact copy of `other`'s ordering.
    pub fn copy_from(&mut self, other: &EdgeList) {
        self.clear();
        let mut tail: Option<EdgeIdx> = None;
        for e in other.iter() {
            match tail {
                Some(t) => self.insert_after(t, e),
                None => self.push_front(e),
            }
            tail = Some(e);
        }
    }

    /// prev <-> e, with `None` meaning e becomes head.
    #[inline]
    fn link(&mut self, prev: Option<EdgeIdx>, e: EdgeIdx) {
        match prev {
            Some(p) => self.next[p] = Some(e),
            None => self.head = Some(e),
        }
        self.prev[e] = prev;
    }

    #[inline]
    fn link_back(&mut self, e: EdgeIdx, next: Option<EdgeIdx>) {
        self.next[e] = next;
        if let Some(n) = next {
            self.prev[n] = Some(e);
        }
    }
}

pub struct EdgeListIter<'a> {
    list: &'a EdgeList,
    cur: Option<EdgeIdx>,
}

impl Iterator for EdgeListIter<'_> {
    type Item = EdgeIdx;

    fn next(&mut self) -> Option<EdgeIdx> {
        let e = self.cur?;
        self.cur = self.list.next[e];
        Some(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_of(order: &[EdgeIdx]) -> EdgeList {
        let mut l = EdgeList::new(8);
        for &e in order.iter().rev() {
            l.push_front(e);
        }
        l
    }

    fn order(l: &EdgeList) -> Vec<EdgeIdx> {
        l.iter().collect()
    }

    fn check_back_links(l: &EdgeList) {
        let fwd = order(l);
        for w in fwd.windows(2) {
            assert_eq!(l.prev(w[1]), Some(w[0]));
        }
        if let Some(&h) = fwd.first() {
            assert_eq!(l.prev(h), None);
        }
    }

    #[test]
    fn push_insert_remove() {
        let mut l = list_of(&[1, 3]);
        l.insert_after(1, 2);
        assert_eq!(order(&l), vec![1, 2, 3]);
        l.remove(1);
        assert_eq!(order(&l), vec![2, 3]);
        assert!(!l.contains(1));
        l.remove(1);
        assert_eq!(order(&l), vec![2, 3]);
        check_back_links(&l);
    }

    #[test]
    fn swap_adjacent_both_directions() {
        let mut l = list_of(&[0, 1, 2, 3]);
        l.swap_positions(1, 2);
        assert_eq!(order(&l), vec![0, 2, 1, 3]);
        check_back_links(&l);
        l.swap_positions(1, 2);
        assert_eq!(order(&l), vec![0, 1, 2, 3]);
        l.swap_positions(0, 1);
        assert_eq!(order(&l), vec![1, 0, 2, 3]);
        assert_eq!(l.head, Some(1));
        check_back_links(&l);
    }

    #[test]
    fn swap_apart() {
        let mut l = list_of(&[0, 1, 2, 3, 4]);
        l.swap_positions(0, 4);
        assert_eq!(order(&l), vec![4, 1, 2, 3, 0]);
        check_back_links(&l);
        l.swap_positions(1, 3);
        assert_eq!(order(&l), vec![4, 3, 2, 1, 0]);
        check_back_links(&l);
    }

    #[test]
    fn replace_keeps_slot() {
        let mut l = list_of(&[0, 1, 2]);
        l.replace(1, 5);
        assert_eq!(order(&l), vec![0, 5, 2]);
        assert!(!l.contains(1));
        l.replace(0, 6);
        assert_eq!(l.head, Some(6));
        check_back_links(&l);
    }

    #[test]
    fn copy_and_pop() {
        let src = list_of(&[3, 1, 4]);
        let mut dst = list_of(&[7]);
        dst.copy_from(&src);
        assert_eq!(order(&dst), vec![3, 1, 4]);
        assert!(!dst.contains(7));
        assert_eq!(dst.pop_front(), Some(3));
        assert_eq!(dst.pop_front(), Some(1));
        assert_eq!(dst.pop_front(), Some(4));
        assert_eq!(dst.pop_front(), None);
        assert!(dst.is_empty());
    }
}
