// Copyright 2025 Lars Brubaker
// License: MIT
//
// Scanbeam queue: the distinct Y values at which the sweep must stop.
// The sweep runs from the largest Y down, so this is a max-heap.

use std::collections::BinaryHeap;

#[derive(Clone, Debug, Default)]
pub struct Scanbeam {
    heap: BinaryHeap<i64>,
}

impl Scanbeam {
    pub fn new() -> Self {
        Scanbeam::default()
    }

    #[inline]
    pub fn insert(&mut self, y: i64) {
        self.heap.push(y);
    }

    /// Removes and returns the largest Y, discarding its duplicates.
    pub fn pop(&mut self) -> Option<i64> {
        let y = self.heap.pop()?;
        while self.heap.peek() == Some(&y) {
            self.heap.pop();
        }
        Some(y)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_descending_without_duplicates() {
        let mut sb = Scanbeam::new();
        for y in [3, 10, -2, 10, 3, 7] {
            sb.insert(y);
        }
        let mut out = Vec::new();
        while let Some(y) = sb.pop() {
            out.push(y);
        }
        assert_eq!(out, vec![10, 7, 3, -2]);
        assert!(sb.is_empty());
    }

    #[test]
    fn pop_on_empty() {
        let mut sb = Scanbeam::new();
        assert_eq!(sb.pop(), None);
        sb.insert(1);
        sb.clear();
        assert!(sb.is_empty());
    }
}
