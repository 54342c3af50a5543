//! Leaf-chain iterators.

use std::iter::FusedIterator;
use std::ops::Bound;

use crate::common::{Key, NodeId};
use crate::index::btree::arena::NodeArena;

/// Ascending iterator over every entry of a tree.
///
/// Forward iteration follows `next` links from the leftmost leaf; reverse
/// iteration follows `prev` links from the rightmost leaf. The two ends
/// never cross because the number of remaining entries is tracked.
pub struct Iter<'a, V> {
    arena: &'a NodeArena<V>,
    /// Leaf and index of the next entry to yield from the front.
    front: (NodeId, usize),
    /// Leaf and one-past index of the next entry to yield from the back.
    back: (NodeId, usize),
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    pub(crate) fn new(
        arena: &'a NodeArena<V>,
        first_leaf: NodeId,
        last_leaf: NodeId,
        last_len: usize,
        len: usize,
    ) -> Self {
        Self {
            arena,
            front: (first_leaf, 0),
            back: (last_leaf, last_len),
            remaining: len,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        loop {
            let (leaf_id, idx) = self.front;
            let leaf = arena.leaf(leaf_id);
            if idx < leaf.len() {
                self.front = (leaf_id, idx + 1);
                self.remaining -= 1;
                return Some((leaf.keys[idx], &leaf.values[idx]));
            }
            self.front = (leaf.next?, 0);
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let arena = self.arena;
        loop {
            let (leaf_id, end) = self.back;
            let leaf = arena.leaf(leaf_id);
            if end > 0 {
                self.back = (leaf_id, end - 1);
                self.remaining -= 1;
                return Some((leaf.keys[end - 1], &leaf.values[end - 1]));
            }
            let prev = leaf.prev?;
            self.back = (prev, arena.leaf(prev).len());
        }
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

/// Ascending iterator over the entries within a key range.
pub struct Range<'a, V> {
    arena: &'a NodeArena<V>,
    /// Next position to examine; `None` once exhausted.
    cursor: Option<(NodeId, usize)>,
    end: Bound<Key>,
}

impl<'a, V> Range<'a, V> {
    pub(crate) fn new(arena: &'a NodeArena<V>, start: Option<(NodeId, usize)>, end: Bound<Key>) -> Self {
        Self {
            arena,
            cursor: start,
            end,
        }
    }

    fn before_end(&self, key: Key) -> bool {
        match self.end {
            Bound::Included(end) => key <= end,
            Bound::Excluded(end) => key < end,
            Bound::Unbounded => true,
        }
    }
}

impl<'a, V> Iterator for Range<'a, V> {
    type Item = (Key, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let arena = self.arena;
        loop {
            let (leaf_id, idx) = self.cursor?;
            let leaf = arena.leaf(leaf_id);
            if idx >= leaf.len() {
                self.cursor = leaf.next.map(|next| (next, 0));
                continue;
            }

            let key = leaf.keys[idx];
            if !self.before_end(key) {
                self.cursor = None;
                return None;
            }
            self.cursor = Some((leaf_id, idx + 1));
            return Some((key, &leaf.values[idx]));
        }
    }
}

impl<V> FusedIterator for Range<'_, V> {}
