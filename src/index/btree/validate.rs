//! Structural invariant checks.
//!
//! [`BPlusTree::validate`] walks the whole tree and reports the first
//! invariant it finds broken. It is O(n) and intended for tests and
//! debugging, not for the hot path.

use crate::common::{Error, Key, NodeId, Result};
use crate::index::btree::node::NodeKind;
use crate::BPlusTree;

/// Facts gathered while walking the tree top-down.
#[derive(Default)]
struct Walk {
    /// Depth at which the first leaf was found.
    leaf_depth: Option<usize>,
    leaves: usize,
    entries: usize,
}

impl<V> BPlusTree<V> {
    /// Check every structural invariant of the tree.
    ///
    /// - keys strictly ascending inside each node
    /// - no node above its order, no empty node except an empty root leaf
    /// - every boundary key equals the maximum of its child's subtree
    /// - every child points back at its parent
    /// - every leaf at the same depth, equal to `height()`
    /// - the leaf chain is doubly linked, ascending, and holds `len()`
    ///   entries
    ///
    /// # Errors
    /// - `Error::Corrupted` naming the first offending node
    pub fn validate(&self) -> Result<()> {
        let root = self.root_id();
        if self.arena.parent(root).is_some() {
            return Err(Error::corrupted(root, "root has a parent"));
        }

        let mut walk = Walk::default();
        self.check_subtree(root, 1, &mut walk)?;

        if walk.entries != self.len() {
            return Err(Error::corrupted(
                root,
                format!("tree holds {} entries, len() is {}", walk.entries, self.len()),
            ));
        }
        if walk.leaf_depth != Some(self.height()) {
            return Err(Error::corrupted(
                root,
                format!("leaves at depth {:?}, height is {}", walk.leaf_depth, self.height()),
            ));
        }

        self.check_leaf_chain(walk.leaves)
    }

    fn check_subtree(&self, id: NodeId, depth: usize, walk: &mut Walk) -> Result<()> {
        let node = self.arena.get(id);
        let keys = node.keys();

        if keys.len() > self.order() {
            return Err(Error::corrupted(
                id,
                format!("{} entries exceed order {}", keys.len(), self.order()),
            ));
        }
        if keys.is_empty() && !(id == self.root_id() && node.is_leaf()) {
            return Err(Error::corrupted(id, "empty node"));
        }
        if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(Error::corrupted(
                id,
                format!("keys not strictly ascending: {} then {}", pair[0], pair[1]),
            ));
        }

        match &node.kind {
            NodeKind::Leaf(leaf) => {
                if leaf.values.len() != leaf.keys.len() {
                    return Err(Error::corrupted(id, "key and value counts differ"));
                }
                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(Error::corrupted(
                            id,
                            format!("leaf at depth {}, expected {}", depth, expected),
                        ));
                    }
                    Some(_) => {}
                }
                walk.leaves += 1;
                walk.entries += leaf.len();
            }
            NodeKind::Internal(internal) => {
                if internal.children.len() != internal.keys.len() {
                    return Err(Error::corrupted(id, "key and child counts differ"));
                }
                for (&boundary, &child) in internal.keys.iter().zip(&internal.children) {
                    if self.arena.parent(child) != Some(id) {
                        return Err(Error::corrupted(
                            child,
                            format!("parent link is {:?}, expected {}", self.arena.parent(child), id),
                        ));
                    }
                    // A child's own last key is its subtree max once the
                    // child itself is checked.
                    if self.arena.max_key(child) != Some(boundary) {
                        return Err(Error::corrupted(
                            id,
                            format!(
                                "boundary {} does not match max {:?} of {}",
                                boundary,
                                self.arena.max_key(child),
                                child
                            ),
                        ));
                    }
                    self.check_subtree(child, depth + 1, walk)?;
                }
            }
        }

        Ok(())
    }

    fn check_leaf_chain(&self, expected_leaves: usize) -> Result<()> {
        let head = self.first_leaf().id();
        let mut cursor = Some(head);
        let mut prev: Option<NodeId> = None;
        let mut last_key: Option<Key> = None;
        let mut leaves = 0;
        let mut entries = 0;

        while let Some(id) = cursor {
            let Some(leaf) = self.leaf(id) else {
                return Err(Error::corrupted(id, "leaf chain reaches an internal node"));
            };
            if leaf.prev() != prev {
                return Err(Error::corrupted(
                    id,
                    format!("prev link is {:?}, expected {:?}", leaf.prev(), prev),
                ));
            }
            if let (Some(last), Some(&first)) = (last_key, leaf.keys().first()) {
                if first <= last {
                    return Err(Error::corrupted(
                        id,
                        format!("chain goes from {} back to {}", last, first),
                    ));
                }
            }

            leaves += 1;
            if leaves > expected_leaves {
                return Err(Error::corrupted(id, "leaf chain longer than the tree"));
            }
            entries += leaf.len();
            last_key = leaf.keys().last().copied().or(last_key);
            prev = Some(id);
            cursor = leaf.next();
        }

        if leaves != expected_leaves || entries != self.len() {
            return Err(Error::corrupted(
                head,
                format!(
                    "leaf chain covers {} leaves / {} entries, tree has {} / {}",
                    leaves,
                    entries,
                    expected_leaves,
                    self.len()
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_empty_tree() {
        let tree: BPlusTree<u8> = BPlusTree::new(3).unwrap();
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_validate_after_mixed_inserts() {
        let mut tree = BPlusTree::new(3).unwrap();
        for i in 0..500i64 {
            let key = (i * 7919) % 1009;
            tree.insert(key, i);
        }
        assert_eq!(tree.validate(), Ok(()));
    }

    #[test]
    fn test_validate_detects_stale_boundary() {
        let mut tree = BPlusTree::new(3).unwrap();
        tree.extend((1..=4).map(|k| (k, ())));

        let root = tree.root_id();
        tree.arena.internal_mut(root).keys[1] = 99;

        match tree.validate() {
            Err(Error::Corrupted { node, reason }) => {
                assert_eq!(node, root);
                assert!(reason.contains("boundary 99"), "{}", reason);
            }
            other => panic!("Expected Corrupted, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_detects_broken_prev_link() {
        let mut tree = BPlusTree::new(3).unwrap();
        tree.extend((1..=6).map(|k| (k, ())));

        let second = tree.first_leaf().next().unwrap();
        tree.arena.leaf_mut(second).prev = None;

        assert!(matches!(tree.validate(), Err(Error::Corrupted { node, .. }) if node == second));
    }

    #[test]
    fn test_validate_detects_wrong_parent() {
        let mut tree = BPlusTree::new(3).unwrap();
        tree.extend((1..=4).map(|k| (k, ())));

        let first = tree.first_leaf().id();
        tree.arena.set_parent(first, None);

        assert!(matches!(tree.validate(), Err(Error::Corrupted { node, .. }) if node == first));
    }
}
