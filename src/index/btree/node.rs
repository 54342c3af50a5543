//! Node variants of the B+ tree.
//!
//! A [`Node`] is either a leaf (keys + values + sibling links) or an
//! internal node (boundary keys + child ids). Both carry a non-owning
//! `parent` link; the arena owns every node.
//!
//! # Boundary keys
//! ```text
//!                 [ 4 | 10 ]                 keys[i] = max key under children[i]
//!                /          \
//!         [ 2 | 4 ]        [ 6 | 8 | 10 ]
//!         /      \         /     |     \
//!     [1 2] <-> [3 4] <-> [5 6] <-> [7 8] <-> [9 10]     leaf chain
//! ```

use crate::common::{Key, NodeId};

/// A leaf: sorted keys with aligned values, linked to its neighbours.
#[derive(Debug)]
pub(crate) struct LeafNode<V> {
    pub(crate) keys: Vec<Key>,
    pub(crate) values: Vec<V>,
    pub(crate) prev: Option<NodeId>,
    pub(crate) next: Option<NodeId>,
}

impl<V> LeafNode<V> {
    /// Create an empty, unlinked leaf with room for `capacity` entries.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
            prev: None,
            next: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// Binary search for `key`.
    ///
    /// `Ok(i)` is an exact match; `Err(i)` is the first position whose key
    /// exceeds `key`, i.e. where it would be inserted.
    #[inline]
    pub(crate) fn search(&self, key: Key) -> std::result::Result<usize, usize> {
        self.keys.binary_search(&key)
    }

    pub(crate) fn get(&self, key: Key) -> Option<&V> {
        self.search(key).ok().map(|i| &self.values[i])
    }

    pub(crate) fn insert_at(&mut self, pos: usize, key: Key, value: V) {
        self.keys.insert(pos, key);
        self.values.insert(pos, value);
    }

    /// Move entries `[at..)` into a new unlinked leaf.
    pub(crate) fn split_off(&mut self, at: usize, capacity: usize) -> LeafNode<V> {
        let mut right = LeafNode::with_capacity(capacity);
        right.keys.extend(self.keys.drain(at..));
        right.values.extend(self.values.drain(at..));
        right
    }
}

/// An internal node: boundary keys aligned with child ids.
#[derive(Debug)]
pub(crate) struct InternalNode {
    pub(crate) keys: Vec<Key>,
    pub(crate) children: Vec<NodeId>,
}

impl InternalNode {
    /// Build a fresh root over a split pair.
    pub(crate) fn from_pair(
        left: NodeId,
        left_max: Key,
        right: NodeId,
        right_max: Key,
        capacity: usize,
    ) -> Self {
        let mut keys = Vec::with_capacity(capacity);
        let mut children = Vec::with_capacity(capacity);
        keys.extend([left_max, right_max]);
        children.extend([left, right]);
        Self { keys, children }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.keys.len()
    }

    /// Index of the first boundary `>= key`, or `len()` if `key` exceeds
    /// every boundary.
    #[inline]
    fn lower_bound(&self, key: Key) -> usize {
        self.keys.partition_point(|&boundary| boundary < key)
    }

    /// Child that may contain `key`, or `None` if `key` is larger than
    /// anything in this subtree.
    pub(crate) fn route(&self, key: Key) -> Option<NodeId> {
        self.children.get(self.lower_bound(key)).copied()
    }

    /// Child that should receive `key` on insert.
    ///
    /// Keys beyond the subtree maximum go to the last child, whose boundary
    /// is then raised by the caller.
    pub(crate) fn route_for_insert(&self, key: Key) -> NodeId {
        let slot = self.lower_bound(key).min(self.len() - 1);
        self.children[slot]
    }

    /// Slot whose boundary equals `old_max`, the pre-split maximum of the
    /// child it routes to.
    pub(crate) fn slot_of(&self, old_max: Key) -> usize {
        self.lower_bound(old_max)
    }

    /// Replace the split child's boundary and register its new right
    /// sibling directly after it. May leave the node one over its order.
    pub(crate) fn absorb_split(&mut self, slot: usize, left_max: Key, right: NodeId, right_max: Key) {
        self.keys[slot] = left_max;
        self.keys.insert(slot + 1, right_max);
        self.children.insert(slot + 1, right);
    }

    /// Move `[at..)` into a new internal node. Moved children still point
    /// at `self` until the caller rewires them.
    pub(crate) fn split_off(&mut self, at: usize, capacity: usize) -> InternalNode {
        let mut keys = Vec::with_capacity(capacity);
        let mut children = Vec::with_capacity(capacity);
        keys.extend(self.keys.drain(at..));
        children.extend(self.children.drain(at..));
        InternalNode { keys, children }
    }
}

#[derive(Debug)]
pub(crate) enum NodeKind<V> {
    Leaf(LeafNode<V>),
    Internal(InternalNode),
}

/// A node slot in the arena.
#[derive(Debug)]
pub(crate) struct Node<V> {
    pub(crate) parent: Option<NodeId>,
    pub(crate) kind: NodeKind<V>,
}

impl<V> Node<V> {
    pub(crate) fn leaf(parent: Option<NodeId>, leaf: LeafNode<V>) -> Self {
        Self {
            parent,
            kind: NodeKind::Leaf(leaf),
        }
    }

    pub(crate) fn internal(parent: Option<NodeId>, internal: InternalNode) -> Self {
        Self {
            parent,
            kind: NodeKind::Internal(internal),
        }
    }

    #[inline]
    pub(crate) fn keys(&self) -> &[Key] {
        match &self.kind {
            NodeKind::Leaf(leaf) => &leaf.keys,
            NodeKind::Internal(internal) => &internal.keys,
        }
    }

    /// Largest key in this node's subtree.
    #[inline]
    pub(crate) fn max_key(&self) -> Option<Key> {
        self.keys().last().copied()
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// Read-only view of one leaf, for walking the leaf chain by hand.
///
/// # Example
/// ```
/// use leafline::BPlusTree;
///
/// let mut tree = BPlusTree::new(3).unwrap();
/// for key in 1..=4 {
///     tree.insert(key, key * 10);
/// }
///
/// let first = tree.first_leaf();
/// assert_eq!(first.keys(), &[1, 2]);
/// let second = tree.leaf(first.next().unwrap()).unwrap();
/// assert_eq!(second.keys(), &[3, 4]);
/// assert_eq!(second.prev(), Some(first.id()));
/// ```
#[derive(Debug)]
pub struct LeafView<'a, V> {
    pub(crate) id: NodeId,
    pub(crate) leaf: &'a LeafNode<V>,
}

impl<'a, V> LeafView<'a, V> {
    /// Arena id of this leaf.
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn keys(&self) -> &'a [Key] {
        &self.leaf.keys
    }

    pub fn values(&self) -> &'a [V] {
        &self.leaf.values
    }

    pub fn len(&self) -> usize {
        self.leaf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf.keys.is_empty()
    }

    /// Left neighbour in the leaf chain.
    pub fn prev(&self) -> Option<NodeId> {
        self.leaf.prev
    }

    /// Right neighbour in the leaf chain.
    pub fn next(&self) -> Option<NodeId> {
        self.leaf.next
    }
}

impl<V> Clone for LeafView<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for LeafView<'_, V> {}
