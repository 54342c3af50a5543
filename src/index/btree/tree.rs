//! The B+ tree: lookup, insertion and split propagation.

use std::collections::VecDeque;
use std::ops::{Bound, RangeBounds};

use tracing::{debug, trace};

use crate::common::{Key, NodeId, Result, TreeConfig};
use crate::index::btree::arena::NodeArena;
use crate::index::btree::iter::{Iter, Range};
use crate::index::btree::node::{InternalNode, LeafNode, LeafView, Node, NodeKind};
use crate::index::btree::stats::TreeStats;

/// An in-memory B+ tree mapping `i64` keys to values of type `V`.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                       BPlusTree<V>                       │
/// │  ┌──────────────┐  ┌──────────────────────────────────┐  │
/// │  │ root: NodeId │─▶│      arena: Vec<Node<V>>         │  │
/// │  └──────────────┘  │ [Leaf] [Leaf] [Internal] ...     │  │
/// │  ┌──────────────┐  └──────────────────────────────────┘  │
/// │  │ first_leaf   │─▶ head of the leaf chain               │
/// │  └──────────────┘                                        │
/// │  ┌──────────────┐  ┌──────────────┐                      │
/// │  │ config.order │  │    stats     │                      │
/// │  └──────────────┘  └──────────────┘                      │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// # Splitting
/// A node may briefly hold `order + 1` entries. When an insert leaves a
/// leaf over its order, the leaf splits at `len / 2` and the new right
/// sibling is registered in the parent next to the original. The parent
/// may overflow in turn; when the root splits a new root is created and
/// the height grows by one.
///
/// # Duplicate keys
/// Inserting an existing key overwrites its value and returns the old one.
///
/// # Thread Safety
/// None. Wrap the tree in [`SharedBPlusTree`](crate::SharedBPlusTree) to
/// share it between threads.
///
/// # Usage
/// ```
/// use leafline::BPlusTree;
///
/// let mut tree = BPlusTree::new(3).unwrap();
/// for key in 1..=10 {
///     tree.insert(key, format!("value-{}", key));
/// }
///
/// assert_eq!(tree.find(5).map(String::as_str), Some("value-5"));
/// assert_eq!(tree.find(42), None);
/// assert_eq!(tree.height(), 3);
/// ```
#[derive(Debug)]
pub struct BPlusTree<V> {
    /// Every node of the tree; ids index into it.
    pub(super) arena: NodeArena<V>,

    /// Current root. Replaced whenever the root splits.
    root: NodeId,

    /// Leftmost leaf, refreshed after every insert.
    first_leaf: NodeId,

    config: TreeConfig,

    /// Number of distinct keys.
    len: usize,

    /// Levels from root to leaf, 1 for a lone leaf.
    height: usize,

    stats: TreeStats,
}

impl<V> BPlusTree<V> {
    /// Create an empty tree of the given order.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < 2`
    pub fn new(order: usize) -> Result<Self> {
        Self::with_config(TreeConfig::new(order))
    }

    /// Create an empty tree from a config.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if the configured order is below the minimum
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    fn empty(config: TreeConfig) -> Self {
        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::leaf(
            None,
            LeafNode::with_capacity(config.max_entries()),
        ));
        debug!(order = config.order, "created B+ tree");

        Self {
            arena,
            root,
            first_leaf: root,
            config,
            len: 0,
            height: 1,
            stats: TreeStats::new(),
        }
    }

    // ========================================================================
    // Public API: Introspection
    // ========================================================================

    /// Maximum number of entries per node after an insert completes.
    pub fn order(&self) -> usize {
        self.config.order
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    /// Number of distinct keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels; every leaf sits at this depth.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of nodes ever allocated (leaves plus internal nodes).
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Operation counters.
    pub fn stats(&self) -> &TreeStats {
        &self.stats
    }

    /// Arena id of the current root.
    pub fn root_id(&self) -> NodeId {
        self.root
    }

    /// Whether the root is still a leaf (no split has happened yet).
    pub fn root_is_leaf(&self) -> bool {
        self.arena.get(self.root).is_leaf()
    }

    // ========================================================================
    // Public API: Lookup
    // ========================================================================

    /// Look up the value bound to `key`.
    ///
    /// Returns `None` if the key is absent; absence is not an error.
    pub fn find(&self, key: Key) -> Option<&V> {
        TreeStats::bump(&self.stats.lookups);

        let found = self
            .locate_leaf(key)
            .and_then(|leaf| self.arena.leaf(leaf).get(key));
        if found.is_some() {
            TreeStats::bump(&self.stats.hits);
        }
        found
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.find(key).is_some()
    }

    /// Smallest key and its value.
    pub fn first_key_value(&self) -> Option<(Key, &V)> {
        let leaf = self.arena.leaf(self.first_leaf);
        Some((*leaf.keys.first()?, leaf.values.first()?))
    }

    /// Largest key and its value.
    pub fn last_key_value(&self) -> Option<(Key, &V)> {
        let leaf = self.arena.leaf(self.last_leaf());
        Some((*leaf.keys.last()?, leaf.values.last()?))
    }

    // ========================================================================
    // Public API: Insert
    // ========================================================================

    /// Insert `key` bound to `value`.
    ///
    /// If the key already exists its value is replaced and the old value is
    /// returned; the tree shape does not change. Otherwise returns `None`.
    pub fn insert(&mut self, key: Key, value: V) -> Option<V> {
        let leaf_id = self.descend_for_insert(key);
        let leaf = self.arena.leaf_mut(leaf_id);

        let pos = match leaf.search(key) {
            Ok(pos) => {
                TreeStats::bump(&self.stats.updates);
                return Some(std::mem::replace(&mut leaf.values[pos], value));
            }
            Err(pos) => pos,
        };

        let old_max = leaf.keys.last().copied();
        leaf.insert_at(pos, key, value);
        let overflow = leaf.len() > self.config.order;

        self.len += 1;
        TreeStats::bump(&self.stats.inserts);

        if overflow {
            self.split_leaf(leaf_id, old_max);
        } else {
            self.raise_boundaries(leaf_id);
        }

        self.refresh_first_leaf();
        None
    }

    /// Insert with a key that may be missing.
    ///
    /// A `None` key is silently ignored: nothing is inserted, `value` is
    /// dropped and `None` is returned. This mirrors callers that hand over
    /// records whose key field was never set.
    pub fn insert_optional(&mut self, key: Option<Key>, value: V) -> Option<V> {
        match key {
            Some(key) => self.insert(key, value),
            None => {
                trace!("ignoring insert without a key");
                None
            }
        }
    }

    // ========================================================================
    // Public API: Traversal
    // ========================================================================

    /// Iterate over all entries in ascending key order.
    ///
    /// Walks the leaf chain forward from the leftmost leaf, or backward from
    /// the rightmost one when reversed.
    pub fn iter(&self) -> Iter<'_, V> {
        let last = self.last_leaf();
        Iter::new(
            &self.arena,
            self.first_leaf,
            last,
            self.arena.leaf(last).len(),
            self.len,
        )
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = Key> + '_ {
        self.iter().map(|(key, _)| key)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Iterate over the entries whose keys fall within `range`, ascending.
    ///
    /// An empty or inverted range yields nothing.
    pub fn range<R: RangeBounds<Key>>(&self, range: R) -> Range<'_, V> {
        let start = match range.start_bound() {
            Bound::Unbounded => Some((self.first_leaf, 0)),
            Bound::Included(&key) => {
                let leaf = self.descend_for_insert(key);
                let idx = self.arena.leaf(leaf).keys.partition_point(|&k| k < key);
                Some((leaf, idx))
            }
            Bound::Excluded(&key) => {
                let leaf = self.descend_for_insert(key);
                let idx = self.arena.leaf(leaf).keys.partition_point(|&k| k <= key);
                Some((leaf, idx))
            }
        };
        Range::new(&self.arena, start, range.end_bound().cloned())
    }

    /// The leftmost leaf, the head of the leaf chain.
    ///
    /// For an empty tree this is the empty root leaf.
    pub fn first_leaf(&self) -> LeafView<'_, V> {
        LeafView {
            id: self.first_leaf,
            leaf: self.arena.leaf(self.first_leaf),
        }
    }

    /// View of the leaf with the given id, or `None` if `id` is not a leaf
    /// of this tree.
    pub fn leaf(&self, id: NodeId) -> Option<LeafView<'_, V>> {
        match &self.arena.try_get(id)?.kind {
            NodeKind::Leaf(leaf) => Some(LeafView { id, leaf }),
            NodeKind::Internal(_) => None,
        }
    }

    /// Keys of every node, level by level from the root, left to right.
    ///
    /// ```
    /// use leafline::BPlusTree;
    ///
    /// let mut tree = BPlusTree::new(3).unwrap();
    /// for key in 1..=4 {
    ///     tree.insert(key, ());
    /// }
    /// assert_eq!(
    ///     tree.levels(),
    ///     vec![vec![vec![2, 4]], vec![vec![1, 2], vec![3, 4]]]
    /// );
    /// ```
    pub fn levels(&self) -> Vec<Vec<Vec<Key>>> {
        let mut levels = Vec::with_capacity(self.height);
        let mut queue = VecDeque::from([self.root]);

        while !queue.is_empty() {
            let mut level = Vec::with_capacity(queue.len());
            for _ in 0..queue.len() {
                let Some(id) = queue.pop_front() else { break };
                let node = self.arena.get(id);
                level.push(node.keys().to_vec());
                if let NodeKind::Internal(internal) = &node.kind {
                    queue.extend(internal.children.iter().copied());
                }
            }
            levels.push(level);
        }

        levels
    }

    // ========================================================================
    // Internal: Descent
    // ========================================================================

    /// Leaf that would hold `key`, or `None` if `key` is beyond the maximum.
    fn locate_leaf(&self, key: Key) -> Option<NodeId> {
        let mut id = self.root;
        loop {
            match &self.arena.get(id).kind {
                NodeKind::Leaf(_) => return Some(id),
                NodeKind::Internal(internal) => id = internal.route(key)?,
            }
        }
    }

    /// Leaf that should receive `key`.
    fn descend_for_insert(&self, key: Key) -> NodeId {
        let mut id = self.root;
        while let NodeKind::Internal(internal) = &self.arena.get(id).kind {
            id = internal.route_for_insert(key);
        }
        id
    }

    fn last_leaf(&self) -> NodeId {
        let mut id = self.root;
        while let NodeKind::Internal(internal) = &self.arena.get(id).kind {
            id = internal.children[internal.len() - 1];
        }
        id
    }

    fn refresh_first_leaf(&mut self) {
        let mut id = self.root;
        while let NodeKind::Internal(internal) = &self.arena.get(id).kind {
            id = internal.children[0];
        }
        self.first_leaf = id;
    }

    // ========================================================================
    // Internal: Split propagation
    // ========================================================================

    /// Split an overflowing leaf and register the new right half upward.
    ///
    /// `old_max` is the leaf's maximum before the insert that overflowed
    /// it; the parent still records it as this leaf's boundary.
    fn split_leaf(&mut self, left_id: NodeId, old_max: Option<Key>) {
        let capacity = self.config.max_entries();
        let parent = self.arena.parent(left_id);

        let left = self.arena.leaf_mut(left_id);
        let middle = left.len() / 2;
        let mut right = left.split_off(middle, capacity);
        let old_next = left.next;
        right.prev = Some(left_id);
        right.next = old_next;

        let right_id = self.arena.alloc(Node::leaf(parent, right));
        self.arena.leaf_mut(left_id).next = Some(right_id);
        if let Some(next) = old_next {
            self.arena.leaf_mut(next).prev = Some(right_id);
        }

        TreeStats::bump(&self.stats.leaf_splits);
        trace!(
            left = %left_id,
            right = %right_id,
            left_max = ?self.arena.max_key(left_id),
            "split leaf"
        );

        self.register_split(left_id, right_id, old_max);
    }

    /// Register a freshly split pair with their parent, splitting upward
    /// for as long as parents overflow.
    ///
    /// `old_left_max` is `left`'s boundary in its parent before the split;
    /// it is `None` only when `left` had no entries, which can only be the
    /// root.
    fn register_split(&mut self, mut left: NodeId, mut right: NodeId, mut old_left_max: Option<Key>) {
        let capacity = self.config.max_entries();

        loop {
            let (Some(left_max), Some(right_max)) =
                (self.arena.max_key(left), self.arena.max_key(right))
            else {
                unreachable!("split produced an empty half");
            };

            let Some(parent_id) = self.arena.parent(left) else {
                self.grow_root(left, left_max, right, right_max);
                return;
            };
            let Some(boundary) = old_left_max else {
                unreachable!("{} has a parent but no boundary key", left);
            };

            let parent_old_max = self.arena.max_key(parent_id);
            let parent = self.arena.internal_mut(parent_id);
            let slot = parent.slot_of(boundary);
            debug_assert_eq!(parent.children[slot], left, "stale boundary for {}", left);
            parent.absorb_split(slot, left_max, right, right_max);

            if parent.len() <= self.config.order {
                self.raise_boundaries(parent_id);
                return;
            }

            let middle = parent.len() / 2;
            let sibling = parent.split_off(middle, capacity);
            let grandparent = self.arena.parent(parent_id);
            let sibling_id = self.arena.alloc(Node::internal(grandparent, sibling));
            self.arena.adopt_children(sibling_id);

            TreeStats::bump(&self.stats.internal_splits);
            trace!(
                left = %parent_id,
                right = %sibling_id,
                left_max = ?self.arena.max_key(parent_id),
                "split internal node"
            );

            left = parent_id;
            right = sibling_id;
            old_left_max = parent_old_max;
        }
    }

    /// The root split: put a new internal root above the two halves.
    fn grow_root(&mut self, left: NodeId, left_max: Key, right: NodeId, right_max: Key) {
        let root = InternalNode::from_pair(left, left_max, right, right_max, self.config.max_entries());
        let root_id = self.arena.alloc(Node::internal(None, root));
        self.arena.adopt_children(root_id);

        self.root = root_id;
        self.height += 1;
        TreeStats::bump(&self.stats.root_splits);
        debug!(root = %root_id, height = self.height, "root split, tree grew");
    }

    /// After `node` absorbed an entry without splitting, raise any
    /// ancestor boundary that no longer covers its maximum.
    ///
    /// Only the last child of a node can outgrow its boundary: a key larger
    /// than every boundary is always routed to the last child.
    fn raise_boundaries(&mut self, node: NodeId) {
        let mut child = node;
        while let Some(parent_id) = self.arena.parent(child) {
            let Some(child_max) = self.arena.max_key(child) else {
                break;
            };
            let parent = self.arena.internal_mut(parent_id);
            let last = parent.len() - 1;
            if child_max <= parent.keys[last] {
                break;
            }
            debug_assert_eq!(parent.children[last], child);
            parent.keys[last] = child_max;
            child = parent_id;
        }
    }
}

impl<V> Default for BPlusTree<V> {
    /// An empty tree of [`DEFAULT_ORDER`](crate::common::config::DEFAULT_ORDER).
    fn default() -> Self {
        Self::empty(TreeConfig::default())
    }
}

impl<'a, V> IntoIterator for &'a BPlusTree<V> {
    type Item = (Key, &'a V);
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<V> Extend<(Key, V)> for BPlusTree<V> {
    fn extend<I: IntoIterator<Item = (Key, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}
