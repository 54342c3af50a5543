//! Thread-safe handle around a [`BPlusTree`].
//!
//! The tree itself has no internal synchronization: an insert rewrites
//! boundary keys and sibling links across several nodes, and a concurrent
//! lookup could observe a half-finished split. [`SharedBPlusTree`]
//! serializes access with a single whole-tree lock.

use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use crate::common::{Key, Result, TreeConfig};
use crate::index::btree::stats::StatsSnapshot;
use crate::BPlusTree;

/// A cloneable, thread-safe B+ tree handle.
///
/// # Thread Safety
/// - `tree`: `RwLock`: many concurrent lookups, one writer at a time
/// - Stats counters are atomic and are read under the shared lock
///
/// An insert holds the write lock for the whole descent and every split it
/// triggers, so readers never see a partially propagated split.
///
/// # Usage
/// ```
/// use leafline::SharedBPlusTree;
/// use std::thread;
///
/// let tree = SharedBPlusTree::new(4).unwrap();
///
/// let handles: Vec<_> = (0..4)
///     .map(|t| {
///         let tree = tree.clone();
///         thread::spawn(move || {
///             for k in 0..100 {
///                 tree.insert(t * 1000 + k, k);
///             }
///         })
///     })
///     .collect();
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(tree.len(), 400);
/// assert_eq!(tree.find_cloned(2042), Some(42));
/// ```
pub struct SharedBPlusTree<V> {
    tree: Arc<RwLock<BPlusTree<V>>>,
}

impl<V> SharedBPlusTree<V> {
    /// Create an empty shared tree of the given order.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < 2`
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self::from_tree(BPlusTree::new(order)?))
    }

    /// # Errors
    /// - `Error::InvalidOrder` if the configured order is below the minimum
    pub fn with_config(config: TreeConfig) -> Result<Self> {
        Ok(Self::from_tree(BPlusTree::with_config(config)?))
    }

    /// Wrap an existing tree.
    pub fn from_tree(tree: BPlusTree<V>) -> Self {
        Self {
            tree: Arc::new(RwLock::new(tree)),
        }
    }

    // ========================================================================
    // Writes (exclusive lock)
    // ========================================================================

    /// Insert under the write lock. See [`BPlusTree::insert`].
    pub fn insert(&self, key: Key, value: V) -> Option<V> {
        self.tree.write().insert(key, value)
    }

    /// See [`BPlusTree::insert_optional`].
    pub fn insert_optional(&self, key: Option<Key>, value: V) -> Option<V> {
        self.tree.write().insert_optional(key, value)
    }

    // ========================================================================
    // Reads (shared lock)
    // ========================================================================

    /// Run `f` on the value bound to `key` while holding the read lock.
    pub fn with_value<R>(&self, key: Key, f: impl FnOnce(&V) -> R) -> Option<R> {
        self.tree.read().find(key).map(f)
    }

    pub fn contains_key(&self, key: Key) -> bool {
        self.tree.read().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.tree.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.read().is_empty()
    }

    pub fn height(&self) -> usize {
        self.tree.read().height()
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.tree.read().stats().snapshot()
    }

    /// See [`BPlusTree::validate`].
    pub fn validate(&self) -> Result<()> {
        self.tree.read().validate()
    }

    /// Hold the read lock for a longer traversal.
    ///
    /// Writers block until the guard is dropped.
    pub fn read(&self) -> RwLockReadGuard<'_, BPlusTree<V>> {
        self.tree.read()
    }
}

impl<V: Clone> SharedBPlusTree<V> {
    /// Look up `key` and clone the value out of the lock.
    pub fn find_cloned(&self, key: Key) -> Option<V> {
        self.with_value(key, V::clone)
    }
}

impl<V> Clone for SharedBPlusTree<V> {
    fn clone(&self) -> Self {
        Self {
            tree: Arc::clone(&self.tree),
        }
    }
}

impl<V> Default for SharedBPlusTree<V> {
    fn default() -> Self {
        Self::from_tree(BPlusTree::default())
    }
}

impl<V> From<BPlusTree<V>> for SharedBPlusTree<V> {
    fn from(tree: BPlusTree<V>) -> Self {
        Self::from_tree(tree)
    }
}
