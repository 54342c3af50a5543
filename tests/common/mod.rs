//! Shared test helpers.
//!
//! # Tracing
//! Call [`init_tracing`] at the top of a test to see split/root-growth
//! events. Filtering follows `RUST_LOG`, e.g.
//! `RUST_LOG=leafline=trace cargo test -- --nocapture`.

#![allow(dead_code)]

use std::sync::Once;

use leafline::{BPlusTree, Key};
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .compact()
            .try_init();
    });
}

/// Build a tree of `order` holding `key -> key * 10` for every key.
pub fn tree_of(order: usize, keys: impl IntoIterator<Item = Key>) -> BPlusTree<Key> {
    let mut tree = BPlusTree::new(order).unwrap();
    for key in keys {
        tree.insert(key, key * 10);
    }
    tree
}

/// Keys of every leaf, read by following `next` links from the leftmost leaf.
pub fn leaf_chain<V>(tree: &BPlusTree<V>) -> Vec<Vec<Key>> {
    let mut leaves = vec![];
    let mut cursor = Some(tree.first_leaf().id());
    while let Some(id) = cursor {
        let leaf = tree.leaf(id).unwrap();
        leaves.push(leaf.keys().to_vec());
        cursor = leaf.next();
    }
    leaves
}
