//! B+ tree index.
//!
//! An ordered map from `i64` keys to values, kept balanced by splitting
//! overflowing nodes and propagating the split toward the root.
//!
//! # Components
//! - [`BPlusTree`] - The tree: lookup, insert, traversal
//! - [`SharedBPlusTree`] - Whole-tree `RwLock` handle for multi-threaded use
//! - [`LeafView`] - Read-only view of one leaf in the leaf chain
//! - [`Iter`] / [`Range`] - Leaf-chain iterators
//! - [`TreeStats`] - Operation counters

mod arena;
mod iter;
mod node;
mod shared;
mod stats;
mod tree;
mod validate;

pub use iter::{Iter, Range};
pub use node::LeafView;
pub use shared::SharedBPlusTree;
pub use stats::{StatsSnapshot, TreeStats};
pub use tree::BPlusTree;
