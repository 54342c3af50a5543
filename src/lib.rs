//! leafline - An in-memory B+ tree index.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           leafline                              │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │        SharedBPlusTree (index/btree/shared.rs)          │   │
//! │  │          Arc<RwLock<..>>: many readers, one writer      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │            BPlusTree (index/btree/tree.rs)              │   │
//! │  │   find · insert · split propagation · leaf chain scans  │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │               NodeArena (index/btree/arena.rs)          │   │
//! │  │     Vec<Node>: Leaf | Internal, linked by NodeId        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (NodeId, Key, Error, config)
//! - [`index`] - Index structures (B+ tree)
//!
//! # Quick Start
//! ```
//! use leafline::BPlusTree;
//!
//! let mut tree = BPlusTree::new(3).unwrap();
//! for key in (1..=10).rev() {
//!     tree.insert(key, key * key);
//! }
//!
//! assert_eq!(tree.find(7), Some(&49));
//! assert_eq!(tree.find(11), None);
//! assert_eq!(tree.keys().collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
//! tree.validate().unwrap();
//! ```

pub mod common;
pub mod index;

// Re-export commonly used items at crate root for convenience
pub use common::config::{DEFAULT_ORDER, MIN_ORDER};
pub use common::{Error, Key, NodeId, Result, TreeConfig};

pub use index::btree::{
    BPlusTree, Iter, LeafView, Range, SharedBPlusTree, StatsSnapshot, TreeStats,
};
