//! Index structures.
//!
//! - [`btree`] - In-memory B+ tree with a linked leaf chain

pub mod btree;
