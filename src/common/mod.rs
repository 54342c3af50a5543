//! Common types and utilities shared across leafline.
//!
//! - Configuration (order, defaults)
//! - Error types
//! - Identifiers (NodeId) and the key type

pub mod config;
pub mod error;
mod node_id;

pub use config::TreeConfig;
pub use error::{Error, Result};
pub use node_id::NodeId;

/// Key type of the index.
pub type Key = i64;
