//! Error types for leafline.

use thiserror::Error;

use crate::common::NodeId;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All errors surfaced by leafline.
///
/// Lookups never fail: an absent key is `None`, not an error. Errors are
/// reserved for bad construction parameters and for structural checks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The requested tree order is too small to split nodes.
    #[error("invalid tree order {order}: must be at least {min}")]
    InvalidOrder { order: usize, min: usize },

    /// A structural invariant does not hold.
    ///
    /// This indicates a bug in the tree, never bad user input.
    #[error("corrupted tree at {node}: {reason}")]
    Corrupted { node: NodeId, reason: String },
}

impl Error {
    pub(crate) fn corrupted(node: NodeId, reason: impl Into<String>) -> Self {
        Error::Corrupted {
            node,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidOrder { order: 1, min: 2 };
        assert_eq!(
            format!("{}", err),
            "invalid tree order 1: must be at least 2"
        );

        let err = Error::corrupted(NodeId::new(7), "keys out of order");
        assert_eq!(format!("{}", err), "corrupted tree at Node(7): keys out of order");
    }

    #[test]
    fn test_result_type_alias() {
        fn might_fail() -> Result<u32> {
            Ok(42)
        }

        assert_eq!(might_fail().unwrap(), 42);
    }
}
