//! Configuration for leafline trees.

use crate::common::{Error, Result};

/// Order used when none is specified.
///
/// With order 3 a node holds at most 3 entries in its stable state and
/// briefly 4 right before it splits.
pub const DEFAULT_ORDER: usize = 3;

/// Smallest order that still lets a split leave both halves non-empty.
pub const MIN_ORDER: usize = 2;

/// Construction parameters for a [`BPlusTree`](crate::BPlusTree).
///
/// # Example
/// ```
/// use leafline::TreeConfig;
///
/// let config = TreeConfig::new(8);
/// assert!(config.validate().is_ok());
/// assert!(TreeConfig::new(1).validate().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Maximum number of entries a node keeps after an insert completes.
    pub order: usize,
}

impl TreeConfig {
    /// Create a config with the given order.
    pub fn new(order: usize) -> Self {
        Self { order }
    }

    /// Check that the order is usable.
    ///
    /// # Errors
    /// - `Error::InvalidOrder` if `order < MIN_ORDER`
    pub fn validate(&self) -> Result<()> {
        if self.order < MIN_ORDER {
            return Err(Error::InvalidOrder {
                order: self.order,
                min: MIN_ORDER,
            });
        }
        Ok(())
    }

    /// Transient capacity of a node: one past the order.
    #[inline]
    pub fn max_entries(&self) -> usize {
        self.order + 1
    }
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_ORDER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let config = TreeConfig::default();
        assert_eq!(config.order, DEFAULT_ORDER);
        assert_eq!(config.max_entries(), 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_order_accepted() {
        assert!(TreeConfig::new(MIN_ORDER).validate().is_ok());
    }

    #[test]
    fn test_order_below_min_rejected() {
        for order in 0..MIN_ORDER {
            match TreeConfig::new(order).validate() {
                Err(Error::InvalidOrder { order: got, min }) => {
                    assert_eq!(got, order);
                    assert_eq!(min, MIN_ORDER);
                }
                other => panic!("Expected InvalidOrder, got {:?}", other),
            }
        }
    }
}
