//! B+ tree scenario tests.
//!
//! End-to-end insert/find sequences with order 3 (at most 3 entries per
//! node, 4 right before a split), checked through the public API only.

mod common;

use common::{init_tracing, leaf_chain, tree_of};
use leafline::{BPlusTree, Key, DEFAULT_ORDER};

/// Recompute every subtree maximum bottom-up from `levels()` and check that
/// each internal boundary key matches it.
fn assert_boundaries_match_subtree_max(levels: &[Vec<Vec<Key>>]) {
    let leaves = levels.last().unwrap();
    let mut below: Vec<Key> = leaves.iter().map(|leaf| *leaf.last().unwrap()).collect();

    for (depth, level) in levels.iter().enumerate().rev().skip(1) {
        let mut maxima = Vec::with_capacity(level.len());
        let mut child = 0;
        for node in level {
            let mut node_max = Key::MIN;
            for &boundary in node {
                assert_eq!(
                    boundary, below[child],
                    "boundary {} at depth {} does not match child max {}",
                    boundary, depth, below[child]
                );
                node_max = node_max.max(below[child]);
                child += 1;
            }
            maxima.push(node_max);
        }
        assert_eq!(child, below.len(), "depth {} does not cover every child", depth);
        below = maxima;
    }
}

// ============================================================================
// Scenario 1: ascending inserts
// ============================================================================

#[test]
fn test_ascending_inserts() {
    init_tracing();
    let tree = tree_of(3, 1..=10);

    assert_eq!(tree.find(5), Some(&50));
    assert!(!tree.root_is_leaf());
    assert!(tree.height() > 1);
    for key in 1..=10 {
        assert_eq!(tree.find(key), Some(&(key * 10)), "key {}", key);
    }
    tree.validate().unwrap();
}

// ============================================================================
// Scenario 2: descending inserts
// ============================================================================

#[test]
fn test_descending_inserts_chain_ascending() {
    init_tracing();
    let tree = tree_of(3, (1..=10).rev());

    let flattened: Vec<Key> = leaf_chain(&tree).into_iter().flatten().collect();
    assert_eq!(flattened, (1..=10).collect::<Vec<_>>());
    tree.validate().unwrap();
}

// ============================================================================
// Scenario 3: empty tree
// ============================================================================

#[test]
fn test_empty_tree() {
    let tree: BPlusTree<String> = BPlusTree::new(3).unwrap();

    assert_eq!(tree.find(42), None);
    let first = tree.first_leaf();
    assert!(first.is_empty());
    assert_eq!(first.prev(), None);
    assert_eq!(first.next(), None);
    tree.validate().unwrap();
}

// ============================================================================
// Scenario 4: the first split
// ============================================================================

#[test]
fn test_first_split_at_order_plus_one() {
    let mut tree = tree_of(3, 1..=3);

    assert!(tree.root_is_leaf());
    assert_eq!(tree.first_leaf().len(), 3);
    assert_eq!(tree.stats().snapshot().leaf_splits, 0);

    tree.insert(4, 40);

    assert!(!tree.root_is_leaf());
    assert_eq!(tree.height(), 2);
    assert_eq!(tree.stats().snapshot().leaf_splits, 1);
    assert_eq!(tree.stats().snapshot().root_splits, 1);

    let left = tree.first_leaf();
    let right = tree.leaf(left.next().unwrap()).unwrap();
    assert_eq!(left.keys(), &[1, 2]);
    assert_eq!(right.keys(), &[3, 4]);
    assert_eq!(right.prev(), Some(left.id()));
    assert_eq!(right.next(), None);
    assert_eq!(tree.levels()[0], vec![vec![2, 4]]);
}

// ============================================================================
// Scenario 5: boundary keys over a large sequential load
// ============================================================================

#[test]
fn test_sequential_thousand_boundaries() {
    init_tracing();
    let tree = tree_of(3, 0..1000);

    assert_eq!(tree.len(), 1000);
    assert_boundaries_match_subtree_max(&tree.levels());
    assert_eq!(tree.levels()[0].last().unwrap().last(), Some(&999));
    tree.validate().unwrap();
}

#[test]
fn test_scrambled_thousand_boundaries() {
    // 7 is coprime with 1000, so this visits every key once
    let tree = tree_of(3, (0..1000).map(|i| (i * 7) % 1000));

    assert_boundaries_match_subtree_max(&tree.levels());
    assert_eq!(tree.keys().collect::<Vec<_>>(), (0..1000).collect::<Vec<_>>());
    tree.validate().unwrap();
}

// ============================================================================
// Structural properties
// ============================================================================

#[test]
fn test_capacity_bound_every_node() {
    for order in [2, 3, 4, 7, 16] {
        let tree = tree_of(order, (0..500).map(|i| (i * 37) % 500));
        for (depth, level) in tree.levels().iter().enumerate() {
            for node in level {
                assert!(
                    !node.is_empty() && node.len() <= order,
                    "order {} depth {}: {} entries",
                    order,
                    depth,
                    node.len()
                );
            }
        }
    }
}

#[test]
fn test_leaf_links_are_mutual_inverses() {
    let tree = tree_of(3, (0..200).rev().step_by(3));

    let mut cursor = Some(tree.first_leaf().id());
    let mut visited = 0;
    let mut entries = 0;
    while let Some(id) = cursor {
        let leaf = tree.leaf(id).unwrap();
        if let Some(next) = leaf.next() {
            assert_eq!(tree.leaf(next).unwrap().prev(), Some(id));
        }
        if let Some(prev) = leaf.prev() {
            assert_eq!(tree.leaf(prev).unwrap().next(), Some(id));
        }
        visited += 1;
        entries += leaf.len();
        cursor = leaf.next();
    }

    assert_eq!(visited, tree.levels().last().unwrap().len());
    assert_eq!(entries, tree.len());
}

#[test]
fn test_height_grows_logarithmically() {
    let tree = tree_of(DEFAULT_ORDER, 0..10_000);

    // Ascending inserts leave every node with at least 2 entries
    let bound = 1 + (10_000f64).log2().ceil() as usize;
    assert!(tree.height() <= bound, "height {} > {}", tree.height(), bound);
    assert_eq!(tree.levels().len(), tree.height());
}

// ============================================================================
// Records as values
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Product {
    id: Key,
    name: String,
    price: f64,
}

impl Product {
    fn new(id: Key) -> Self {
        Self {
            id,
            name: "test".to_string(),
            price: id as f64,
        }
    }
}

#[test]
fn test_product_catalog_order_five() {
    let mut tree = BPlusTree::new(5).unwrap();
    for id in 0..10_000 {
        let product = Product::new(id);
        tree.insert(product.id, product);
    }

    assert_eq!(tree.len(), 10_000);
    assert_eq!(tree.keys().next(), Some(0));
    assert_eq!(tree.keys().next_back(), Some(9_999));
    tree.validate().unwrap();
}

#[test]
fn test_product_catalog_lookup_order_four() {
    let mut tree = BPlusTree::new(4).unwrap();
    for id in 0..10_000 {
        let product = Product::new(id);
        tree.insert(product.id, product);
    }

    let found = tree.find(345).unwrap();
    assert_eq!(found.id, 345);
    assert_eq!(found.name, "test");
    assert_eq!(found.price, 345.0);
}

#[test]
fn test_records_with_missing_ids_are_skipped() {
    let mut tree = BPlusTree::new(3).unwrap();
    let records = [(Some(3), "c"), (None, "lost"), (Some(1), "a"), (None, "gone")];

    for (id, name) in records {
        tree.insert_optional(id, name);
    }

    assert_eq!(tree.len(), 2);
    assert_eq!(tree.values().copied().collect::<Vec<_>>(), vec!["a", "c"]);
}
