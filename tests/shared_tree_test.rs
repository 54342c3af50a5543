//! Integration tests for the shared (lock-wrapped) tree.
//!
//! These exercise the whole-tree lock under real thread contention.

mod common;

use std::sync::Arc;
use std::sync::Barrier;
use std::thread;

use common::init_tracing;
use leafline::{BPlusTree, SharedBPlusTree, TreeConfig};

/// Writers on disjoint key ranges all land, and the tree stays valid.
#[test]
fn test_concurrent_writers() {
    init_tracing();
    let tree = SharedBPlusTree::with_config(TreeConfig::new(4)).unwrap();
    let writers = 8;
    let per_writer = 500;

    let handles: Vec<_> = (0..writers)
        .map(|w| {
            let tree = tree.clone();
            thread::spawn(move || {
                // Interleave so writers split each other's leaves
                for i in 0..per_writer {
                    tree.insert(i * writers + w, (w, i));
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(tree.len(), (writers * per_writer) as usize);
    tree.validate().unwrap();
    for w in 0..writers {
        for i in (0..per_writer).step_by(37) {
            assert_eq!(tree.find_cloned(i * writers + w), Some((w, i)));
        }
    }
}

/// Readers running alongside a writer only ever see complete inserts.
#[test]
fn test_readers_during_writes() {
    let tree: SharedBPlusTree<i64> = SharedBPlusTree::new(3).unwrap();
    let barrier = Arc::new(Barrier::new(5));

    let writer = {
        let tree = tree.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for k in 0..2000 {
                tree.insert(k, k * 2);
            }
        })
    };

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let tree = tree.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..50 {
                    let guard = tree.read();
                    // A snapshot under the read lock is always consistent
                    let keys: Vec<i64> = guard.keys().collect();
                    assert_eq!(keys.len(), guard.len());
                    assert!(keys.windows(2).all(|w| w[0] < w[1]));
                    for &k in keys.iter().step_by(101) {
                        assert_eq!(guard.find(k), Some(&(k * 2)));
                    }
                }
            })
        })
        .collect();

    writer.join().unwrap();
    for r in readers {
        r.join().unwrap();
    }

    assert_eq!(tree.len(), 2000);
    tree.validate().unwrap();
}

/// Racing overwrites of one key leave exactly one of the written values.
#[test]
fn test_concurrent_overwrites() {
    let tree = SharedBPlusTree::from(BPlusTree::new(3).unwrap());
    tree.insert(7, 0u64);

    let handles: Vec<_> = (1..=4u64)
        .map(|t| {
            let tree = tree.clone();
            thread::spawn(move || {
                for _ in 0..100 {
                    tree.insert(7, t);
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(tree.len(), 1);
    let last = tree.find_cloned(7).unwrap();
    assert!((1..=4).contains(&last));
    assert_eq!(tree.stats().updates, 400);
}
