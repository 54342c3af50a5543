//! Index-based node storage.
//!
//! Every node of a tree lives in one `Vec`; links between nodes are
//! [`NodeId`]s into it. Nodes are only ever appended, so ids stay valid for
//! the life of the tree.

use crate::common::{Key, NodeId};
use crate::index::btree::node::{InternalNode, LeafNode, Node, NodeKind};

#[derive(Debug)]
pub(crate) struct NodeArena<V> {
    nodes: Vec<Node<V>>,
}

impl<V> NodeArena<V> {
    pub(crate) fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Store a node and return its id.
    pub(crate) fn alloc(&mut self, node: Node<V>) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(node);
        id
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub(crate) fn get(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id.0]
    }

    #[inline]
    pub(crate) fn try_get(&self, id: NodeId) -> Option<&Node<V>> {
        self.nodes.get(id.0)
    }

    #[inline]
    pub(crate) fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).parent
    }

    #[inline]
    pub(crate) fn set_parent(&mut self, id: NodeId, parent: Option<NodeId>) {
        self.nodes[id.0].parent = parent;
    }

    #[inline]
    pub(crate) fn max_key(&self, id: NodeId) -> Option<Key> {
        self.get(id).max_key()
    }

    /// # Panics
    /// Panics if `id` is an internal node.
    #[inline]
    pub(crate) fn leaf(&self, id: NodeId) -> &LeafNode<V> {
        match &self.get(id).kind {
            NodeKind::Leaf(leaf) => leaf,
            NodeKind::Internal(_) => panic!("{} is not a leaf", id),
        }
    }

    /// # Panics
    /// Panics if `id` is an internal node.
    #[inline]
    pub(crate) fn leaf_mut(&mut self, id: NodeId) -> &mut LeafNode<V> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Leaf(leaf) => leaf,
            NodeKind::Internal(_) => panic!("{} is not a leaf", id),
        }
    }

    /// # Panics
    /// Panics if `id` is a leaf.
    #[inline]
    pub(crate) fn internal(&self, id: NodeId) -> &InternalNode {
        match &self.get(id).kind {
            NodeKind::Internal(internal) => internal,
            NodeKind::Leaf(_) => panic!("{} is not an internal node", id),
        }
    }

    /// # Panics
    /// Panics if `id` is a leaf.
    #[inline]
    pub(crate) fn internal_mut(&mut self, id: NodeId) -> &mut InternalNode {
        match &mut self.nodes[id.0].kind {
            NodeKind::Internal(internal) => internal,
            NodeKind::Leaf(_) => panic!("{} is not an internal node", id),
        }
    }

    /// Point every child of `id` back at `id`.
    pub(crate) fn adopt_children(&mut self, id: NodeId) {
        let children = self.internal(id).children.clone();
        for child in children {
            self.set_parent(child, Some(id));
        }
    }
}
