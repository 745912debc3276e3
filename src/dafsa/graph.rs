//! The mutable word graph: an arena of nodes with mirrored edge sets.

use super::node::{Edge, Node, NodeId, NodeSet};
use crate::pattern::Pattern;

/// A deterministic acyclic finite state automaton over UTF-16 code units.
///
/// Paths from the distinguished `root` to the single distinguished `leaf`
/// spell exactly the accepted word set. The graph is built once from a word
/// list, mutated in place by minimization and state elimination, and
/// consumed by [`Dafsa::to_regex`].
pub struct Dafsa {
    nodes: Vec<Node>,
    root: NodeId,
    leaf: NodeId,
    /// Nodes merged away or eliminated. Their edge sets are empty.
    dead: NodeSet,
}

impl Dafsa {
    pub(crate) fn new() -> Self {
        let nodes = vec![Node::default(), Node::default()];
        Self {
            nodes,
            root: 0,
            leaf: 1,
            dead: NodeSet::with_capacity(2),
        }
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn leaf(&self) -> NodeId {
        self.leaf
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    pub(crate) fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn is_dead(&self, id: NodeId) -> bool {
        self.dead.contains(id)
    }

    pub(crate) fn add_node(&mut self) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::default());
        id
    }

    /// Connect `from` to `to`, recording the edge on both endpoints.
    pub(crate) fn add_edge(&mut self, from: NodeId, label: Pattern, to: NodeId) {
        self.node_mut(from).children.insert(Edge {
            label: label.clone(),
            other: to,
        });
        self.node_mut(to).parents.insert(Edge { label, other: from });
    }

    /// Remove the edge between `from` and `to` with the given label from both
    /// endpoints.
    pub(crate) fn remove_edge(&mut self, from: NodeId, label: &Pattern, to: NodeId) {
        self.node_mut(from).children.shift_remove(&Edge {
            label: label.clone(),
            other: to,
        });
        self.node_mut(to).parents.shift_remove(&Edge {
            label: label.clone(),
            other: from,
        });
    }

    /// Drop both edge sets of `id` and mark it dead.
    pub(crate) fn clear_node(&mut self, id: NodeId) {
        let node = self.node_mut(id);
        node.parents.clear();
        node.children.clear();
        self.dead.insert(id);
    }

    /// Outgoing edges of `id`, sorted by rendered label then destination.
    pub(crate) fn sorted_children(&self, id: NodeId) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.node(id).children.iter().cloned().collect();
        edges.sort_by(|a, b| {
            a.label
                .to_regex()
                .cmp(b.label.to_regex())
                .then_with(|| a.other.cmp(&b.other))
        });
        edges
    }

    /// Incoming edges of `id`, sorted by rendered label then source.
    pub(crate) fn sorted_parents(&self, id: NodeId) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self.node(id).parents.iter().cloned().collect();
        edges.sort_by(|a, b| {
            a.label
                .to_regex()
                .cmp(b.label.to_regex())
                .then_with(|| a.other.cmp(&b.other))
        });
        edges
    }

    /// Number of live nodes, the root and leaf included.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - self.dead.len()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.children.len()).sum()
    }
}
