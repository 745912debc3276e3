//! Node primitives for the word graph.

use fixedbitset::FixedBitSet;

use indexmap::IndexSet;

use crate::pattern::Pattern;

/// A node identifier: an index into the graph's arena.
pub type NodeId = u32;

/// A labeled connection to another node. Stored on both endpoints: in the
/// source's `children` and the destination's `parents`, with `other` naming
/// the far endpoint in each. Two edges are equal when their labels are equal
/// and they reach the same node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Edge {
    pub(crate) label: Pattern,
    pub(crate) other: NodeId,
}

/// A graph vertex: incoming and outgoing edge sets.
///
/// The sets deduplicate by edge equality, which the minimizer's merge steps
/// and the eliminator's parallel-edge collapse rely on. Iteration order is
/// insertion order; every consumer that can affect output re-sorts by label.
#[derive(Default)]
pub(crate) struct Node {
    pub(crate) parents: IndexSet<Edge>,
    pub(crate) children: IndexSet<Edge>,
}

/// A set of node ids backed by a growable bit set.
pub(crate) struct NodeSet {
    bits: FixedBitSet,
}

impl NodeSet {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            bits: FixedBitSet::with_capacity(capacity),
        }
    }

    pub(crate) fn insert(&mut self, node: NodeId) {
        let idx = node as usize;
        if idx >= self.bits.len() {
            self.bits.grow(idx + 1);
        }
        self.bits.insert(idx);
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        let idx = node as usize;
        idx < self.bits.len() && self.bits.contains(idx)
    }

    pub(crate) fn len(&self) -> usize {
        self.bits.count_ones(..)
    }
}
