//! Merging equivalent nodes.
//!
//! Two nodes are equivalent when their outgoing edge sets are equal (label
//! equality and identical destinations). Walking bottom-up from the leaf,
//! each node's parents are grouped by that criterion and every group merges
//! into one survivor. The result accepts exactly the same language; it is
//! not guaranteed to be minimal in state count.

use indexmap::IndexMap;
use log::debug;

use super::graph::Dafsa;
use super::node::{Edge, NodeId, NodeSet};

impl Dafsa {
    /// Merge equivalent nodes in place, bottom-up from the leaf.
    pub fn minimize(&mut self) {
        let before = self.node_count();
        let mut visited = NodeSet::with_capacity(self.arena_len());
        self.minimize_at(self.leaf(), &mut visited);
        debug!("minimized {} nodes down to {}", before, self.node_count());
    }

    fn minimize_at(&mut self, node: NodeId, visited: &mut NodeSet) {
        if visited.contains(node) || self.is_dead(node) {
            return;
        }
        visited.insert(node);

        // Group the distinct parents by their outgoing-edge fingerprint and
        // collapse each group onto its first member.
        let mut groups: IndexMap<Vec<(String, NodeId)>, Vec<NodeId>> = IndexMap::new();
        for parent in self.distinct_parents(node) {
            groups
                .entry(self.outgoing_fingerprint(parent))
                .or_default()
                .push(parent);
        }
        for (_, members) in groups {
            let survivor = members[0];
            for &redundant in &members[1..] {
                self.merge_into(survivor, redundant);
            }
        }

        for parent in self.distinct_parents(node) {
            self.minimize_at(parent, visited);
        }
    }

    /// Parent node ids, deduplicated and sorted.
    fn distinct_parents(&self, node: NodeId) -> Vec<NodeId> {
        let mut parents: Vec<NodeId> = self.node(node).parents.iter().map(|e| e.other).collect();
        parents.sort_unstable();
        parents.dedup();
        parents
    }

    /// The outgoing edge set as a sorted, comparable key.
    fn outgoing_fingerprint(&self, node: NodeId) -> Vec<(String, NodeId)> {
        let mut fingerprint: Vec<(String, NodeId)> = self
            .node(node)
            .children
            .iter()
            .map(|e| (e.label.to_regex().to_string(), e.other))
            .collect();
        fingerprint.sort_unstable();
        fingerprint
    }

    /// Redirect all of `redundant`'s edges onto `survivor` and retire it.
    fn merge_into(&mut self, survivor: NodeId, redundant: NodeId) {
        let children: Vec<Edge> = self.node(redundant).children.iter().cloned().collect();
        for edge in children {
            self.node_mut(edge.other).parents.shift_remove(&Edge {
                label: edge.label.clone(),
                other: redundant,
            });
            self.node_mut(edge.other).parents.insert(Edge {
                label: edge.label.clone(),
                other: survivor,
            });
            self.node_mut(survivor).children.insert(edge);
        }

        let parents: Vec<Edge> = self.node(redundant).parents.iter().cloned().collect();
        for edge in parents {
            self.node_mut(edge.other).children.shift_remove(&Edge {
                label: edge.label.clone(),
                other: redundant,
            });
            self.node_mut(edge.other).children.insert(Edge {
                label: edge.label.clone(),
                other: survivor,
            });
            self.node_mut(survivor).parents.insert(edge);
        }

        self.clear_node(redundant);
    }
}
