//! State elimination: collapsing the graph to a single labeled edge.
//!
//! Nodes are eliminated top-down: each round removes the destination of the
//! root's smallest-labeled child edge. Elimination order is load-bearing.
//! Root-adjacent elimination lines shared prefixes up at the top of the
//! growing labels, which is what gives the alternation optimizer its
//! longest-match-first output. Bottom-up elimination is semantically
//! equivalent but produces longer, wrongly ordered alternations.

use indexmap::IndexSet;
use log::{debug, trace};

use super::graph::Dafsa;
use super::node::{Edge, NodeId};
use crate::pattern::Pattern;

impl Dafsa {
    /// Consume the graph and render the regex accepting exactly its
    /// language.
    ///
    /// Consuming by value enforces the single-use lifecycle: elimination
    /// leaves the graph degenerate, so nothing may touch it afterwards.
    pub fn to_regex(mut self) -> String {
        let mut eliminated = 0usize;
        loop {
            let candidate = self
                .sorted_children(self.root())
                .into_iter()
                .find(|e| e.other != self.leaf());
            let Some(edge) = candidate else {
                break;
            };
            trace!("eliminating node {} behind {:?}", edge.other, edge.label);
            self.eliminate(edge.other);
            eliminated += 1;
        }

        let mut edges = self.sorted_children(self.root());
        assert!(
            edges.len() <= 1,
            "state elimination left {} root edges",
            edges.len()
        );
        let result = match edges.pop() {
            Some(edge) => {
                assert_eq!(edge.other, self.leaf(), "root edge must target the leaf");
                edge.label.optimize().to_regex().to_string()
            }
            // An empty word list builds a root with no edges at all.
            None => String::new(),
        };
        debug!(
            "eliminated {} nodes, final pattern is {} chars",
            eliminated,
            result.len()
        );
        result
    }

    /// Remove `node` from the graph, bridging every parent to every child
    /// with a concatenated label and re-merging the parallel edges that
    /// creates.
    fn eliminate(&mut self, node: NodeId) {
        let parent_edges = self.sorted_parents(node);
        let child_edges = self.sorted_children(node);

        // Bypass: one composite edge per (parent, child) pair, in label
        // order on both axes.
        let mut bridged: IndexSet<(NodeId, NodeId)> = IndexSet::new();
        for p_edge in &parent_edges {
            for c_edge in &child_edges {
                let label = Pattern::seq(vec![p_edge.label.clone(), c_edge.label.clone()]);
                self.add_edge(p_edge.other, label, c_edge.other);
                bridged.insert((p_edge.other, c_edge.other));
            }
        }

        // Sever the node from both sides.
        for p_edge in &parent_edges {
            let stale: Vec<Edge> = self
                .node(p_edge.other)
                .children
                .iter()
                .filter(|e| e.other == node)
                .cloned()
                .collect();
            for edge in stale {
                self.node_mut(p_edge.other).children.shift_remove(&edge);
            }
        }
        for c_edge in &child_edges {
            let stale: Vec<Edge> = self
                .node(c_edge.other)
                .parents
                .iter()
                .filter(|e| e.other == node)
                .cloned()
                .collect();
            for edge in stale {
                self.node_mut(c_edge.other).parents.shift_remove(&edge);
            }
        }
        self.clear_node(node);

        // Where the bypass created parallel edges, collapse them into one
        // alternation-labeled edge. Pre-existing direct edges between the
        // pair fold into the same alternation.
        for (parent, child) in bridged {
            let mut parallel: Vec<Edge> = self
                .node(parent)
                .children
                .iter()
                .filter(|e| e.other == child)
                .cloned()
                .collect();
            if parallel.len() < 2 {
                continue;
            }
            parallel.sort_by(|a, b| a.label.to_regex().cmp(b.label.to_regex()));
            let labels: Vec<Pattern> = parallel.iter().map(|e| e.label.clone()).collect();
            let merged = Pattern::or(labels).optimize();
            for edge in &parallel {
                self.remove_edge(parent, &edge.label, child);
            }
            self.add_edge(parent, merged, child);
        }
    }
}
