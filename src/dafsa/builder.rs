//! Building the pseudo-prefix-tree from a word list.

use log::debug;

use super::graph::Dafsa;
use super::node::NodeId;
use crate::pattern::{Kind, Pattern};

impl Dafsa {
    /// Build a prefix tree over the words' code units, with all acceptance
    /// funneled through empty-string edges into the single leaf.
    ///
    /// Words are sorted before insertion, so the node numbering (and with it
    /// every downstream tiebreak) is independent of input order.
    pub fn from_pseudo_prefix_tree(words: &[Vec<u16>]) -> Self {
        let mut sorted: Vec<&[u16]> = words.iter().map(Vec::as_slice).collect();
        sorted.sort_unstable();

        let mut dafsa = Self::new();
        let root = dafsa.root();
        dafsa.add_suffixes(root, &sorted);
        debug!(
            "built prefix tree over {} words: {} nodes, {} edges",
            words.len(),
            dafsa.node_count(),
            dafsa.edge_count()
        );
        dafsa
    }

    /// [`Dafsa::from_pseudo_prefix_tree`] followed by [`Dafsa::minimize`].
    pub fn from_words_minimized(words: &[Vec<u16>]) -> Self {
        let mut dafsa = Self::from_pseudo_prefix_tree(words);
        dafsa.minimize();
        dafsa
    }

    fn add_suffixes(&mut self, node: NodeId, words: &[&[u16]]) {
        let mut i = 0;
        while i < words.len() {
            let word = words[i];
            if word.is_empty() {
                let leaf = self.leaf();
                self.add_edge(node, Pattern::nothing(), leaf);
                i += 1;
                continue;
            }
            // The slice is sorted, so words sharing a first unit are
            // contiguous.
            let first = word[0];
            let mut j = i + 1;
            while j < words.len() && words[j].first() == Some(&first) {
                j += 1;
            }
            let child = self.add_node();
            self.add_edge(node, Pattern::single(first), child);
            let tails: Vec<&[u16]> = words[i..j].iter().map(|w| &w[1..]).collect();
            self.add_suffixes(child, &tails);
            i = j;
        }
    }

    /// Whether the graph accepts `word`, by walking single-unit edges from
    /// the root and checking for an empty-string edge into the leaf.
    ///
    /// Valid on the freshly built and on the minimized graph; state
    /// elimination replaces single-unit labels with composites, after which
    /// this walk no longer applies.
    pub fn is_match(&self, word: &[u16]) -> bool {
        let mut current = self.root();
        for &unit in word {
            let next = self
                .node(current)
                .children
                .iter()
                .find(|e| matches!(e.label.kind(), Kind::Single(u) if *u == unit))
                .map(|e| e.other);
            match next {
                Some(node) => current = node,
                None => return false,
            }
        }
        let leaf = self.leaf();
        self.node(current)
            .children
            .iter()
            .any(|e| e.label.is_nothing() && e.other == leaf)
    }

    /// [`Dafsa::is_match`] over a string's UTF-16 code units.
    pub fn matches_str(&self, word: &str) -> bool {
        let units: Vec<u16> = word.encode_utf16().collect();
        self.is_match(&units)
    }
}
