//! The `Pattern` value type: construction and structural queries.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use indexmap::IndexSet;

/// A partial regex tree over UTF-16 code units.
///
/// Logically immutable and cheap to clone (the node lives behind an `Arc`).
/// Equality, hashing and ordering are all defined over the rendered regex
/// string, which is memoized on first use, so a `Pattern` can serve as a set
/// element or grouping key without re-rendering.
#[derive(Clone)]
pub struct Pattern {
    inner: Arc<Inner>,
}

struct Inner {
    kind: Kind,
    /// Set once `optimize` has produced this node; re-optimization returns
    /// the node unchanged.
    optimized: bool,
    rendered: OnceLock<String>,
}

/// The closed set of variants. The optimizer pattern-matches exhaustively on
/// these, so new variants must be threaded through every rewrite rule.
pub(crate) enum Kind {
    /// Matches the empty string.
    Nothing,
    /// Matches exactly one code unit.
    Single(u16),
    /// Matches any single member of the set.
    Class(BTreeSet<u16>),
    /// Concatenation of the children, in order.
    Seq(Vec<Pattern>),
    /// Zero-or-one repetition of the child.
    Maybe(Pattern),
    /// Alternation over the options; options are deduplicated.
    Or(Vec<Pattern>),
}

impl Pattern {
    fn mk(kind: Kind, optimized: bool) -> Self {
        Self {
            inner: Arc::new(Inner {
                kind,
                optimized,
                rendered: OnceLock::new(),
            }),
        }
    }

    /// The empty-string pattern. Identity of concatenation.
    pub fn nothing() -> Self {
        // Canonical already: the optimizer leaves it untouched.
        Self::mk(Kind::Nothing, true)
    }

    /// A single code unit.
    pub fn single(unit: u16) -> Self {
        Self::mk(Kind::Single(unit), true)
    }

    /// A character set over the given code units.
    pub fn class<I: IntoIterator<Item = u16>>(units: I) -> Self {
        Self::mk(Kind::Class(units.into_iter().collect()), false)
    }

    /// Concatenation of `children` in order.
    pub fn seq(children: Vec<Pattern>) -> Self {
        Self::mk(Kind::Seq(children), false)
    }

    /// Zero-or-one repetition of `child`.
    pub fn maybe(child: Pattern) -> Self {
        Self::mk(Kind::Maybe(child), false)
    }

    /// Alternation over `options`, deduplicated by structural equality.
    pub fn or<I: IntoIterator<Item = Pattern>>(options: I) -> Self {
        let set: IndexSet<Pattern> = options.into_iter().collect();
        Self::mk(Kind::Or(set.into_iter().collect()), false)
    }

    pub(crate) fn with_kind(kind: Kind, optimized: bool) -> Self {
        Self::mk(kind, optimized)
    }

    pub(crate) fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    pub(crate) fn is_optimized(&self) -> bool {
        self.inner.optimized
    }

    pub(crate) fn rendered_cache(&self) -> &OnceLock<String> {
        &self.inner.rendered
    }

    /// True for the variants that render as a single regex atom and need no
    /// grouping under a quantifier.
    pub fn is_atom(&self) -> bool {
        matches!(
            self.inner.kind,
            Kind::Nothing | Kind::Single(_) | Kind::Class(_)
        )
    }

    /// True iff this is the empty-string pattern.
    pub fn is_nothing(&self) -> bool {
        matches!(self.inner.kind, Kind::Nothing)
    }

    /// Length of the longest string this pattern can match, in code units.
    pub fn max_match_len(&self) -> usize {
        match &self.inner.kind {
            Kind::Nothing => 0,
            Kind::Single(_) | Kind::Class(_) => 1,
            Kind::Seq(children) => children.iter().map(Pattern::max_match_len).sum(),
            Kind::Maybe(child) => child.max_match_len(),
            Kind::Or(options) => options.iter().map(Pattern::max_match_len).max().unwrap_or(0),
        }
    }

    /// A sequence view of this pattern: its children if it is a
    /// concatenation, otherwise a singleton list holding the pattern itself.
    /// Lets prefix/suffix factoring treat all alternation options uniformly.
    pub fn as_sequence(&self) -> Vec<Pattern> {
        match &self.inner.kind {
            Kind::Seq(children) => children.clone(),
            _ => vec![self.clone()],
        }
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.to_regex() == other.to_regex()
    }
}

impl Eq for Pattern {}

impl Hash for Pattern {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_regex().hash(state);
    }
}

impl PartialOrd for Pattern {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pattern {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_regex().cmp(other.to_regex())
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_regex())
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pattern({:?})", self.to_regex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_match_len() {
        assert_eq!(Pattern::nothing().max_match_len(), 0);
        assert_eq!(Pattern::single(b'a' as u16).max_match_len(), 1);
        assert_eq!(Pattern::class([b'a' as u16, b'z' as u16]).max_match_len(), 1);

        let seq = Pattern::seq(vec![
            Pattern::single(b'a' as u16),
            Pattern::single(b'b' as u16),
        ]);
        assert_eq!(seq.max_match_len(), 2);

        let or = Pattern::or([seq.clone(), Pattern::single(b'c' as u16)]);
        assert_eq!(or.max_match_len(), 2);
        assert_eq!(Pattern::maybe(or).max_match_len(), 2);
    }

    #[test]
    fn test_as_sequence() {
        let a = Pattern::single(b'a' as u16);
        let b = Pattern::single(b'b' as u16);
        let seq = Pattern::seq(vec![a.clone(), b.clone()]);

        assert_eq!(seq.as_sequence(), vec![a.clone(), b]);
        assert_eq!(a.as_sequence(), vec![a.clone()]);
        assert_eq!(Pattern::nothing().as_sequence(), vec![Pattern::nothing()]);
    }

    #[test]
    fn test_equality_is_structural() {
        // Alternation options are an unordered set: both spellings render
        // identically and therefore compare equal.
        let ab = Pattern::or([Pattern::single(b'a' as u16), Pattern::single(b'b' as u16)]);
        let ba = Pattern::or([Pattern::single(b'b' as u16), Pattern::single(b'a' as u16)]);
        assert_eq!(ab, ba);
    }

    #[test]
    fn test_or_deduplicates() {
        let a = Pattern::single(b'a' as u16);
        let or = Pattern::or([a.clone(), a.clone(), a]);
        assert_eq!(or.to_regex(), "a");
    }

    #[test]
    fn test_ordering_is_lexicographic_on_rendering() {
        let mut patterns = vec![
            Pattern::single(b'c' as u16),
            Pattern::single(b'a' as u16),
            Pattern::single(b'b' as u16),
        ];
        patterns.sort();
        let rendered: Vec<&str> = patterns.iter().map(Pattern::to_regex).collect();
        assert_eq!(rendered, ["a", "b", "c"]);
    }
}
