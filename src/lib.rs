//! Compile a finite set of literal strings into a single compact regular
//! expression.
//!
//! The produced pattern matches exactly the input set and is substantially
//! shorter than a flat alternation: shared prefixes and suffixes are factored
//! out and single-character alternatives are fused into character classes.
//! Alternation branches are ordered longest-match-first, so a left-to-right
//! regex engine scanning text prefers the longest word at any position.
//!
//! The pipeline:
//! 1. Build a pseudo-prefix-tree over the words' UTF-16 code units, with all
//!    acceptance funneled into a single leaf ([`Dafsa::from_pseudo_prefix_tree`]).
//! 2. Merge equivalent states ([`Dafsa::minimize`]).
//! 3. Convert the automaton back to a regex by state elimination
//!    ([`Dafsa::to_regex`]), normalizing edge labels with the [`Pattern`]
//!    rewrite optimizer along the way.
//!
//! ```
//! let re = wordset_regex::compile(["1a", "1b", "2a", "2b"]);
//! assert_eq!(re, "[12][ab]");
//! ```

pub mod dafsa;
pub mod pattern;

mod compile;

pub use compile::{compile, compile_units};
pub use dafsa::Dafsa;
pub use pattern::Pattern;
