//! Rendering patterns to concrete regex syntax.
//!
//! The output dialect uses `?`, `|`, `[…]` classes with `-` ranges, `(?:…)`
//! non-capturing groups and `\uXXXX` escapes, and is accepted by the common
//! extended regex engines. ASCII metacharacters are backslash-escaped; code
//! units at or above 128 always render as `\uXXXX` with four upper-case hex
//! digits, so surrogate halves pass through unmodified.

use std::collections::BTreeSet;

use super::element::{Kind, Pattern};

impl Pattern {
    /// The concrete regex string for this pattern.
    ///
    /// Rendered once and memoized; equality, hashing and ordering of
    /// `Pattern` all read the same cache.
    pub fn to_regex(&self) -> &str {
        self.rendered_cache().get_or_init(|| self.render())
    }

    fn render(&self) -> String {
        match self.kind() {
            Kind::Nothing => String::new(),
            Kind::Single(unit) => render_unit(*unit),
            Kind::Class(units) => render_class(units),
            Kind::Seq(children) => {
                let mut out = String::new();
                for child in children {
                    // Alternations bind loosest, so they are the only
                    // children that need a group inside a concatenation.
                    if matches!(child.kind(), Kind::Or(_)) {
                        out.push_str("(?:");
                        out.push_str(child.to_regex());
                        out.push(')');
                    } else {
                        out.push_str(child.to_regex());
                    }
                }
                out
            }
            Kind::Maybe(child) => {
                if child.is_atom() {
                    format!("{}?", child.to_regex())
                } else {
                    format!("(?:{})?", child.to_regex())
                }
            }
            Kind::Or(options) => {
                // Longest-match-first: descending maximum match length, then
                // lexicographic for a deterministic tiebreak. A left-to-right
                // engine tries longer alternatives before shorter ones.
                let mut sorted: Vec<&Pattern> = options.iter().collect();
                sorted.sort_by(|a, b| {
                    b.max_match_len()
                        .cmp(&a.max_match_len())
                        .then_with(|| a.to_regex().cmp(b.to_regex()))
                });
                let rendered: Vec<&str> = sorted.iter().map(|o| o.to_regex()).collect();
                rendered.join("|")
            }
        }
    }
}

/// Render one code unit: escaped literal below 128, `\uXXXX` otherwise.
fn render_unit(unit: u16) -> String {
    if unit < 128 {
        let ch = unit as u8 as char;
        if is_metacharacter(ch) {
            format!("\\{ch}")
        } else {
            ch.to_string()
        }
    } else {
        format!("\\u{unit:04X}")
    }
}

fn is_metacharacter(ch: char) -> bool {
    matches!(
        ch,
        '\\' | '^' | '$' | '.' | '|' | '?' | '*' | '+' | '(' | ')' | '[' | ']' | '{' | '}' | '-'
    )
}

/// Render a character class body: members sorted ascending, maximal runs of
/// consecutive code units coalesced. Runs of one or two units render their
/// members back to back; runs of three or more render as `from-to`.
fn render_class(units: &BTreeSet<u16>) -> String {
    let sorted: Vec<u16> = units.iter().copied().collect();
    let mut out = String::from("[");
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[j] + 1 {
            j += 1;
        }
        match j - i {
            0 => out.push_str(&render_unit(sorted[i])),
            1 => {
                out.push_str(&render_unit(sorted[i]));
                out.push_str(&render_unit(sorted[j]));
            }
            _ => {
                out.push_str(&render_unit(sorted[i]));
                out.push('-');
                out.push_str(&render_unit(sorted[j]));
            }
        }
        i = j + 1;
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(ch: char) -> Pattern {
        Pattern::single(ch as u16)
    }

    #[test]
    fn test_render_unit_ascii() {
        assert_eq!(render_unit(b'a' as u16), "a");
        assert_eq!(render_unit(b'7' as u16), "7");
        assert_eq!(render_unit(b'.' as u16), "\\.");
        assert_eq!(render_unit(b'+' as u16), "\\+");
        assert_eq!(render_unit(b'\\' as u16), "\\\\");
    }

    #[test]
    fn test_render_unit_non_ascii() {
        assert_eq!(render_unit(0x00E9), "\\u00E9");
        assert_eq!(render_unit(0x4E00), "\\u4E00");
        // Surrogate halves render as-is; the pair stays adjacent in output.
        assert_eq!(render_unit(0xD83D), "\\uD83D");
        assert_eq!(render_unit(0xDC4B), "\\uDC4B");
    }

    #[test]
    fn test_class_runs() {
        let abc = Pattern::class([b'a' as u16, b'b' as u16, b'c' as u16]);
        assert_eq!(abc.to_regex(), "[a-c]");

        let ab = Pattern::class([b'a' as u16, b'b' as u16]);
        assert_eq!(ab.to_regex(), "[ab]");

        let a = Pattern::class([b'a' as u16]);
        assert_eq!(a.to_regex(), "[a]");

        let mixed = Pattern::class([b'a' as u16, b'b' as u16, b'c' as u16, b'x' as u16]);
        assert_eq!(mixed.to_regex(), "[a-cx]");
    }

    #[test]
    fn test_class_escapes_metacharacters() {
        // 0x2A..0x2C is the consecutive run `*`, `+`, `,`.
        let run = Pattern::class([0x2A, 0x2B, 0x2C]);
        assert_eq!(run.to_regex(), "[\\*-,]");
    }

    #[test]
    fn test_seq_groups_alternations_only() {
        let or = Pattern::or([single('b'), single('c')]);
        let seq = Pattern::seq(vec![single('a'), or]);
        assert_eq!(seq.to_regex(), "a(?:b|c)");

        let seq = Pattern::seq(vec![single('a'), Pattern::maybe(single('b'))]);
        assert_eq!(seq.to_regex(), "ab?");
    }

    #[test]
    fn test_maybe_grouping() {
        assert_eq!(Pattern::maybe(single('a')).to_regex(), "a?");
        let class = Pattern::class([b'a' as u16, b'b' as u16]);
        assert_eq!(Pattern::maybe(class).to_regex(), "[ab]?");

        let ab = Pattern::seq(vec![single('a'), single('b')]);
        assert_eq!(Pattern::maybe(ab).to_regex(), "(?:ab)?");
    }

    #[test]
    fn test_maybe_of_maybe_keeps_inner_quantifier() {
        let nested = Pattern::maybe(Pattern::maybe(single('a')));
        assert_eq!(nested.to_regex(), "(?:a?)?");
    }

    #[test]
    fn test_or_orders_longest_match_first() {
        let a = single('a');
        let ab = Pattern::seq(vec![single('a'), single('b')]);
        assert_eq!(Pattern::or([a, ab]).to_regex(), "ab|a");

        let flat = Pattern::or([single('a'), single('b'), single('c')]);
        assert_eq!(flat.to_regex(), "a|b|c");
    }

    #[test]
    fn test_or_with_nothing_renders_empty_branch_last() {
        let or = Pattern::or([single('a'), Pattern::nothing()]);
        assert_eq!(or.to_regex(), "a|");
    }

    #[test]
    fn test_surrogate_pair_sequence() {
        let wave = Pattern::seq(vec![Pattern::single(0xD83D), Pattern::single(0xDC4B)]);
        assert_eq!(wave.to_regex(), "\\uD83D\\uDC4B");
    }
}
