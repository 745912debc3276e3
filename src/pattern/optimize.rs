//! Rewrite-based pattern normalization.
//!
//! `optimize` rewrites a pattern into a canonical, semantically equivalent
//! form. The alternation rules carry the weight: common prefixes and suffixes
//! are factored out with a widening window, single-unit branches fuse into
//! one character class, and optionality (`x?` branches, empty branches) is
//! lifted to a `Maybe` around the result.

use std::collections::BTreeSet;

use indexmap::{IndexMap, IndexSet};

use super::element::{Kind, Pattern};

/// Which end of the options a factoring pass keys on.
#[derive(Clone, Copy)]
enum Side {
    Prefix,
    Suffix,
}

impl Pattern {
    /// A canonical, semantically equivalent form of this pattern.
    ///
    /// Idempotent: optimizing an already-optimized pattern returns it
    /// unchanged.
    pub fn optimize(&self) -> Pattern {
        if self.is_optimized() {
            return self.clone();
        }
        match self.kind() {
            Kind::Nothing => Pattern::nothing(),
            Kind::Single(unit) => Pattern::single(*unit),
            Kind::Class(units) => optimize_class(units),
            Kind::Seq(children) => optimize_seq(children),
            Kind::Maybe(child) => optimize_maybe(child),
            Kind::Or(options) => optimize_or(options),
        }
    }
}

fn optimize_class(units: &BTreeSet<u16>) -> Pattern {
    match units.len() {
        0 => Pattern::nothing(),
        1 => Pattern::single(*units.iter().next().unwrap()),
        _ => Pattern::with_kind(Kind::Class(units.clone()), true),
    }
}

fn optimize_seq(children: &[Pattern]) -> Pattern {
    let mut items: Vec<Pattern> = children.to_vec();
    // Fixpoint: flatten nested concatenations, optimize children, drop
    // empty-string children.
    loop {
        let mut changed = false;
        let mut next: Vec<Pattern> = Vec::with_capacity(items.len());
        for item in items {
            let item = item.optimize();
            if item.is_nothing() {
                changed = true;
                continue;
            }
            if let Kind::Seq(inner) = item.kind() {
                next.extend(inner.iter().cloned());
                changed = true;
                continue;
            }
            next.push(item);
        }
        items = next;
        if !changed {
            break;
        }
    }
    match items.len() {
        0 => Pattern::nothing(),
        1 => items.pop().unwrap(),
        _ => Pattern::with_kind(Kind::Seq(items), true),
    }
}

fn optimize_maybe(child: &Pattern) -> Pattern {
    let child = child.optimize();
    if child.is_nothing() {
        return Pattern::nothing();
    }
    // `x??` is `x?`.
    if matches!(child.kind(), Kind::Maybe(_)) {
        return child;
    }
    Pattern::with_kind(Kind::Maybe(child), true)
}

fn optimize_or(options: &[Pattern]) -> Pattern {
    let mut is_optional = false;

    // Step 1: optimize every option and lift outer optionality, so `x?`
    // competes in factoring as `x`.
    let mut current: Vec<Pattern> = Vec::with_capacity(options.len());
    for option in options {
        let option = option.optimize();
        if let Kind::Maybe(inner) = option.kind() {
            is_optional = true;
            current.push(inner.clone());
            continue;
        }
        current.push(option);
    }

    // Step 2: flatten until no option is an alternation or a character set.
    // Character sets explode into their single units so factoring and fusion
    // see a uniform shape.
    loop {
        let mut changed = false;
        let mut next: IndexSet<Pattern> = IndexSet::with_capacity(current.len());
        for option in current {
            if let Kind::Or(inner) = option.kind() {
                for o in inner {
                    next.insert(o.optimize());
                }
                changed = true;
                continue;
            }
            if let Kind::Class(units) = option.kind() {
                for &unit in units {
                    next.insert(Pattern::single(unit));
                }
                changed = true;
                continue;
            }
            next.insert(option);
        }
        current = next.into_iter().collect();
        if !changed {
            break;
        }
    }

    // Step 3: alternate one prefix pass and one suffix pass, widening the
    // window only when both stall. Widening prematurely loses factorings
    // that only become visible after narrower contractions.
    let max_len = current
        .iter()
        .map(|o| o.as_sequence().len())
        .max()
        .unwrap_or(0);
    let mut xfix_len = 1;
    while xfix_len < max_len {
        let prefixed = xfix_pass(&mut current, xfix_len, Side::Prefix);
        let suffixed = xfix_pass(&mut current, xfix_len, Side::Suffix);
        if !prefixed && !suffixed {
            xfix_len += 1;
        }
    }

    // Step 4: fuse the remaining single-unit options into one class.
    let mut units: BTreeSet<u16> = BTreeSet::new();
    let mut fused_any = false;
    let mut rest: Vec<Pattern> = Vec::with_capacity(current.len());
    for option in current {
        if let Kind::Single(unit) = option.kind() {
            units.insert(*unit);
            fused_any = true;
            continue;
        }
        if let Kind::Class(set) = option.kind() {
            units.extend(set.iter().copied());
            fused_any = true;
            continue;
        }
        rest.push(option);
    }
    if fused_any {
        let fused = optimize_class(&units);
        if !fused.is_nothing() {
            rest.push(fused);
        }
    }

    // Step 5: empty-string options fold into optionality around the result.
    let mut remaining: IndexSet<Pattern> = IndexSet::with_capacity(rest.len());
    for option in rest {
        if option.is_nothing() {
            is_optional = true;
        } else {
            remaining.insert(option);
        }
    }
    let mut remaining: Vec<Pattern> = remaining.into_iter().collect();
    let folded = match remaining.len() {
        0 => return Pattern::nothing(),
        1 => remaining.pop().unwrap(),
        _ => Pattern::with_kind(Kind::Or(remaining), true),
    };
    if !is_optional {
        return folded;
    }
    if matches!(folded.kind(), Kind::Maybe(_)) {
        folded
    } else {
        Pattern::with_kind(Kind::Maybe(folded), true)
    }
}

/// One grouping pass over the options, keyed on the first (or last)
/// `xfix_len` sequence elements. Groups of two or more options with a shared
/// key contract into `key(…|…)` (or the suffix mirror). Returns whether any
/// group contracted.
fn xfix_pass(options: &mut Vec<Pattern>, xfix_len: usize, side: Side) -> bool {
    // Traverse in the alternation's rendering order so grouping, and with it
    // the output, never depends on container insertion order.
    options.sort_by(|a, b| {
        b.max_match_len()
            .cmp(&a.max_match_len())
            .then_with(|| a.to_regex().cmp(b.to_regex()))
    });

    let mut groups: IndexMap<Pattern, Vec<Pattern>> = IndexMap::new();
    for option in options.iter() {
        let seq = option.as_sequence();
        let key = if seq.len() < xfix_len {
            Pattern::nothing()
        } else {
            let window = match side {
                Side::Prefix => seq[..xfix_len].to_vec(),
                Side::Suffix => seq[seq.len() - xfix_len..].to_vec(),
            };
            Pattern::seq(window).optimize()
        };
        groups.entry(key).or_default().push(option.clone());
    }

    let mut changed = false;
    let mut next: Vec<Pattern> = Vec::with_capacity(options.len());
    for (key, members) in groups {
        // A Nothing key marks options shorter than the window: they stay as
        // bare alternatives, which is what lets optionality lifting later
        // turn `ab|b` into `a?b`.
        if members.len() == 1 || key.is_nothing() {
            next.extend(members);
            continue;
        }
        let remainders: Vec<Pattern> = members
            .iter()
            .map(|member| {
                let seq = member.as_sequence();
                let rest = match side {
                    Side::Prefix => seq[xfix_len..].to_vec(),
                    Side::Suffix => seq[..seq.len() - xfix_len].to_vec(),
                };
                Pattern::seq(rest).optimize()
            })
            .collect();
        let folded = match side {
            Side::Prefix => Pattern::seq(vec![key, Pattern::or(remainders)]),
            Side::Suffix => Pattern::seq(vec![Pattern::or(remainders), key]),
        };
        next.push(folded.optimize());
        changed = true;
    }
    *options = next;
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(ch: char) -> Pattern {
        Pattern::single(ch as u16)
    }

    fn word(s: &str) -> Pattern {
        Pattern::seq(s.encode_utf16().map(Pattern::single).collect())
    }

    #[test]
    fn test_class_collapses() {
        assert!(Pattern::class([]).optimize().is_nothing());
        assert_eq!(Pattern::class([b'a' as u16]).optimize().to_regex(), "a");
        let ab = Pattern::class([b'a' as u16, b'b' as u16]);
        assert_eq!(ab.optimize().to_regex(), "[ab]");
    }

    #[test]
    fn test_seq_flattens_and_drops_nothing() {
        let seq = Pattern::seq(vec![
            Pattern::seq(vec![single('a'), single('b')]),
            Pattern::nothing(),
            single('c'),
        ]);
        assert_eq!(seq.optimize().to_regex(), "abc");

        assert!(Pattern::seq(vec![]).optimize().is_nothing());
        assert!(Pattern::seq(vec![Pattern::nothing()]).optimize().is_nothing());
        assert_eq!(Pattern::seq(vec![single('a')]).optimize().to_regex(), "a");
    }

    #[test]
    fn test_maybe_rules() {
        assert!(Pattern::maybe(Pattern::nothing()).optimize().is_nothing());
        let nested = Pattern::maybe(Pattern::maybe(single('a')));
        assert_eq!(nested.optimize().to_regex(), "a?");
    }

    #[test]
    fn test_or_fuses_single_units() {
        let or = Pattern::or([single('a'), single('b'), single('c')]);
        assert_eq!(or.to_regex(), "a|b|c");
        assert_eq!(or.optimize().to_regex(), "[a-c]");
    }

    #[test]
    fn test_or_with_nothing_becomes_optional() {
        let or = Pattern::or([single('a'), Pattern::nothing()]);
        assert_eq!(or.optimize().to_regex(), "a?");
    }

    #[test]
    fn test_or_lifts_optional_branches() {
        let or = Pattern::or([Pattern::maybe(word("ab")), single('c')]);
        assert_eq!(or.optimize().to_regex(), "(?:ab|c)?");
    }

    #[test]
    fn test_or_factors_shared_suffix() {
        let or = Pattern::or([word("ab"), word("b")]);
        assert_eq!(or.optimize().to_regex(), "a?b");
    }

    #[test]
    fn test_or_factors_prefix_then_fuses() {
        let or = Pattern::or([word("ab1"), word("ab2"), word("ac3"), word("ac4")]);
        assert_eq!(or.optimize().to_regex(), "a(?:b[12]|c[34])");
    }

    #[test]
    fn test_or_widening_window() {
        let or = Pattern::or([word("123"), word("1"), word("45"), word("6")]);
        assert_eq!(or.optimize().to_regex(), "1(?:23)?|45|6");
    }

    #[test]
    fn test_or_expands_class_options() {
        let or = Pattern::or([Pattern::class([b'a' as u16, b'b' as u16]), single('c')]);
        assert_eq!(or.optimize().to_regex(), "[a-c]");
    }

    #[test]
    fn test_empty_or_is_nothing() {
        assert!(Pattern::or([]).optimize().is_nothing());
    }

    #[test]
    fn test_optimize_is_idempotent() {
        let patterns = vec![
            Pattern::or([word("ab"), word("b"), word("abc"), word("bc")]),
            Pattern::or([word("123"), word("1"), word("45"), word("6")]),
            Pattern::maybe(Pattern::maybe(single('x'))),
            Pattern::seq(vec![word("ab"), Pattern::nothing(), single('c')]),
            Pattern::class([b'a' as u16, b'b' as u16, b'z' as u16]),
        ];
        for pattern in patterns {
            let once = pattern.optimize();
            let twice = once.optimize();
            assert_eq!(once, twice, "optimize must be idempotent for {pattern}");
        }
    }
}
