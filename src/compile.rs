//! The compilation façade.

use log::debug;

use crate::dafsa::Dafsa;

/// Compile a set of literal words into a regex matching exactly that set.
///
/// Words are taken as sequences of UTF-16 code units; astral characters keep
/// their surrogate-pair representation in the output. An empty word list
/// compiles to the empty string.
///
/// ```
/// assert_eq!(wordset_regex::compile(["ab", "bc", "b", "abc"]), "a?bc?");
/// ```
pub fn compile<I, S>(words: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let units: Vec<Vec<u16>> = words
        .into_iter()
        .map(|w| w.as_ref().encode_utf16().collect())
        .collect();
    compile_units(&units)
}

/// [`compile`] for callers that already hold raw UTF-16 code units.
pub fn compile_units(words: &[Vec<u16>]) -> String {
    debug!("compiling {} words", words.len());
    Dafsa::from_words_minimized(words).to_regex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        assert_eq!(compile(Vec::<&str>::new()), "");
    }

    #[test]
    fn test_single_word_is_escaped_literal() {
        assert_eq!(compile(["a+b"]), "a\\+b");
    }

    #[test]
    fn test_compile_units_matches_compile() {
        let words = ["do", "dog", "cat"];
        let units: Vec<Vec<u16>> = words.iter().map(|w| w.encode_utf16().collect()).collect();
        assert_eq!(compile_units(&units), compile(words));
    }

    #[test]
    fn test_astral_words_stay_surrogate_pairs() {
        // U+1F44B WAVING HAND is the pair D83D DC4B.
        assert_eq!(compile(["\u{1F44B}"]), "\\uD83D\\uDC4B");
    }
}
