use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// A normalized string atom produced by [`tokenize`].
pub type Token = String;

/// Tokens shorter than this many characters are discarded.
pub const MIN_TOKEN_CHARS: usize = 2;

lazy_static! {
    static ref RE: Regex = Regex::new(r"[\p{L}\p{N}]+").expect("valid regex");
}

/// Lower-case, strip diacritics (NFKD then drop combining marks) and collapse
/// compatibility forms, so `"Café"` and `"CAFE"` normalize identically.
fn normalize(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// Tokenize text into an ordered sequence of terms.
///
/// Total and deterministic: any input yields a (possibly empty) sequence.
/// Splits on runs of non-alphanumeric characters and drops tokens shorter
/// than [`MIN_TOKEN_CHARS`].
pub fn tokenize(text: &str) -> Vec<Token> {
    let normalized = normalize(text);
    RE.find_iter(&normalized)
        .map(|m| m.as_str())
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(String::from)
        .collect()
}

/// Flatten [`tokenize`] over a list of names, keeping encounter order and
/// duplicates (duplicates feed term frequency).
pub fn tokenize_names<S: AsRef<str>>(names: &[S]) -> Vec<Token> {
    names
        .iter()
        .flat_map(|name| tokenize(name.as_ref()))
        .collect()
}

/// Tokenize and deduplicate, preserving first-seen order. The default
/// query tokenizer of [`SearchIndex`](crate::index::SearchIndex).
pub fn tokenize_unique(text: &str) -> Vec<Token> {
    let mut seen = HashSet::new();
    tokenize(text)
        .into_iter()
        .filter(|t| seen.insert(t.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        assert_eq!(tokenize("Jane Doe Studio"), vec!["jane", "doe", "studio"]);
    }

    #[test]
    fn strips_diacritics() {
        assert_eq!(tokenize("Zoë Beyoncé"), vec!["zoe", "beyonce"]);
    }

    #[test]
    fn splits_on_punctuation_and_underscore() {
        assert_eq!(
            tokenize("hello_world.mp4 (2021)"),
            vec!["hello", "world", "mp4", "2021"]
        );
    }

    #[test]
    fn drops_short_tokens() {
        assert_eq!(tokenize("a b cd e"), vec!["cd"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("...---...").is_empty());
    }

    #[test]
    fn short_check_counts_chars_not_bytes() {
        // "é" is two bytes in UTF-8 but only one char after stripping.
        assert!(tokenize("é").is_empty());
        assert_eq!(tokenize("日本"), vec!["日本"]);
    }

    #[test]
    fn names_keep_order_and_duplicates() {
        let names = ["Red Room", "Blue", "red"];
        assert_eq!(tokenize_names(&names), vec!["red", "room", "blue", "red"]);
        assert!(tokenize_names::<&str>(&[]).is_empty());
    }

    #[test]
    fn unique_preserves_order() {
        assert_eq!(tokenize_unique("indie studio INDIE"), vec!["indie", "studio"]);
    }
}
