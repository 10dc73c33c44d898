// Text cleaner applied to every raw input before tokenization.
//
// Mirrors the preprocessing the classifier was trained with: anything that
// is not an ASCII letter becomes a space, the result is lowercased and split
// on whitespace, and stop words are dropped. The output only ever contains
// lowercase a-z tokens joined by single spaces.

use std::sync::LazyLock;

use regex_lite::Regex;

use super::stop_words::StopWords;

static NON_ALPHA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("[^a-zA-Z]").expect("valid regex"));

/// Clean a raw text into the form the vocabulary was built from.
///
/// Total over any input: empty strings, punctuation-only strings and
/// non-ASCII text all come back as an empty string.
pub fn clean_text(text: &str, stop_words: &StopWords) -> String {
    let letters_only = NON_ALPHA.replace_all(text, " ").to_lowercase();

    letters_only
        .split_whitespace()
        .filter(|word| !stop_words.contains(word))
        .collect::<Vec<_>>()
        .join(" ")
}
