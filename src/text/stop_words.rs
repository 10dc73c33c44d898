// Stop-word set used by the cleaner.
//
// Defaults to NLTK's English list (via the `stop-words` crate's `nltk`
// feature), the list the classifier's vocabulary was fitted on. A deployment
// can point MOODCARD_STOP_WORDS at a plain word list instead.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use stop_words::{get, LANGUAGE};
use tracing::debug;

/// A set of lowercase words removed during cleaning.
#[derive(Debug, Clone, Default)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    /// NLTK's English stop-word list.
    pub fn english() -> Self {
        let words: Vec<String> = get(LANGUAGE::English);
        Self::from_words(words)
    }

    /// An empty set; nothing is removed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a set from any iterator of words. Entries are trimmed and
    /// lowercased so lookups match the cleaner's output.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load a word list from a file: one word per line, blank lines and
    /// lines starting with `#` are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read stop-word file {}", path.display()))?;

        let stop_words = Self::from_words(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.starts_with('#')),
        );

        debug!(
            count = stop_words.len(),
            path = %path.display(),
            "Loaded stop words from file"
        );

        Ok(stop_words)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
