// Word index loaded from the tokenizer that was fitted at training time.
//
// The tokenizer is exported as JSON, either the full Keras
// `Tokenizer.to_json()` document or a bare `{"word": index}` object. Only
// the fields that affect lookups are kept: the word index itself, the
// `num_words` cap and the OOV token.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::traits::Vocabulary;

/// File name of the exported tokenizer inside the model directory.
pub const VOCABULARY_FILE: &str = "tokenizer.json";

/// Word → index vocabulary with Keras out-of-vocabulary semantics.
#[derive(Debug, Clone)]
pub struct WordIndex {
    word_index: HashMap<String, i64>,
    /// Only indices below this are considered known.
    num_words: Option<i64>,
    /// Index substituted for unknown words. `None` means unknown words are dropped.
    oov_index: Option<i64>,
}

impl WordIndex {
    /// Build a vocabulary directly from its parts.
    ///
    /// The OOV index is resolved by looking `oov_token` up in `word_index`;
    /// a token that isn't in the index behaves as if none was configured.
    pub fn new(
        word_index: HashMap<String, i64>,
        num_words: Option<i64>,
        oov_token: Option<&str>,
    ) -> Self {
        let oov_index = oov_token.and_then(|token| word_index.get(token).copied());
        Self {
            word_index,
            num_words,
            oov_index,
        }
    }

    /// Load the vocabulary from a tokenizer JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "Vocabulary file not found: {}\nRun `moodcard download-model` to download it.",
                path.display()
            );
        }

        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read vocabulary from {}", path.display()))?;

        let vocab = Self::from_json(&json)
            .with_context(|| format!("Failed to parse vocabulary in {}", path.display()))?;

        debug!(
            words = vocab.len(),
            num_words = ?vocab.num_words,
            has_oov = vocab.oov_index.is_some(),
            "Loaded vocabulary from {}",
            path.display()
        );

        Ok(vocab)
    }

    /// Parse either tokenizer JSON shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: VocabularyFile =
            serde_json::from_str(json).context("Not a Keras tokenizer or word-index object")?;

        match file {
            VocabularyFile::Keras(doc) => {
                let word_index = match doc.config.word_index {
                    WordIndexField::Map(map) => map,
                    // Keras double-encodes the index as a JSON string
                    WordIndexField::Encoded(raw) => serde_json::from_str(&raw)
                        .context("Tokenizer word_index is not a valid JSON object")?,
                };
                Ok(Self::new(
                    word_index,
                    doc.config.num_words,
                    doc.config.oov_token.as_deref(),
                ))
            }
            VocabularyFile::Bare(word_index) => Ok(Self::new(word_index, None, None)),
        }
    }

    pub fn len(&self) -> usize {
        self.word_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.word_index.is_empty()
    }
}

impl Vocabulary for WordIndex {
    fn lookup(&self, word: &str) -> Option<i64> {
        match self.word_index.get(word) {
            Some(&index) if self.num_words.is_some_and(|cap| cap > 0 && index >= cap) => self.oov_index,
            Some(&index) => Some(index),
            None => self.oov_index,
        }
    }
}

// -- Serde types for the tokenizer JSON --

#[derive(Deserialize)]
#[serde(untagged)]
enum VocabularyFile {
    Keras(KerasTokenizerJson),
    Bare(HashMap<String, i64>),
}

#[derive(Deserialize)]
struct KerasTokenizerJson {
    config: KerasTokenizerConfig,
}

#[derive(Deserialize)]
struct KerasTokenizerConfig {
    #[serde(default)]
    num_words: Option<i64>,
    #[serde(default)]
    oov_token: Option<String>,
    word_index: WordIndexField,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WordIndexField {
    Encoded(String),
    Map(HashMap<String, i64>),
}
