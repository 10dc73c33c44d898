// Vocabulary and classifier traits: the two externally-trained artifacts.
//
// Both are injected into the Analyzer as trait objects. The production
// implementations are WordIndex (Keras tokenizer JSON) and
// OnnxSentimentModel; tests swap in deterministic stubs.

use anyhow::Result;
use async_trait::async_trait;

/// Word → index mapping built when the model was trained.
pub trait Vocabulary: Send + Sync {
    /// Index for a single cleaned token. `None` drops the token from the
    /// sequence; how unknown words are treated is up to the implementation.
    fn lookup(&self, word: &str) -> Option<i64>;

    /// Convert a cleaned text into a token sequence, in word order.
    fn texts_to_sequence(&self, cleaned: &str) -> Vec<i64> {
        cleaned
            .split_whitespace()
            .filter_map(|word| self.lookup(word))
            .collect()
    }
}

/// Trait for the pre-trained binary classifier. Async because inference is
/// offloaded to a blocking thread.
#[async_trait]
pub trait SentimentModel: Send + Sync {
    /// Score one padded sequence. Returns the probability (0.0 to 1.0) that
    /// the text is positive.
    async fn score(&self, padded: &[i64]) -> Result<f64>;
}
