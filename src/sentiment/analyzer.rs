// Analyzer: the loaded-once resource holder that runs the full pipeline:
// clean -> sequence -> pad -> score -> label.
//
// Built once at startup and then only borrowed. Nothing in here mutates
// after construction, so request handlers share a plain `&Analyzer`.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::decision::Sentiment;
use super::onnx::OnnxSentimentModel;
use super::sequence::pad_sequence;
use super::traits::{SentimentModel, Vocabulary};
use super::vocabulary::WordIndex;
use crate::config::Config;
use crate::text::normalize::clean_text;
use crate::text::stop_words::StopWords;

/// The result of analyzing one text, which a card is rendered from.
#[derive(Debug, Clone)]
pub struct Prediction {
    /// The text exactly as it was given
    pub text: String,
    /// The cleaned text the vocabulary saw
    pub cleaned: String,
    /// Raw model probability (0.0 to 1.0)
    pub score: f64,
    pub sentiment: Sentiment,
}

pub struct Analyzer {
    vocabulary: Arc<dyn Vocabulary>,
    model: Box<dyn SentimentModel>,
    stop_words: StopWords,
    max_len: usize,
}

impl Analyzer {
    pub fn new(
        vocabulary: Arc<dyn Vocabulary>,
        model: Box<dyn SentimentModel>,
        stop_words: StopWords,
        max_len: usize,
    ) -> Self {
        Self {
            vocabulary,
            model,
            stop_words,
            max_len,
        }
    }

    /// Load the stop words, vocabulary and ONNX model named by the config.
    ///
    /// Every request needs all three, so any failure here is fatal.
    pub fn load(config: &Config) -> Result<Self> {
        let stop_words = match &config.stop_words_path {
            Some(path) => StopWords::from_file(path)?,
            None => StopWords::english(),
        };

        let vocabulary = WordIndex::load(&config.vocabulary_path())
            .context("Failed to load vocabulary")?;
        let model = OnnxSentimentModel::load(&config.model_dir, config.input_dtype)
            .context("Failed to load sentiment model")?;

        info!(
            vocabulary = vocabulary.len(),
            stop_words = stop_words.len(),
            max_len = config.max_len,
            "Sentiment analyzer ready"
        );

        Ok(Self::new(
            Arc::new(vocabulary),
            Box::new(model),
            stop_words,
            config.max_len,
        ))
    }

    /// Clean, numericize and pad a text into the model's input shape.
    pub fn encode(&self, text: &str) -> (String, Vec<i64>) {
        let cleaned = clean_text(text, &self.stop_words);
        let sequence = self.vocabulary.texts_to_sequence(&cleaned);
        let padded = pad_sequence(&sequence, self.max_len);
        (cleaned, padded)
    }

    /// Run the whole pipeline on one text.
    ///
    /// Empty input is not rejected: it cleans to "" and the model still
    /// scores an all-padding sequence.
    pub async fn predict(&self, text: &str) -> Result<Prediction> {
        let (cleaned, padded) = self.encode(text);
        let score = self.model.score(&padded).await?;
        let sentiment = Sentiment::from_score(score);

        debug!(
            score,
            sentiment = %sentiment,
            text_preview = %crate::output::truncate_chars(text, 50),
            "Predicted sentiment"
        );

        Ok(Prediction {
            text: text.to_string(),
            cleaned,
            score,
            sentiment,
        })
    }

    /// Predict each text in turn, preserving order. A failure on one text
    /// is returned in its slot and doesn't stop the rest.
    pub async fn predict_all(&self, texts: &[String]) -> Vec<Result<Prediction>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.predict(text).await);
        }
        results
    }
}
