use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::nitter::client::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_MIRROR_URL};
use crate::sentiment::onnx::{InputDtype, MODEL_FILE};
use crate::sentiment::sequence::DEFAULT_MAX_LEN;
use crate::sentiment::vocabulary::VOCABULARY_FILE;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default except the model download URL, which is only
/// needed by `download-model`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding sentiment_model.onnx and tokenizer.json
    pub model_dir: PathBuf,
    /// Base URL the model artifacts are downloaded from
    pub model_url: Option<String>,
    /// Nitter mirror posts are scraped from
    pub mirror_url: String,
    /// Timeout applied to each mirror request
    pub fetch_timeout: Duration,
    /// Sequence length the classifier was trained on
    pub max_len: usize,
    /// Element type of the model's input tensor
    pub input_dtype: InputDtype,
    /// Stop-word list file; None uses the built-in English list
    pub stop_words_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unset and empty values fall back
    /// to defaults; values that are set but malformed are errors.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let model_dir = var("MOODCARD_MODEL_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(crate::model::download::default_model_dir);

        let fetch_timeout_secs = match var("MOODCARD_FETCH_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().with_context(|| {
                format!("MOODCARD_FETCH_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'")
            })?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };
        if fetch_timeout_secs == 0 {
            anyhow::bail!("MOODCARD_FETCH_TIMEOUT_SECS must be greater than zero");
        }

        let max_len = match var("MOODCARD_MAX_LEN") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("MOODCARD_MAX_LEN must be a positive integer, got '{raw}'"))?,
            None => DEFAULT_MAX_LEN,
        };
        if max_len == 0 {
            anyhow::bail!("MOODCARD_MAX_LEN must be greater than zero");
        }

        let input_dtype = match var("MOODCARD_INPUT_DTYPE") {
            Some(raw) => raw.parse::<InputDtype>()?,
            None => InputDtype::default(),
        };

        Ok(Self {
            model_dir,
            model_url: var("MOODCARD_MODEL_URL"),
            mirror_url: var("MOODCARD_MIRROR_URL").unwrap_or_else(|| DEFAULT_MIRROR_URL.to_string()),
            fetch_timeout: Duration::from_secs(fetch_timeout_secs),
            max_len,
            input_dtype,
            stop_words_path: var("MOODCARD_STOP_WORDS").map(PathBuf::from),
        })
    }

    pub fn model_path(&self) -> PathBuf {
        self.model_dir.join(MODEL_FILE)
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.model_dir.join(VOCABULARY_FILE)
    }

    /// Check that both model artifacts are on disk.
    /// Call this before building the Analyzer so the error says what to do.
    pub fn require_model(&self) -> Result<()> {
        if !crate::model::download::model_files_present(&self.model_dir) {
            anyhow::bail!(
                "Model files not found in {}\n\
                 Run `moodcard download-model` to download them,\n\
                 or set MOODCARD_MODEL_DIR to a directory containing {} and {}.",
                self.model_dir.display(),
                MODEL_FILE,
                VOCABULARY_FILE
            );
        }
        Ok(())
    }

    /// Check that a download URL is configured.
    pub fn require_model_url(&self) -> Result<&str> {
        match self.model_url.as_deref() {
            Some(url) => Ok(url),
            None => anyhow::bail!(
                "MOODCARD_MODEL_URL not set. Add it to your .env file.\n\
                 It should point at a directory serving {} and {}.",
                MODEL_FILE,
                VOCABULARY_FILE
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.mirror_url, "https://nitter.net");
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.max_len, 100);
        assert_eq!(config.input_dtype, InputDtype::Float32);
        assert!(config.model_url.is_none());
        assert!(config.stop_words_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("MOODCARD_MODEL_DIR", "/opt/models"),
            ("MOODCARD_MIRROR_URL", "http://localhost:8080"),
            ("MOODCARD_FETCH_TIMEOUT_SECS", "3"),
            ("MOODCARD_MAX_LEN", "50"),
            ("MOODCARD_INPUT_DTYPE", "int64"),
            ("MOODCARD_STOP_WORDS", "/etc/stops.txt"),
        ])
        .unwrap();
        assert_eq!(config.model_path(), PathBuf::from("/opt/models/sentiment_model.onnx"));
        assert_eq!(config.vocabulary_path(), PathBuf::from("/opt/models/tokenizer.json"));
        assert_eq!(config.mirror_url, "http://localhost:8080");
        assert_eq!(config.fetch_timeout, Duration::from_secs(3));
        assert_eq!(config.max_len, 50);
        assert_eq!(config.input_dtype, InputDtype::Int64);
        assert_eq!(config.stop_words_path, Some(PathBuf::from("/etc/stops.txt")));
    }

    #[test]
    fn test_empty_values_use_defaults() {
        let config = config_from(&[("MOODCARD_MAX_LEN", ""), ("MOODCARD_MODEL_URL", "  ")]).unwrap();
        assert_eq!(config.max_len, 100);
        assert!(config.model_url.is_none());
    }

    #[test]
    fn test_malformed_values_are_errors() {
        assert!(config_from(&[("MOODCARD_MAX_LEN", "lots")]).is_err());
        assert!(config_from(&[("MOODCARD_MAX_LEN", "0")]).is_err());
        assert!(config_from(&[("MOODCARD_FETCH_TIMEOUT_SECS", "-1")]).is_err());
        assert!(config_from(&[("MOODCARD_FETCH_TIMEOUT_SECS", "0")]).is_err());
        assert!(config_from(&[("MOODCARD_INPUT_DTYPE", "complex128")]).is_err());
    }

    #[test]
    fn test_require_model_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_from(&[("MOODCARD_MODEL_DIR", dir.path().to_str().unwrap())]).unwrap();
        let err = config.require_model().unwrap_err();
        assert!(err.to_string().contains("download-model"));
    }

    #[test]
    fn test_require_model_url() {
        assert!(config_from(&[]).unwrap().require_model_url().is_err());
        let config = config_from(&[("MOODCARD_MODEL_URL", "https://example.org/m")]).unwrap();
        assert_eq!(config.require_model_url().unwrap(), "https://example.org/m");
    }
}
