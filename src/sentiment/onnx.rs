// Local ONNX sentiment classifier.
//
// The classifier is a Keras embedding + recurrent model exported to ONNX.
// It takes one pre-padded sequence of word indices and returns a single
// sigmoid probability that the text is positive. Everything runs on the
// local CPU; there is no network dependency once the file is on disk.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use ort::session::Session;
use ort::value::{DynValue, Tensor};
use tracing::debug;

use super::traits::SentimentModel;

/// File name of the exported classifier inside the model directory.
pub const MODEL_FILE: &str = "sentiment_model.onnx";

/// Element type of the model's input tensor.
///
/// tf2onnx keeps the Keras default of float32 for an Embedding input unless
/// the model declared an integer input, so the exporter decides this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputDtype {
    #[default]
    Float32,
    Int64,
    Int32,
}

impl FromStr for InputDtype {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "float32" | "float" | "f32" => Ok(InputDtype::Float32),
            "int64" | "i64" => Ok(InputDtype::Int64),
            "int32" | "i32" => Ok(InputDtype::Int32),
            other => anyhow::bail!(
                "Unknown model input dtype '{other}' (expected float32, int64 or int32)"
            ),
        }
    }
}

impl fmt::Display for InputDtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputDtype::Float32 => "float32",
            InputDtype::Int64 => "int64",
            InputDtype::Int32 => "int32",
        };
        f.write_str(name)
    }
}

/// ONNX-backed classifier. The session sits behind Arc<Mutex> because
/// `Session::run` takes `&mut self` and inference is moved onto a
/// spawn_blocking thread, which needs `'static` ownership.
pub struct OnnxSentimentModel {
    session: Arc<Mutex<Session>>,
    input_dtype: InputDtype,
}

impl OnnxSentimentModel {
    /// Load `sentiment_model.onnx` from the given directory.
    pub fn load(model_dir: &Path, input_dtype: InputDtype) -> Result<Self> {
        let model_path = model_dir.join(MODEL_FILE);

        if !model_path.exists() {
            anyhow::bail!(
                "Model file not found: {}\nRun `moodcard download-model` to download it.",
                model_path.display()
            );
        }

        let session = Session::builder()
            .context("Failed to create ONNX session builder")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        debug!(
            input_dtype = %input_dtype,
            "Loaded ONNX sentiment model from {}",
            model_dir.display()
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_dtype,
        })
    }
}

#[async_trait]
impl SentimentModel for OnnxSentimentModel {
    async fn score(&self, padded: &[i64]) -> Result<f64> {
        let session = Arc::clone(&self.session);
        let input_dtype = self.input_dtype;
        let padded = padded.to_vec();

        tokio::task::spawn_blocking(move || {
            // Shape: [1, maxlen], one sequence per call
            let shape = [1_i64, padded.len() as i64];
            let input = build_input(shape, &padded, input_dtype)?;

            let output = {
                let mut session = session
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Session lock poisoned: {}", e))?;

                let outputs = session
                    .run(ort::inputs![input])
                    .context("ONNX inference failed")?;

                // Output shape: [1, 1], sigmoid probability
                let (_out_shape, data) = outputs[0]
                    .try_extract_tensor::<f32>()
                    .context("Failed to extract output tensor")?;

                data.to_vec()
            };

            let score = probability_from_output(&output)?;
            debug!(score, tokens = padded.iter().filter(|&&t| t != 0).count(), "ONNX scored sequence");
            Ok(score)
        })
        .await
        .context("spawn_blocking panicked")?
    }
}

/// Build the input tensor in the element type the exported graph declares.
fn build_input(shape: [i64; 2], padded: &[i64], dtype: InputDtype) -> Result<DynValue> {
    let value = match dtype {
        InputDtype::Float32 => {
            let data: Vec<f32> = padded.iter().map(|&t| t as f32).collect();
            Tensor::from_array((shape, data))
                .context("Failed to create float32 input tensor")?
                .into_dyn()
        }
        InputDtype::Int64 => Tensor::from_array((shape, padded.to_vec()))
            .context("Failed to create int64 input tensor")?
            .into_dyn(),
        InputDtype::Int32 => {
            let data: Vec<i32> = padded.iter().map(|&t| t as i32).collect();
            Tensor::from_array((shape, data))
                .context("Failed to create int32 input tensor")?
                .into_dyn()
        }
    };
    Ok(value)
}

/// Read the single probability out of the model output.
fn probability_from_output(output: &[f32]) -> Result<f64> {
    let Some(&raw) = output.first() else {
        anyhow::bail!("Model returned an empty output tensor");
    };

    let score = raw as f64;
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        anyhow::bail!("Model returned {score}, expected a probability in [0, 1]");
    }
    Ok(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_dtype_parse() {
        assert_eq!("float32".parse::<InputDtype>().unwrap(), InputDtype::Float32);
        assert_eq!(" INT64 ".parse::<InputDtype>().unwrap(), InputDtype::Int64);
        assert_eq!("i32".parse::<InputDtype>().unwrap(), InputDtype::Int32);
        assert!("bfloat16".parse::<InputDtype>().is_err());
    }

    #[test]
    fn test_input_dtype_display_round_trips() {
        for dtype in [InputDtype::Float32, InputDtype::Int64, InputDtype::Int32] {
            assert_eq!(dtype.to_string().parse::<InputDtype>().unwrap(), dtype);
        }
    }

    #[test]
    fn test_probability_from_output_takes_first() {
        let score = probability_from_output(&[0.75, 0.1]).unwrap();
        assert!((score - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_probability_from_output_rejects_malformed() {
        assert!(probability_from_output(&[]).is_err());
        assert!(probability_from_output(&[f32::NAN]).is_err());
        assert!(probability_from_output(&[1.5]).is_err());
        assert!(probability_from_output(&[-0.1]).is_err());
    }

    #[test]
    fn test_load_missing_model() {
        let dir = tempfile::tempdir().unwrap();
        let result = OnnxSentimentModel::load(dir.path(), InputDtype::default());
        assert!(result.is_err());
    }
}
