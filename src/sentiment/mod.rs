// Sentiment inference: trait-based abstraction over the vocabulary and the
// classifier so the pipeline can run against stubs as well as the ONNX model.

pub mod analyzer;
pub mod decision;
pub mod onnx;
pub mod sequence;
pub mod traits;
pub mod vocabulary;
