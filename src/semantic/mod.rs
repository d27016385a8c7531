// Semantic similarity: sentence embeddings from a local ONNX model.

pub mod download;
pub mod embeddings;
pub mod traits;
