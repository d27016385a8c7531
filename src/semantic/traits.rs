// Text embedder trait: the seam between the engine and the model.
//
// The engine only needs "texts in, vectors out". The default implementation
// is the local ONNX sentence embedder; tests plug in deterministic fakes so
// scoring can be exercised without model files.

use anyhow::Result;

/// Trait for turning texts into dense embedding vectors.
pub trait TextEmbedder {
    /// Embed each text, returning vectors in the same order as the input.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>>;

    /// Embed a pair of texts and return their cosine similarity in [0, 1].
    fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        let embeddings = self.embed(&[a, b])?;
        match embeddings.as_slice() {
            [emb_a, emb_b] => Ok(super::embeddings::cosine_similarity_embeddings(emb_a, emb_b)),
            other => anyhow::bail!("Embedder returned {} vectors for 2 texts", other.len()),
        }
    }
}

impl<T: TextEmbedder + ?Sized> TextEmbedder for &T {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f64>>> {
        (**self).embed(texts)
    }

    fn similarity(&self, a: &str, b: &str) -> Result<f64> {
        (**self).similarity(a, b)
    }
}
