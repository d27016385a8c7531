// Similarity engine: runs the three sub-score computations on a text pair
// and folds them into the composite score.
//
// Every fault from any sub-computation comes back as an `Err` carrying the
// "Similarity calculation error" context, so callers get exactly one
// outcome per comparison: a score or an error.

use anyhow::{Context, Result};
use tracing::{debug, info};

use super::composite::{SimilarityWeights, SubScores};
use crate::config::Config;
use crate::lexical::levenshtein::levenshtein_similarity;
use crate::lexical::tfidf::TfIdfVectorizer;
use crate::semantic::download::ensure_model;
use crate::semantic::embeddings::SentenceEmbedder;
use crate::semantic::traits::TextEmbedder;

/// Prefix for every error raised inside the engine.
pub const ENGINE_ERROR_PREFIX: &str = "Similarity calculation error";

/// Computes composite similarity between pairs of texts.
///
/// Generic over the embedder so a loaded model can be reused across
/// comparisons, and so tests can substitute a fake.
pub struct SimilarityEngine<E> {
    embedder: E,
    vectorizer: TfIdfVectorizer,
    weights: SimilarityWeights,
}

impl<E: TextEmbedder> SimilarityEngine<E> {
    /// Engine with default weights and a vectorizer that keeps every token.
    pub fn new(embedder: E) -> Self {
        Self {
            embedder,
            vectorizer: TfIdfVectorizer::new(),
            weights: SimilarityWeights::default(),
        }
    }

    pub fn with_weights(mut self, weights: SimilarityWeights) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_vectorizer(mut self, vectorizer: TfIdfVectorizer) -> Self {
        self.vectorizer = vectorizer;
        self
    }

    pub fn weights(&self) -> &SimilarityWeights {
        &self.weights
    }

    /// Compute the three raw sub-scores.
    pub fn sub_scores(&self, query: &str, compare: &str) -> Result<SubScores> {
        let tfidf = self.vectorizer.similarity(query, compare);
        let levenshtein = levenshtein_similarity(query, compare);
        let semantic = self
            .embedder
            .similarity(query, compare)
            .context("Semantic similarity failed")?;

        let scores = SubScores {
            levenshtein,
            tfidf,
            semantic,
        };
        debug!(
            levenshtein = scores.levenshtein,
            tfidf = scores.tfidf,
            semantic = scores.semantic,
            "Computed sub-scores"
        );
        Ok(scores)
    }

    /// Composite similarity percentage, rounded to two decimals.
    pub fn score(&self, query: &str, compare: &str) -> Result<f64> {
        let result = self
            .sub_scores(query, compare)
            .and_then(|scores| scores.composite(&self.weights));

        match result {
            Ok(score) => {
                info!(
                    score,
                    query_chars = query.chars().count(),
                    compare_chars = compare.chars().count(),
                    "Similarity computed"
                );
                Ok(score)
            }
            Err(e) => Err(e.context(ENGINE_ERROR_PREFIX)),
        }
    }
}

impl SimilarityEngine<SentenceEmbedder> {
    /// Fetch (if allowed) and load the sentence embedding model, then build
    /// an engine configured from `config`.
    pub async fn load(config: &Config) -> Result<Self> {
        let build = async {
            let model_dir = ensure_model(&config.model_dir, config.auto_download).await?;
            SentenceEmbedder::load(&model_dir)
        };
        let embedder = build.await.context(ENGINE_ERROR_PREFIX)?;
        Ok(Self::new(embedder).with_vectorizer(config.vectorizer()))
    }
}

/// Score one text pair with the on-disk model: load, compare, drop.
pub async fn compare_with_model(config: &Config, query: &str, compare: &str) -> Result<f64> {
    let engine = SimilarityEngine::load(config).await?;
    engine.score(query, compare)
}
