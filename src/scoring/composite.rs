// Composite similarity formula.
//
// Three sub-scores in [0, 1] are averaged with fixed weights and reported
// as a percentage rounded to two decimals:
//
//   final = 0.2 * levenshtein + 0.4 * tfidf + 0.4 * semantic
//
// Semantic and lexical similarity each count twice as much as raw
// character edits.

use anyhow::Result;

/// Weights for the composite similarity formula.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityWeights {
    /// Normalized edit distance (default 0.2)
    pub levenshtein: f64,
    /// TF-IDF cosine (default 0.4)
    pub tfidf: f64,
    /// Sentence embedding cosine (default 0.4)
    pub semantic: f64,
}

impl Default for SimilarityWeights {
    fn default() -> Self {
        Self {
            levenshtein: 0.2,
            tfidf: 0.4,
            semantic: 0.4,
        }
    }
}

impl SimilarityWeights {
    pub fn total(&self) -> f64 {
        self.levenshtein + self.tfidf + self.semantic
    }
}

/// The three sub-scores for one text pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub levenshtein: f64,
    pub tfidf: f64,
    pub semantic: f64,
}

impl SubScores {
    /// Copy with every sub-score clamped to [0, 1].
    ///
    /// Fails on NaN or infinity, which no well-behaved sub-computation
    /// produces.
    pub fn clamped(&self) -> Result<Self> {
        Ok(Self {
            levenshtein: clamp_unit("levenshtein", self.levenshtein)?,
            tfidf: clamp_unit("tfidf", self.tfidf)?,
            semantic: clamp_unit("semantic", self.semantic)?,
        })
    }

    /// Weighted composite as a percentage, rounded to two decimals.
    pub fn composite(&self, weights: &SimilarityWeights) -> Result<f64> {
        compute_composite_score(self, weights)
    }
}

fn clamp_unit(name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        anyhow::bail!("{name} sub-score is not a finite number ({value})");
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Combine sub-scores into the final percentage.
///
/// Sub-scores are clamped to [0, 1] first, so with the default weights the
/// result always lies in [0, 100].
pub fn compute_composite_score(scores: &SubScores, weights: &SimilarityWeights) -> Result<f64> {
    let s = scores.clamped()?;
    let combined =
        weights.levenshtein * s.levenshtein + weights.tfidf * s.tfidf + weights.semantic * s.semantic;

    if !combined.is_finite() {
        anyhow::bail!("Composite score is not a finite number ({combined})");
    }

    Ok(round_to_hundredths(combined * 100.0))
}

/// Round to two decimal places.
///
/// Rounds the exact decimal value of `value`, with exact ties going to the
/// even digit: 2.675 (stored as 2.67499...) gives 2.67, 0.125 gives 0.12.
/// Scaling by 100 first would round the already-inexact product instead.
pub fn round_to_hundredths(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{value:.2}").parse().unwrap_or(value)
}
