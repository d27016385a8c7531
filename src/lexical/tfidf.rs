// TF-IDF cosine similarity over a two-document corpus.
//
// The two texts being compared form the whole corpus, so IDF only separates
// words shared by both documents from words unique to one of them. Shared
// words get idf = 1.0, unique words get ln(3/2) + 1 ~= 1.405, which means
// vocabulary one side has and the other lacks pulls the cosine down harder
// than plain term-count overlap would.
//
// Tokenization, smoothing and normalisation follow the usual vectorizer
// defaults: lowercase, runs of 2+ letters/digits/underscores, smoothed IDF,
// L2 norm.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use stop_words::{get, LANGUAGE};
use tracing::debug;

/// Maximal runs of two or more letters, numbers or underscores.
///
/// Spelled out instead of `\w`: the regex crate's `\w` also matches
/// combining marks, so a decomposed "cafe\u{301}" would keep its accent
/// inside the token. Here the mark ends the token, and superscript or
/// fraction digits (`\p{No}`) count as part of a word.
static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}_]{2,}").expect("valid token pattern"));

/// A sparse TF-IDF vector: term -> L2-normalised weight.
pub type TermWeights = HashMap<String, f64>;

/// TF-IDF vectorizer for comparing a pair of documents.
#[derive(Debug, Clone, Default)]
pub struct TfIdfVectorizer {
    /// Lowercased English stop words to drop before counting. Empty means
    /// no filtering.
    stop_words: HashSet<String>,
}

impl TfIdfVectorizer {
    /// Vectorizer that keeps every token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Vectorizer that drops English stop words before weighting.
    pub fn with_english_stop_words() -> Self {
        let stop_words: Vec<String> = get(LANGUAGE::English);
        Self {
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn filters_stop_words(&self) -> bool {
        !self.stop_words.is_empty()
    }

    /// Split text into lowercase tokens, dropping stop words if configured.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        TOKEN_PATTERN
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .filter(|token| !self.stop_words.contains(token))
            .collect()
    }

    /// Fit the vectorizer on `[a, b]` and return both documents' vectors.
    ///
    /// A document with no surviving tokens yields an empty map.
    pub fn fit_transform_pair(&self, a: &str, b: &str) -> (TermWeights, TermWeights) {
        let counts_a = term_counts(self.tokenize(a));
        let counts_b = term_counts(self.tokenize(b));

        // Document frequency over the two-document corpus
        let mut doc_freq: HashMap<&str, u32> = HashMap::new();
        for term in counts_a.keys().chain(counts_b.keys()) {
            *doc_freq.entry(term.as_str()).or_insert(0) += 1;
        }

        let n_docs = 2.0_f64;
        let idf = |term: &str| -> f64 {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0
        };

        let vec_a = weigh(&counts_a, &idf);
        let vec_b = weigh(&counts_b, &idf);

        debug!(
            vocabulary = doc_freq.len(),
            terms_a = vec_a.len(),
            terms_b = vec_b.len(),
            "Built TF-IDF vectors"
        );

        (vec_a, vec_b)
    }

    /// Cosine similarity of the TF-IDF vectors of `a` and `b`.
    ///
    /// Returns 0.0 when either side has no vocabulary.
    pub fn similarity(&self, a: &str, b: &str) -> f64 {
        let (vec_a, vec_b) = self.fit_transform_pair(a, b);
        cosine_from_weights(&vec_a, &vec_b)
    }
}

fn term_counts(tokens: Vec<String>) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Multiply raw counts by IDF and L2-normalise.
fn weigh(counts: &HashMap<String, u32>, idf: &impl Fn(&str) -> f64) -> TermWeights {
    let mut weights: TermWeights = counts
        .iter()
        .map(|(term, &count)| (term.clone(), count as f64 * idf(term)))
        .collect();

    let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
    if norm > 0.0 {
        for w in weights.values_mut() {
            *w /= norm;
        }
    }
    weights
}

/// Cosine similarity between two sparse weight maps.
///
/// Returns 0.0 if either map is empty or has zero magnitude.
pub fn cosine_from_weights(weights_a: &TermWeights, weights_b: &TermWeights) -> f64 {
    if weights_a.is_empty() || weights_b.is_empty() {
        return 0.0;
    }

    // Iterate the smaller map for the dot product
    let (small, large) = if weights_a.len() <= weights_b.len() {
        (weights_a, weights_b)
    } else {
        (weights_b, weights_a)
    };
    let dot: f64 = small
        .iter()
        .filter_map(|(term, w)| large.get(term).map(|other| w * other))
        .sum();

    let mag_a = weights_a.values().map(|w| w * w).sum::<f64>().sqrt();
    let mag_b = weights_b.values().map(|w| w * w).sum::<f64>().sqrt();

    let denom = mag_a * mag_b;
    if denom < f64::EPSILON {
        0.0
    } else {
        (dot / denom).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_drops_single_chars() {
        let v = TfIdfVectorizer::new();
        assert_eq!(
            v.tokenize("The cat, a Hat!"),
            vec!["the".to_string(), "cat".to_string(), "hat".to_string()]
        );
    }

    #[test]
    fn test_tokenize_keeps_underscores_and_digits() {
        let v = TfIdfVectorizer::new();
        assert_eq!(
            v.tokenize("snake_case 42 x9"),
            vec!["snake_case".to_string(), "42".to_string(), "x9".to_string()]
        );
    }

    #[test]
    fn test_tokenize_unicode_words() {
        let v = TfIdfVectorizer::new();
        assert_eq!(
            v.tokenize("Café naïve"),
            vec!["café".to_string(), "naïve".to_string()]
        );
    }

    #[test]
    fn test_tokenize_combining_mark_ends_token() {
        let v = TfIdfVectorizer::new();
        // Decomposed "café" (e + U+0301) versus the precomposed form
        assert_eq!(v.tokenize("cafe\u{301} ok"), vec!["cafe".to_string(), "ok".to_string()]);
        assert_eq!(v.tokenize("caf\u{e9}"), vec!["café".to_string()]);
    }

    #[test]
    fn test_tokenize_other_numbers_join_words() {
        let v = TfIdfVectorizer::new();
        assert_eq!(v.tokenize("x²y ½"), vec!["x²y".to_string()]);
    }

    #[test]
    fn test_shared_term_idf_is_one() {
        let v = TfIdfVectorizer::new();
        let (a, b) = v.fit_transform_pair("shared", "shared");
        assert!((a["shared"] - 1.0).abs() < 1e-12);
        assert!((b["shared"] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_unique_terms_weigh_more_than_shared() {
        let v = TfIdfVectorizer::new();
        let (a, _) = v.fit_transform_pair("shared only", "shared");
        assert!(a["only"] > a["shared"]);
        // ratio is the idf of a unique term: ln(3/2) + 1
        let expected = (1.5_f64).ln() + 1.0;
        assert!((a["only"] / a["shared"] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_vectors_are_unit_length() {
        let v = TfIdfVectorizer::new();
        let (a, b) = v.fit_transform_pair("one two two three", "two four");
        for vec in [a, b] {
            let norm: f64 = vec.values().map(|w| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_known_partial_overlap_value() {
        // a = {cat, sat}, b = {cat, ran}; cat shared (idf 1), others unique
        let v = TfIdfVectorizer::new();
        let sim = v.similarity("cat sat", "cat ran");
        let u = (1.5_f64).ln() + 1.0;
        let expected = 1.0 / (1.0 + u * u);
        assert!((sim - expected).abs() < 1e-12, "got {sim}, expected {expected}");
    }

    #[test]
    fn test_empty_document_gives_empty_vector() {
        let v = TfIdfVectorizer::new();
        let (a, b) = v.fit_transform_pair("", "words here");
        assert!(a.is_empty());
        assert_eq!(b.len(), 2);
    }

    #[test]
    fn test_cosine_empty_maps() {
        let empty = TermWeights::new();
        assert_eq!(cosine_from_weights(&empty, &empty), 0.0);
    }

    #[test]
    fn test_stop_words_filtered() {
        let v = TfIdfVectorizer::with_english_stop_words();
        assert!(v.filters_stop_words());
        let tokens = v.tokenize("the cat and the hat");
        assert!(!tokens.contains(&"the".to_string()));
        assert!(!tokens.contains(&"and".to_string()));
        assert!(tokens.contains(&"cat".to_string()));
    }
}
