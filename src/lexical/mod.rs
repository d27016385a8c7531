// Lexical similarity: TF-IDF cosine and normalized edit distance.

pub mod levenshtein;
pub mod tfidf;
