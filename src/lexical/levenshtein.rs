// Normalized Levenshtein similarity.
//
// Distance is counted in Unicode scalar values (chars), not bytes, so a
// multi-byte character costs a single edit. Normalising by the longer
// string's char count keeps the result in [0, 1].

/// Raw Levenshtein distance between two strings, in chars.
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// `1 - distance / max(len(a), len(b))`, with two empty strings scoring 1.0.
pub fn levenshtein_similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    1.0 - levenshtein_distance(a, b) as f64 / max_len as f64
}
