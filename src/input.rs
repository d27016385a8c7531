// Query document loading.

use std::path::Path;

use anyhow::{Context, Result};

/// Read the query file as UTF-8 text.
///
/// Line endings are normalised to `\n` so a document saved with CRLF scores
/// the same as its LF twin. A byte-order mark is kept as content.
pub fn read_query_text(path: &Path) -> Result<String> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read query file {}", path.display()))?;
    Ok(normalize_newlines(&raw))
}

/// Translate `\r\n` and lone `\r` to `\n`.
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
