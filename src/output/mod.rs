// Output formatting: the single JSON line written to stdout.
//
// A successful comparison prints a bare number (`87.42`); any failure prints
// an object with one `error` key. Callers parse stdout as JSON and use the
// exit code to tell the two apart.

use serde::Serialize;

/// The result of one invocation, as printed on stdout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Score(f64),
    Error { error: String },
}

impl Report {
    pub fn error(message: impl Into<String>) -> Self {
        Report::Error {
            error: message.into(),
        }
    }

    /// Build an error report from an `anyhow` error, keeping its context chain.
    pub fn from_error(err: &anyhow::Error) -> Self {
        Report::error(format!("{err:#}"))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Report::Error { .. })
    }

    /// Render as a single line of JSON.
    pub fn to_json(&self) -> String {
        // Serializing an f64 or a one-field struct of String cannot fail
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"error":"Failed to encode result: {e}"}}"#)
        })
    }
}

impl From<anyhow::Result<f64>> for Report {
    fn from(result: anyhow::Result<f64>) -> Self {
        match result {
            Ok(score) => Report::Score(score),
            Err(e) => Report::from_error(&e),
        }
    }
}
