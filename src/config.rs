use std::env;
use std::path::PathBuf;

use anyhow::Result;

use crate::lexical::tfidf::TfIdfVectorizer;
use crate::semantic::download::default_model_dir;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. Every
/// setting has a default, so an empty environment is a valid configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base directory for model files (SIMILARITY_MODEL_DIR). The embedding
    /// model lives in its `all-MiniLM-L6-v2/` subdirectory.
    pub model_dir: PathBuf,
    /// Fetch missing model files from HuggingFace (SIMILARITY_AUTO_DOWNLOAD, default true)
    pub auto_download: bool,
    /// Drop English stop words before TF-IDF (SIMILARITY_STOP_WORDS, default false)
    pub stop_words: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_dir: default_model_dir(),
            auto_download: true,
            stop_words: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unset variables fall back to defaults; malformed booleans are errors.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let model_dir = lookup("SIMILARITY_MODEL_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.model_dir);

        let auto_download = match lookup("SIMILARITY_AUTO_DOWNLOAD") {
            Some(v) => parse_bool("SIMILARITY_AUTO_DOWNLOAD", &v)?,
            None => defaults.auto_download,
        };

        let stop_words = match lookup("SIMILARITY_STOP_WORDS") {
            Some(v) => parse_bool("SIMILARITY_STOP_WORDS", &v)?,
            None => defaults.stop_words,
        };

        Ok(Self {
            model_dir,
            auto_download,
            stop_words,
        })
    }

    /// TF-IDF vectorizer matching the stop-word setting.
    pub fn vectorizer(&self) -> TfIdfVectorizer {
        if self.stop_words {
            TfIdfVectorizer::with_english_stop_words()
        } else {
            TfIdfVectorizer::new()
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{key} must be a boolean (true/false), got {other:?}"),
    }
}
