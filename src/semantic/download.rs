// Model file management for the sentence embedding model.
//
// The model is fixed: sentence-transformers/all-MiniLM-L6-v2 (~90MB ONNX
// export plus its tokenizer). Files are stored in a platform-appropriate
// directory (~/.local/share/similarity-checker/models/ on Linux) so the
// download happens once per machine, not once per invocation.
//
// Nothing here writes to stdout: stdout carries the single JSON result line.
// Progress goes to stderr through indicatif.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tempfile::NamedTempFile;
use tracing::info;

/// HuggingFace identifier of the sentence embedding model.
pub const EMBEDDING_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// HuggingFace download root for the sentence embedding model.
const EMBEDDING_HF_URL: &str =
    "https://huggingface.co/sentence-transformers/all-MiniLM-L6-v2/resolve/main";

/// Remote paths within the HuggingFace repo.
const EMBEDDING_MODEL_FILE: &str = "onnx/model.onnx";
const EMBEDDING_TOKENIZER_FILE: &str = "tokenizer.json";

/// Local file names inside the embedding model directory.
const LOCAL_MODEL_FILE: &str = "model.onnx";
const LOCAL_TOKENIZER_FILE: &str = "tokenizer.json";

/// Returns the default base directory for storing model files.
/// Uses the platform data directory: ~/.local/share/similarity-checker/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("similarity-checker")
        .join("models")
}

/// Subdirectory within the base model dir for the sentence embedding model.
pub fn embedding_model_dir(base: &Path) -> PathBuf {
    base.join("all-MiniLM-L6-v2")
}

/// Check whether both required embedding model files exist.
pub fn embedding_files_present(base: &Path) -> bool {
    let embed_dir = embedding_model_dir(base);
    embed_dir.join(LOCAL_MODEL_FILE).exists() && embed_dir.join(LOCAL_TOKENIZER_FILE).exists()
}

/// Make sure the embedding model is available under `base` and return its
/// directory.
///
/// Missing files are downloaded when `auto_download` is set; otherwise a
/// missing model is an error.
pub async fn ensure_model(base: &Path, auto_download: bool) -> Result<PathBuf> {
    let embed_dir = embedding_model_dir(base);

    if embedding_files_present(base) {
        return Ok(embed_dir);
    }

    if !auto_download {
        anyhow::bail!(
            "Embedding model {EMBEDDING_MODEL_ID} not found in {} and automatic download is disabled",
            embed_dir.display()
        );
    }

    download_model(base).await?;
    Ok(embed_dir)
}

/// Download the embedding model files into `base`.
///
/// Skips files that already exist. Creates directories as needed.
pub async fn download_model(base: &Path) -> Result<()> {
    let embed_dir = embedding_model_dir(base);
    std::fs::create_dir_all(&embed_dir).with_context(|| {
        format!(
            "Failed to create embedding model directory: {}",
            embed_dir.display()
        )
    })?;

    info!(model = EMBEDDING_MODEL_ID, dir = %embed_dir.display(), "Fetching embedding model");

    let client = reqwest::Client::new();

    let tokenizer_path = embed_dir.join(LOCAL_TOKENIZER_FILE);
    if tokenizer_path.exists() {
        info!("Embedding tokenizer already exists, skipping");
    } else {
        download_file(
            &client,
            &format!("{}/{}", EMBEDDING_HF_URL, EMBEDDING_TOKENIZER_FILE),
            &tokenizer_path,
            false,
        )
        .await?;
    }

    let model_path = embed_dir.join(LOCAL_MODEL_FILE);
    if model_path.exists() {
        info!("Embedding model already exists, skipping");
    } else {
        download_file(
            &client,
            &format!("{}/{}", EMBEDDING_HF_URL, EMBEDDING_MODEL_FILE),
            &model_path,
            true,
        )
        .await?;
    }

    Ok(())
}

/// Download a single file from a URL to a local path.
/// If `show_progress` is true, display a progress bar on stderr.
///
/// The body is streamed into a uniquely named temp file next to `dest` and
/// moved into place only once complete. Concurrent first runs each write
/// their own temp file, and a failed download removes its temp file, so
/// `dest` is either absent or whole.
async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
    show_progress: bool,
) -> Result<()> {
    let dir = dest
        .parent()
        .with_context(|| format!("Download target has no parent directory: {}", dest.display()))?;
    let mut staged = NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;

    let mut response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = if show_progress {
        Some(progress_bar(response.content_length())?)
    } else {
        None
    };

    let mut written: u64 = 0;
    while let Some(chunk) = response
        .chunk()
        .await
        .with_context(|| format!("Failed to read response body from {}", url))?
    {
        staged
            .write_all(&chunk)
            .with_context(|| format!("Failed to write {}", staged.path().display()))?;
        written += chunk.len() as u64;
        if let Some(ref pb) = pb {
            pb.set_position(written);
        }
    }

    staged
        .as_file()
        .sync_all()
        .with_context(|| format!("Failed to flush {}", staged.path().display()))?;
    staged
        .persist(dest)
        .with_context(|| format!("Failed to move download into place at {}", dest.display()))?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!(bytes = written, "Downloaded {} to {}", url, dest.display());
    Ok(())
}

/// Bar when the size is known, spinner otherwise. indicatif draws to stderr.
fn progress_bar(total_size: Option<u64>) -> Result<ProgressBar> {
    let pb = match total_size {
        Some(size) => {
            let pb = ProgressBar::new(size);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("  [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                    .context("Invalid progress bar template")?
                    .progress_chars("=> "),
            );
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("  {spinner} {bytes}")
                    .context("Invalid progress spinner template")?,
            );
            pb
        }
    };
    Ok(pb)
}
