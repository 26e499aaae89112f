// Model download helper for the local toxicity scorer.
//
// Fetches Detoxify unbiased-toxic-roberta (ONNX export, ~126MB) and its
// tokenizer from HuggingFace into a platform data directory
// (~/.local/share/respectrewrite/models/ on Linux) so they persist across runs.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

const TOXICITY_HF_URL: &str =
    "https://huggingface.co/protectai/unbiased-toxic-roberta-onnx/resolve/main";

pub const TOXICITY_MODEL_FILE: &str = "model_quantized.onnx";
pub const TOXICITY_TOKENIZER_FILE: &str = "tokenizer.json";

pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("respectrewrite")
        .join("models")
}

/// Check whether both required toxicity model files exist.
pub fn model_files_present(dir: &Path) -> bool {
    dir.join(TOXICITY_MODEL_FILE).exists() && dir.join(TOXICITY_TOKENIZER_FILE).exists()
}

/// Download the toxicity model and tokenizer, skipping files already present.
pub async fn download_model(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create model directory: {}", dir.display()))?;

    for (file, large) in [(TOXICITY_TOKENIZER_FILE, false), (TOXICITY_MODEL_FILE, true)] {
        let dest = dir.join(file);
        if dest.exists() {
            info!(file, "Model file already exists, skipping");
            println!("  {file} (already exists)");
            continue;
        }
        println!("  Downloading {file}...");
        download_file(&format!("{TOXICITY_HF_URL}/{file}"), &dest, large).await?;
    }

    Ok(())
}

/// Download a single file, with a progress bar when `show_progress` is set.
async fn download_file(url: &str, dest: &Path, show_progress: bool) -> Result<()> {
    let mut response = reqwest::Client::new()
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to download {}", url))?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed with status {}: {}", response.status(), url);
    }

    let pb = if show_progress {
        Some(progress_bar(response.content_length()))
    } else {
        None
    };

    let mut bytes = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
    while let Some(chunk) = response
        .chunk()
        .await
        .context("Failed to read response body")?
    {
        bytes.extend_from_slice(&chunk);
        if let Some(ref pb) = pb {
            pb.set_position(bytes.len() as u64);
        }
    }

    write_atomically(dest, &bytes)?;

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    info!("Downloaded {} to {}", url, dest.display());
    Ok(())
}

/// Sibling path a download is staged in before it is renamed into place.
fn partial_path(dest: &Path) -> PathBuf {
    let mut name = dest.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    dest.with_file_name(name)
}

/// Write `bytes` to a `.part` file, then rename it over `dest`.
///
/// An interrupted write never leaves a truncated file at `dest`, so
/// `model_files_present` only sees complete downloads.
fn write_atomically(dest: &Path, bytes: &[u8]) -> Result<()> {
    let partial = partial_path(dest);
    std::fs::write(&partial, bytes)
        .with_context(|| format!("Failed to write {}", partial.display()))?;
    std::fs::rename(&partial, dest)
        .with_context(|| format!("Failed to move {} into place", dest.display()))?;
    Ok(())
}

fn progress_bar(total: Option<u64>) -> ProgressBar {
    match total {
        Some(size) => {
            let pb = ProgressBar::new(size);
            if let Ok(style) =
                ProgressStyle::default_bar().template("    [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
            {
                pb.set_style(style.progress_chars("=> "));
            }
            pb
        }
        None => {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::default_spinner().template("    {spinner} {bytes}") {
                pb.set_style(style);
            }
            pb
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_dir_is_namespaced() {
        let dir = default_model_dir();
        assert!(dir.ends_with("respectrewrite/models"), "got {}", dir.display());
    }

    #[test]
    fn test_model_files_present_false_when_empty() {
        let dir = std::env::temp_dir().join("respectrewrite-test-nonexistent");
        assert!(!model_files_present(&dir));
    }

    #[test]
    fn test_model_files_present_true_when_files_exist() {
        let dir = std::env::temp_dir().join("respectrewrite-model-present-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(TOXICITY_MODEL_FILE), b"fake").unwrap();
        std::fs::write(dir.join(TOXICITY_TOKENIZER_FILE), b"fake").unwrap();

        assert!(model_files_present(&dir));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_partial_path_is_sibling_with_suffix() {
        let dest = Path::new("/models/model_quantized.onnx");
        assert_eq!(
            partial_path(dest),
            PathBuf::from("/models/model_quantized.onnx.part")
        );
    }

    #[test]
    fn test_write_atomically_leaves_no_partial_file() {
        let dir = std::env::temp_dir().join("respectrewrite-atomic-write-test");
        std::fs::create_dir_all(&dir).unwrap();
        let dest = dir.join(TOXICITY_TOKENIZER_FILE);

        write_atomically(&dest, b"{}").unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"{}");
        assert!(!partial_path(&dest).exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_partial_files_do_not_count_as_present() {
        let dir = std::env::temp_dir().join("respectrewrite-partial-download-test");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(partial_path(&dir.join(TOXICITY_MODEL_FILE)), b"trunc").unwrap();
        std::fs::write(partial_path(&dir.join(TOXICITY_TOKENIZER_FILE)), b"trunc").unwrap();

        assert!(!model_files_present(&dir));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
