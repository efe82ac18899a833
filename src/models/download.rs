//! Model storage and installation.
//!
//! Models live in `~/.cache/livecap/models/` as `ggml-<name>.bin`. The
//! download path streams from HuggingFace and verifies the SHA-1 checksum
//! from the catalog.

#[cfg(feature = "model-download")]
use crate::error::{LivecapError, Result};
use crate::models::catalog::{self, ModelInfo};
use std::fs;
use std::path::PathBuf;

#[cfg(feature = "model-download")]
use futures_util::StreamExt;
#[cfg(feature = "model-download")]
use indicatif::{ProgressBar, ProgressStyle};
#[cfg(feature = "model-download")]
use sha1::{Digest, Sha1};
#[cfg(feature = "model-download")]
use std::io::Write;

/// Directory where models are stored (`~/.cache/livecap/models/`).
pub fn models_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("livecap")
        .join("models")
}

/// Full path for a model file, whether or not it exists on disk.
pub fn model_path(name: &str) -> PathBuf {
    let resolved = catalog::resolve_name(name);
    models_dir().join(format!("ggml-{resolved}.bin"))
}

pub fn is_model_installed(name: &str) -> bool {
    model_path(name).exists()
}

/// Download a model from the catalog.
///
/// A no-op when the model is already installed.
///
/// # Errors
/// Fails when the model is not in the catalog, the transfer fails, or the
/// checksum does not match (the corrupt file is removed).
#[cfg(feature = "model-download")]
pub async fn download_model(name: &str, progress: bool) -> Result<PathBuf> {
    let path = model_path(name);
    if path.exists() {
        return Ok(path);
    }

    let info = catalog::get_model(name).ok_or_else(|| {
        LivecapError::ModelDownload {
            message: format!(
                "model '{name}' is not in the catalog; run 'livecap models list' to see available models"
            ),
        }
    })?;

    download_to_path(info, &path, progress).await?;
    Ok(path)
}

#[cfg(feature = "model-download")]
async fn download_to_path(info: &ModelInfo, output_path: &std::path::Path, progress: bool) -> Result<()> {
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    if progress {
        eprintln!("Downloading {} ({} MB)...", info.name, info.size_mb);
    }

    let response = reqwest::Client::new()
        .get(info.url())
        .send()
        .await
        .map_err(|e| LivecapError::ModelDownload {
            message: format!("failed to start download: {e}"),
        })?;

    if !response.status().is_success() {
        return Err(LivecapError::ModelDownload {
            message: format!("download failed with status: {}", response.status()),
        });
    }

    let total_size = response.content_length().unwrap_or(0);
    let pb = if progress {
        let pb = ProgressBar::new(total_size);
        pb.set_style(
            // SAFETY: hardcoded template string, always valid
            #[allow(clippy::expect_used)]
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
                .expect("hardcoded progress bar template")
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut hasher = Sha1::new();
    let mut stream = response.bytes_stream();
    let mut file = fs::File::create(output_path)?;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| LivecapError::ModelDownload {
            message: format!("failed to read download chunk: {e}"),
        })?;
        file.write_all(&chunk)?;
        hasher.update(&chunk);
        if let Some(ref pb) = pb {
            pb.inc(chunk.len() as u64);
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Downloaded");
    }

    let calculated = format!("{:x}", hasher.finalize());
    if calculated != info.sha1 {
        if let Err(e) = fs::remove_file(output_path) {
            eprintln!("livecap: failed to remove corrupted download: {e}");
        }
        return Err(LivecapError::ModelDownload {
            message: format!(
                "SHA-1 checksum mismatch for {}: expected {}, got {}",
                info.name, info.sha1, calculated
            ),
        });
    }

    if progress {
        eprintln!("Model installed to: {}", output_path.display());
    }

    Ok(())
}

/// First catalog model that is installed, if any.
pub fn find_any_installed_model() -> Option<String> {
    catalog::list_models()
        .iter()
        .find(|m| is_model_installed(m.name))
        .map(|m| m.name.to_string())
}

/// Installed model names, discovered by scanning the models directory for
/// `ggml-*.bin` files. Includes models not in the catalog.
pub fn list_installed_models() -> Vec<String> {
    let dir = models_dir();
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut names: Vec<String> = entries
        .filter_map(|entry| {
            let entry = entry.ok()?;
            let name = entry.file_name();
            let name = name.to_str()?;
            let model = name.strip_prefix("ggml-")?.strip_suffix(".bin")?;
            if entry.path().is_file() {
                Some(model.to_string())
            } else {
                None
            }
        })
        .collect();

    names.sort();
    names
}

/// One line of `livecap models list` output.
pub fn format_model_info(model: &ModelInfo) -> String {
    let status = if is_model_installed(model.name) {
        "[installed]"
    } else {
        "[not installed]"
    };
    format!("{:16} {:5} MB   {}", model.name, model.size_mb, status)
}
