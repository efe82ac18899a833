//! Caption application entry point.
//!
//! Orchestrates the complete flow: capture → window → transcribe → print.

use crate::audio::source::AudioSource;
use crate::caption::pipeline::{CaptionHandle, CaptionPipeline, CaptionPipelineConfig};
use crate::caption::sink::TextSink;
use crate::config::Config;
use crate::error::{LivecapError, Result};
use crate::models::download::{find_any_installed_model, is_model_installed, model_path};
use crate::stt::transcriber::Transcriber;
use crate::stt::whisper::{WhisperConfig, WhisperTranscriber};
use std::path::PathBuf;
use std::sync::Arc;

/// Owns at most one running caption pipeline.
///
/// `start` on a running session and `stop` on an idle one are no-ops, so
/// callers can wire both to the same hotkey or signal without bookkeeping.
pub struct CaptionSession {
    config: CaptionPipelineConfig,
    handle: Option<CaptionHandle>,
}

impl CaptionSession {
    pub fn new(config: CaptionPipelineConfig) -> Self {
        Self {
            config,
            handle: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(CaptionHandle::is_running)
    }

    /// Start captioning. Does nothing if already running.
    ///
    /// # Errors
    /// Propagates source start failures; the session stays idle.
    pub fn start(
        &mut self,
        source: Box<dyn AudioSource>,
        transcriber: Arc<dyn Transcriber>,
        sink: Box<dyn TextSink>,
    ) -> Result<()> {
        if self.is_running() {
            return Ok(());
        }

        let pipeline = CaptionPipeline::new(self.config.clone());
        self.handle = Some(pipeline.start(source, transcriber, sink)?);
        Ok(())
    }

    /// Stop captioning and return the sink's finish result. Does nothing if
    /// already idle.
    pub fn stop(&mut self) -> Option<String> {
        self.handle.take().and_then(CaptionHandle::stop)
    }
}

/// Run live captions from an audio device until Ctrl+C.
#[cfg(all(feature = "cpal-audio", feature = "cli"))]
pub async fn run_live_command(
    config: Config,
    quiet: bool,
    verbosity: u8,
    no_download: bool,
) -> Result<()> {
    use crate::audio::capture::{CpalAudioSource, suppress_audio_warnings};

    suppress_audio_warnings();
    config.validate()?;

    if !quiet {
        eprintln!("Loading model '{}'...", config.stt.model);
    }
    let transcriber = create_transcriber(&config, quiet, no_download).await?;

    let source = CpalAudioSource::new(
        config.audio.device.as_deref(),
        config.audio.sample_rate,
        config.audio.channels,
    )?;
    if verbosity >= 1 {
        eprintln!("Capturing from '{}'", source.device_name());
    }
    if !quiet {
        eprintln!("Listening. Ctrl+C to stop.");
    }

    let sink: Box<dyn TextSink> = Box::new(crate::output::ConsoleSink::new());
    let mut session = CaptionSession::new(CaptionPipelineConfig::from_config(&config));
    session.start(Box::new(source), transcriber, sink)?;

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| LivecapError::Other(format!("failed to wait for Ctrl+C: {}", e)))?;

    if !quiet {
        eprintln!("\nShutting down...");
    }
    session.stop();
    Ok(())
}

/// Caption WAV data piped to stdin, printing lines as they are produced.
pub async fn run_pipe_command(config: Config, quiet: bool, no_download: bool) -> Result<()> {
    use crate::audio::wav::WavFrameSource;
    use crate::caption::sink::StdoutSink;

    config.validate()?;

    let transcriber = create_transcriber(&config, quiet, no_download).await?;
    let source = WavFrameSource::from_stdin(config.audio.sample_rate)?;

    let pipeline = CaptionPipeline::new(CaptionPipelineConfig::from_config(&config));
    let handle = pipeline.start(Box::new(source), transcriber, Box::new(StdoutSink::new()))?;

    // Finite source: the pipeline flushes and exits at end of input.
    handle.wait();
    Ok(())
}

/// Create the Whisper engine, downloading the model first if needed.
pub async fn create_transcriber(
    config: &Config,
    quiet: bool,
    no_download: bool,
) -> Result<Arc<dyn Transcriber>> {
    let model = ensure_model(&config.stt.model, quiet, no_download).await?;

    let whisper_config = WhisperConfig {
        model_path: build_model_path(&model)?,
        language: config.stt.language.clone(),
        threads: None,
    };

    Ok(Arc::new(WhisperTranscriber::new(whisper_config)?))
}

/// Make sure a model is on disk, returning the name actually used.
#[cfg(feature = "model-download")]
async fn ensure_model(model: &str, quiet: bool, no_download: bool) -> Result<String> {
    if is_model_installed(model) {
        return Ok(model.to_string());
    }

    if no_download {
        if let Some(fallback) = find_any_installed_model() {
            if !quiet {
                eprintln!(
                    "Model '{}' not installed (--no-download). Using '{}'.",
                    model, fallback
                );
            }
            return Ok(fallback);
        }
        return Err(LivecapError::ModelNotFound {
            path: model_path(model).to_string_lossy().to_string(),
        });
    }

    if !quiet {
        eprintln!("Downloading model '{}'...", model);
    }
    crate::models::download::download_model(model, !quiet).await?;
    Ok(model.to_string())
}

#[cfg(not(feature = "model-download"))]
async fn ensure_model(model: &str, quiet: bool, _no_download: bool) -> Result<String> {
    if is_model_installed(model) {
        return Ok(model.to_string());
    }
    if let Some(fallback) = find_any_installed_model() {
        if !quiet {
            eprintln!("Model '{}' not installed. Using '{}'.", model, fallback);
        }
        return Ok(fallback);
    }
    Err(LivecapError::ModelNotFound {
        path: model_path(model).to_string_lossy().to_string(),
    })
}

/// Resolve a model name or path to the ggml file to load.
///
/// Accepts absolute/relative paths, catalog names (must be installed), and
/// bare filenames looked up under `models/`.
fn build_model_path(model: &str) -> Result<PathBuf> {
    let path = PathBuf::from(model);

    if path.is_absolute() || path.exists() {
        return Ok(path);
    }

    if model.contains('/') || model.contains('\\') {
        return Ok(path);
    }

    if crate::models::catalog::get_model(model).is_some() {
        if is_model_installed(model) {
            return Ok(model_path(model));
        }
        return Err(LivecapError::ModelNotFound {
            path: model_path(model).to_string_lossy().to_string(),
        });
    }

    let filename = if model.ends_with(".bin") {
        model.to_string()
    } else {
        format!("ggml-{}.bin", model)
    };
    Ok(PathBuf::from("models").join(filename))
}
