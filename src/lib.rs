//! livecap - Live audio captions for the terminal
//!
//! Captures system or microphone audio, transcribes a rolling window on a
//! fixed cadence, and prints deduplicated caption lines.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod caption;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod diagnostics;
pub mod error;
pub mod models;
#[cfg(feature = "cli")]
pub mod output;
pub mod stt;

// Composition root
pub mod app;

// Core traits (source → pipeline → sink)
pub use audio::source::AudioSource;
pub use caption::sink::{CollectorSink, StdoutSink, TextSink};
pub use stt::transcriber::Transcriber;

// Pipeline
pub use caption::pipeline::{CaptionHandle, CaptionPipeline, CaptionPipelineConfig};

// Error handling
pub use error::{LivecapError, Result};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}
