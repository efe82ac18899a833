use crate::defaults;
use crate::error::{LivecapError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub caption: CaptionConfig,
    pub stt: SttConfig,
}

/// Audio capture configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// Device index (numeric string) or name substring; None picks the
    /// best default input device.
    pub device: Option<String>,
    pub sample_rate: u32,
    pub channels: u16,
}

/// Windowing and cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptionConfig {
    pub window_seconds: u32,
    pub interval_secs: f32,
    pub silence_threshold: f32,
}

/// Speech-to-text configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SttConfig {
    pub model: String,
    pub language: String,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device: None,
            sample_rate: defaults::SAMPLE_RATE,
            channels: defaults::CHANNEL_COUNT,
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            window_seconds: defaults::WINDOW_SECONDS,
            interval_secs: defaults::TRANSCRIBE_INTERVAL_SECS,
            silence_threshold: defaults::SILENCE_THRESHOLD,
        }
    }
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: defaults::DEFAULT_MODEL.to_string(),
            language: defaults::DEFAULT_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    // Re-panic on invalid TOML or other errors
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - LIVECAP_MODEL → stt.model
    /// - LIVECAP_LANGUAGE → stt.language
    /// - LIVECAP_AUDIO_DEVICE → audio.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(model) = std::env::var("LIVECAP_MODEL")
            && !model.is_empty()
        {
            self.stt.model = model;
        }

        if let Ok(language) = std::env::var("LIVECAP_LANGUAGE")
            && !language.is_empty()
        {
            self.stt.language = language;
        }

        if let Ok(device) = std::env::var("LIVECAP_AUDIO_DEVICE")
            && !device.is_empty()
        {
            self.audio.device = Some(device);
        }

        self
    }

    /// Check every value against its allowed range.
    ///
    /// Called once at startup; an out-of-range value is a hard error rather
    /// than something to clamp silently.
    pub fn validate(&self) -> Result<()> {
        if self.audio.sample_rate == 0 {
            return Err(LivecapError::ConfigInvalidValue {
                field: "audio.sample_rate",
                message: "must be non-zero".to_string(),
            });
        }
        if !(1..=2).contains(&self.audio.channels) {
            return Err(LivecapError::ConfigInvalidValue {
                field: "audio.channels",
                message: format!("must be 1 or 2, got {}", self.audio.channels),
            });
        }
        let window_range = defaults::MIN_WINDOW_SECONDS..=defaults::MAX_WINDOW_SECONDS;
        if !window_range.contains(&self.caption.window_seconds) {
            return Err(LivecapError::ConfigInvalidValue {
                field: "caption.window_seconds",
                message: format!(
                    "must be between {} and {}, got {}",
                    defaults::MIN_WINDOW_SECONDS,
                    defaults::MAX_WINDOW_SECONDS,
                    self.caption.window_seconds
                ),
            });
        }
        if self.caption.interval_secs < defaults::MIN_TRANSCRIBE_INTERVAL_SECS
            || self.caption.interval_secs > defaults::MAX_TRANSCRIBE_INTERVAL_SECS
        {
            return Err(LivecapError::ConfigInvalidValue {
                field: "caption.interval_secs",
                message: format!(
                    "must be between {} and {}, got {}",
                    defaults::MIN_TRANSCRIBE_INTERVAL_SECS,
                    defaults::MAX_TRANSCRIBE_INTERVAL_SECS,
                    self.caption.interval_secs
                ),
            });
        }
        if !self.caption.silence_threshold.is_finite() || self.caption.silence_threshold < 0.0 {
            return Err(LivecapError::ConfigInvalidValue {
                field: "caption.silence_threshold",
                message: format!(
                    "must be a non-negative number, got {}",
                    self.caption.silence_threshold
                ),
            });
        }
        if self.stt.model.is_empty() {
            return Err(LivecapError::ConfigInvalidValue {
                field: "stt.model",
                message: "must not be empty".to_string(),
            });
        }
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/livecap/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("livecap")
            .join("config.toml")
    }
}
