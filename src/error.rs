use thiserror::Error;

/// All errors that can occur in livecap.
#[derive(Error, Debug)]
pub enum LivecapError {
    #[error("Config file not found: {path}")]
    ConfigFileNotFound { path: String },

    #[error("Invalid config value for `{field}`: {message}")]
    ConfigInvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("Audio device not found: {device}")]
    AudioDeviceNotFound { device: String },

    #[error("Audio capture failed: {message}")]
    AudioCapture { message: String },

    #[error("Unsupported audio format: {message}")]
    AudioFormat { message: String },

    #[error("Model file not found: {path}")]
    ModelNotFound { path: String },

    #[error("Model download failed: {message}")]
    ModelDownload { message: String },

    #[error("Transcription failed: {message}")]
    Transcription { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Convenience result type for livecap operations.
pub type Result<T> = std::result::Result<T, LivecapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_not_found_display() {
        let err = LivecapError::ConfigFileNotFound {
            path: "/etc/livecap.toml".to_string(),
        };
        assert_eq!(err.to_string(), "Config file not found: /etc/livecap.toml");
    }

    #[test]
    fn config_invalid_value_display() {
        let err = LivecapError::ConfigInvalidValue {
            field: "window_seconds",
            message: "must be between 5 and 30, got 3".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid config value for `window_seconds`: must be between 5 and 30, got 3"
        );
    }

    #[test]
    fn audio_device_not_found_display() {
        let err = LivecapError::AudioDeviceNotFound {
            device: "hw:3,0".to_string(),
        };
        assert_eq!(err.to_string(), "Audio device not found: hw:3,0");
    }

    #[test]
    fn audio_capture_display() {
        let err = LivecapError::AudioCapture {
            message: "stream closed".to_string(),
        };
        assert_eq!(err.to_string(), "Audio capture failed: stream closed");
    }

    #[test]
    fn audio_format_display() {
        let err = LivecapError::AudioFormat {
            message: "device does not support 16000 Hz / 2 channels".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported audio format: device does not support 16000 Hz / 2 channels"
        );
    }

    #[test]
    fn model_not_found_display() {
        let err = LivecapError::ModelNotFound {
            path: "/home/user/.cache/livecap/models/ggml-base.bin".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Model file not found: /home/user/.cache/livecap/models/ggml-base.bin"
        );
    }

    #[test]
    fn model_download_display() {
        let err = LivecapError::ModelDownload {
            message: "status 503".to_string(),
        };
        assert_eq!(err.to_string(), "Model download failed: status 503");
    }

    #[test]
    fn transcription_display() {
        let err = LivecapError::Transcription {
            message: "inference failed".to_string(),
        };
        assert_eq!(err.to_string(), "Transcription failed: inference failed");
    }

    #[test]
    fn io_error_converts() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LivecapError = io_err.into();
        assert!(matches!(err, LivecapError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn toml_error_converts() {
        let toml_err = toml::from_str::<toml::Value>("not [ valid").unwrap_err();
        let err: LivecapError = toml_err.into();
        assert!(matches!(err, LivecapError::Config(_)));
    }

    #[test]
    fn other_display_is_passthrough() {
        let err = LivecapError::Other("something odd".to_string());
        assert_eq!(err.to_string(), "something odd");
    }

    #[test]
    fn result_alias_works() {
        fn returns_result() -> Result<u32> {
            Ok(42)
        }
        assert_eq!(returns_result().ok(), Some(42));
    }
}
