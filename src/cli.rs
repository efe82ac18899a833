//! Command-line interface for livecap
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Live audio captions in the terminal
#[derive(Parser, Debug)]
#[command(name = "livecap", version, about = "Live audio captions in the terminal")]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (captions only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: device + model info, -vv: full diagnostics)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Audio input device (index from `livecap devices`, or a name substring)
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Whisper model (default: base). Use base.en for English-only audio
    #[arg(long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Language code for transcription. Examples: en, de, es, auto
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,

    /// Rolling window length (default: 5s). Examples: 5s, 10s, 30
    #[arg(long, short = 'w', value_name = "DURATION", value_parser = parse_window_secs)]
    pub window: Option<u32>,

    /// Transcription cadence (default: 3s). Examples: 1s, 2s500ms, 1.5
    #[arg(long, short = 'i', value_name = "DURATION", value_parser = parse_interval_secs)]
    pub interval: Option<f32>,

    /// Peak amplitude below which a window is skipped as silence
    #[arg(long, value_name = "LEVEL")]
    pub silence_threshold: Option<f32>,

    /// Prevent automatic model download if the configured model is missing
    #[arg(long)]
    pub no_download: bool,
}

/// Parse a window duration into whole seconds.
///
/// Accepts bare numbers (seconds) and anything `humantime` understands
/// (`10s`, `1m`, `1m30s`).
fn parse_window_secs(s: &str) -> Result<u32, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<u32>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs() as u32)
        .map_err(|e| e.to_string())
}

/// Parse a cadence duration into fractional seconds.
///
/// Accepts bare numbers (`1.5` seconds) and `humantime` formats (`2s500ms`).
fn parse_interval_secs(s: &str) -> Result<f32, String> {
    let s = s.trim();
    if let Ok(secs) = s.parse::<f32>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs_f32())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List available audio input devices
    Devices,

    /// Manage Whisper models
    Models {
        /// Action to perform
        #[command(subcommand)]
        action: ModelsAction,
    },

    /// Check models, devices, and GPU backend
    Check,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

/// Model management actions
#[derive(Subcommand, Debug)]
pub enum ModelsAction {
    /// List available models
    List,
    /// Download and install a model
    Install {
        /// Model name (e.g., base.en, small.en, tiny)
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_default_command() {
        let cli = Cli::try_parse_from(["livecap"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.device.is_none());
        assert!(cli.model.is_none());
        assert!(cli.language.is_none());
        assert!(cli.window.is_none());
        assert!(cli.interval.is_none());
        assert!(cli.silence_threshold.is_none());
        assert!(!cli.no_download);
        assert!(!cli.quiet);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn parse_verbose_levels() {
        assert_eq!(Cli::try_parse_from(["livecap", "-v"]).unwrap().verbose, 1);
        assert_eq!(Cli::try_parse_from(["livecap", "-vv"]).unwrap().verbose, 2);
        assert_eq!(
            Cli::try_parse_from(["livecap", "-v", "-v"]).unwrap().verbose,
            2
        );
    }

    #[test]
    fn parse_with_options() {
        let cli = Cli::try_parse_from([
            "livecap",
            "--device",
            "monitor",
            "--model",
            "base.en",
            "--language",
            "en",
        ])
        .unwrap();

        assert_eq!(cli.device.as_deref(), Some("monitor"));
        assert_eq!(cli.model.as_deref(), Some("base.en"));
        assert_eq!(cli.language.as_deref(), Some("en"));
    }

    #[test]
    fn parse_devices_command() {
        let cli = Cli::try_parse_from(["livecap", "devices"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Devices)));
    }

    #[test]
    fn parse_check_command() {
        let cli = Cli::try_parse_from(["livecap", "check"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Check)));
    }

    #[test]
    fn parse_global_config() {
        let cli = Cli::try_parse_from(["livecap", "--config", "/path/to/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/path/to/config.toml")));
    }

    #[test]
    fn global_options_work_after_command() {
        let cli =
            Cli::try_parse_from(["livecap", "devices", "--config", "/tmp/config.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/config.toml")));
    }

    #[test]
    fn parse_quiet_flags() {
        assert!(Cli::try_parse_from(["livecap", "-q"]).unwrap().quiet);
        assert!(
            Cli::try_parse_from(["livecap", "--quiet", "devices"])
                .unwrap()
                .quiet
        );
    }

    #[test]
    fn invalid_command_returns_error() {
        let err = Cli::try_parse_from(["livecap", "invalid"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn parse_models_list() {
        let cli = Cli::try_parse_from(["livecap", "models", "list"]).unwrap();
        match cli.command {
            Some(Commands::Models { action }) => assert!(matches!(action, ModelsAction::List)),
            _ => panic!("Expected Models command"),
        }
    }

    #[test]
    fn parse_models_install() {
        let cli = Cli::try_parse_from(["livecap", "models", "install", "base.en"]).unwrap();
        match cli.command {
            Some(Commands::Models {
                action: ModelsAction::Install { name },
            }) => assert_eq!(name, "base.en"),
            _ => panic!("Expected Models install command"),
        }
    }

    #[test]
    fn models_requires_subcommand() {
        let err = Cli::try_parse_from(["livecap", "models"]).unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand
        );
    }

    #[test]
    fn models_install_requires_name() {
        let err = Cli::try_parse_from(["livecap", "models", "install"]).unwrap_err();
        let msg = err.to_string();
        assert!(
            msg.contains("required") || msg.contains("name"),
            "Expected missing required argument error, got: {msg}"
        );
    }

    #[test]
    fn parse_no_download() {
        let cli = Cli::try_parse_from(["livecap", "--no-download"]).unwrap();
        assert!(cli.no_download);
    }

    #[test]
    fn parse_window_secs_formats() {
        assert_eq!(parse_window_secs("10").unwrap(), 10);
        assert_eq!(parse_window_secs("10s").unwrap(), 10);
        assert_eq!(parse_window_secs("1m").unwrap(), 60);
        assert_eq!(parse_window_secs("1m30s").unwrap(), 90);
    }

    #[test]
    fn parse_window_secs_invalid() {
        assert!(parse_window_secs("abc").is_err());
        assert!(parse_window_secs("10x").is_err());
        assert!(parse_window_secs("").is_err());
    }

    #[test]
    fn parse_interval_secs_formats() {
        assert_eq!(parse_interval_secs("1").unwrap(), 1.0);
        assert_eq!(parse_interval_secs("1.5").unwrap(), 1.5);
        assert_eq!(parse_interval_secs("2s").unwrap(), 2.0);
        assert_eq!(parse_interval_secs("2s500ms").unwrap(), 2.5);
    }

    #[test]
    fn parse_interval_secs_invalid() {
        assert!(parse_interval_secs("abc").is_err());
        assert!(parse_interval_secs("5x").is_err());
    }

    #[test]
    fn window_flag_accepts_durations() {
        let cli = Cli::try_parse_from(["livecap", "--window", "10s"]).unwrap();
        assert_eq!(cli.window, Some(10));
        let cli = Cli::try_parse_from(["livecap", "-w", "30"]).unwrap();
        assert_eq!(cli.window, Some(30));
    }

    #[test]
    fn interval_flag_accepts_durations() {
        let cli = Cli::try_parse_from(["livecap", "--interval", "2s500ms"]).unwrap();
        assert_eq!(cli.interval, Some(2.5));
        let cli = Cli::try_parse_from(["livecap", "-i", "1.5"]).unwrap();
        assert_eq!(cli.interval, Some(1.5));
    }

    #[test]
    fn silence_threshold_flag() {
        let cli = Cli::try_parse_from(["livecap", "--silence-threshold", "0.02"]).unwrap();
        assert_eq!(cli.silence_threshold, Some(0.02));
    }

    #[test]
    fn help_and_version_flags_are_recognized() {
        let err = Cli::try_parse_from(["livecap", "--help"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
        let err = Cli::try_parse_from(["livecap", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn parse_completions() {
        let cli = Cli::try_parse_from(["livecap", "completions", "bash"]).unwrap();
        match cli.command {
            Some(Commands::Completions { shell }) => assert_eq!(shell, Shell::Bash),
            _ => panic!("Expected Completions command"),
        }
    }
}
