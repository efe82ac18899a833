use anyhow::Result;
use clap::{CommandFactory, Parser};
use livecap::cli::{Cli, Commands, ModelsAction};
use livecap::config::Config;
use livecap::diagnostics::check_dependencies;
use livecap::models::catalog::list_models;
use livecap::models::download::format_model_info;
use std::io::IsTerminal;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => {
            let config = load_config(&cli)?;
            if std::io::stdin().is_terminal() {
                run_live(config, &cli).await?;
            } else {
                // Pipe mode: stdin has WAV data
                livecap::app::run_pipe_command(config, cli.quiet, cli.no_download).await?;
            }
        }
        Some(Commands::Devices) => {
            list_audio_devices()?;
        }
        Some(Commands::Models { action }) => {
            handle_models_command(action).await?;
        }
        Some(Commands::Check) => {
            check_dependencies();
        }
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "livecap", &mut std::io::stdout());
        }
    }

    Ok(())
}

#[cfg(feature = "cpal-audio")]
async fn run_live(config: Config, cli: &Cli) -> Result<()> {
    livecap::app::run_live_command(config, cli.quiet, cli.verbose, cli.no_download).await?;
    Ok(())
}

#[cfg(not(feature = "cpal-audio"))]
async fn run_live(_config: Config, _cli: &Cli) -> Result<()> {
    anyhow::bail!(
        "this binary was built without the `cpal-audio` feature; live capture is unavailable.\n\
         Pipe WAV data on stdin instead: livecap < audio.wav"
    );
}

/// Load configuration and apply CLI overrides.
///
/// Priority order:
/// 1. Command-line flags
/// 2. Custom config path from CLI (--config)
/// 3. Default config path (~/.config/livecap/config.toml)
/// 4. Built-in defaults with environment variable overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = if let Some(path) = cli.config.as_deref() {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())
    }
    .with_env_overrides();

    if let Some(d) = &cli.device {
        config.audio.device = Some(d.clone());
    }
    if let Some(m) = &cli.model {
        config.stt.model = m.clone();
    }
    if let Some(l) = &cli.language {
        config.stt.language = l.clone();
    }
    if let Some(w) = cli.window {
        config.caption.window_seconds = w;
    }
    if let Some(i) = cli.interval {
        config.caption.interval_secs = i;
    }
    if let Some(t) = cli.silence_threshold {
        config.caption.silence_threshold = t;
    }

    config.validate()?;
    Ok(config)
}

/// List available audio input devices.
#[cfg(feature = "cpal-audio")]
fn list_audio_devices() -> Result<()> {
    use livecap::audio::capture::{list_input_devices, suppress_audio_warnings};

    suppress_audio_warnings();
    let devices = list_input_devices()?;

    if devices.is_empty() {
        eprintln!("No audio input devices found");
        std::process::exit(1);
    }

    livecap::output::render_device_list(&devices);
    Ok(())
}

#[cfg(not(feature = "cpal-audio"))]
fn list_audio_devices() -> Result<()> {
    anyhow::bail!("this binary was built without the `cpal-audio` feature")
}

/// Handle model management commands.
async fn handle_models_command(action: ModelsAction) -> Result<()> {
    match action {
        ModelsAction::List => {
            println!("Available models:");
            for model in list_models() {
                println!("  {}", format_model_info(model));
            }
            println!();
            println!("Install with: livecap models install <name>");
        }
        ModelsAction::Install { name } => {
            #[cfg(feature = "model-download")]
            {
                let path = livecap::models::download::download_model(&name, true).await?;
                println!("Model '{}' installed successfully", name);
                println!("Location: {}", path.display());
            }
            #[cfg(not(feature = "model-download"))]
            {
                anyhow::bail!(
                    "this binary was built without the `model-download` feature; \
                     cannot install '{name}'"
                );
            }
        }
    }
    Ok(())
}
