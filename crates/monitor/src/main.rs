//! Drowsiness Monitor - Main Entry Point

use anyhow::Context;
use camera_capture::SyntheticCamera;
use clap::Parser;
use dms::ReplayLandmarks;
use monitor::{init_logging, run, Devices, QuitFlag, Settings};
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(
    name = "drowsiness-monitor",
    version,
    about = "Driver drowsiness monitor with haptic alerts"
)]
struct Cli {
    /// Configuration file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON-lines landmark recording to replay
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Override the log level
    #[arg(long)]
    log_level: Option<String>,

    /// Log as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        settings.logging.level = level;
    }
    if cli.json_logs {
        settings.logging.json = true;
    }
    if let Some(replay) = cli.replay {
        settings.monitor.replay = Some(replay);
    }
    settings.validate()?;
    init_logging(&settings.logging)?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let replay_path = settings
        .monitor
        .replay
        .clone()
        .context("no landmark source configured; pass --replay <recording.jsonl>")?;
    let landmarks = ReplayLandmarks::open(&replay_path)
        .with_context(|| format!("failed to load {}", replay_path.display()))?;
    info!("Replaying {} frames from {}", landmarks.len(), replay_path.display());

    let mut camera_config = settings.camera.clone();
    if camera_config.frame_limit.is_none() {
        camera_config.frame_limit = Some(u32::try_from(landmarks.len()).unwrap_or(u32::MAX));
    }

    let quit = QuitFlag::new();
    let on_ctrl_c = quit.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Ctrl-C received, stopping");
                on_ctrl_c.trigger();
            }
            Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
        }
    });

    let devices = Devices {
        camera: SyntheticCamera::new(camera_config),
        landmarks,
        audio: alerting::TracingAudio::new(),
        haptics: haptics::TracingHaptics::new(),
    };

    let summary = tokio::task::spawn_blocking(move || run(&settings, devices, &quit))
        .await
        .context("perception task panicked")??;

    summary.log();
    if let Some(e) = &summary.actuator_error {
        warn!("Actuator error during session: {}", e);
    }

    Ok(())
}
