//! `rust_seismo`: live seismograph in the terminal.
//!
//! ```bash
//! cargo run -- --mode axes --sensitivity 2
//! RUST_LOG=rust_seismo=debug cargo run -- --duration 10
//! ```

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use rust_seismo::{
    app_actor::{spawn_session, SessionHandle},
    config::{Settings, DEFAULT_CONFIG_PATH},
    core::DisplayMode,
    instrument::create_sensor,
    logging,
    render::TerminalRenderer,
    session::{SeismographSession, SessionOptions},
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Scrolling accelerometer waveforms.
#[derive(Parser, Debug)]
#[command(name = "rust_seismo", version, about)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Display mode: "magnitude" or "axes"
    #[arg(long, value_parser = parse_mode)]
    mode: Option<DisplayMode>,

    /// Sensitivity gain (> 0)
    #[arg(long)]
    sensitivity: Option<f64>,

    /// Logical canvas width in pixels
    #[arg(long)]
    width: Option<f64>,

    /// Logical canvas height in pixels
    #[arg(long)]
    height: Option<f64>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration: Option<f64>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,
}

fn parse_mode(name: &str) -> Result<DisplayMode, String> {
    DisplayMode::from_name(name).ok_or_else(|| format!("unknown mode '{}'", name))
}

impl Cli {
    fn apply(&self, settings: &mut Settings) {
        if let Some(mode) = self.mode {
            settings.display.mode = mode;
        }
        if let Some(sensitivity) = self.sensitivity {
            settings.display.sensitivity = sensitivity;
        }
        if let Some(width) = self.width {
            settings.display.width = width;
        }
        if let Some(height) = self.height {
            settings.display.height = height;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = Settings::load_from(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    cli.apply(&mut settings);
    settings.validate()?;

    if cli.print_config {
        print!("{}", settings.to_toml()?);
        return Ok(());
    }

    logging::init_from_config(&settings);
    info!(
        app = %settings.application.name,
        sensor = %settings.sensor.kind,
        mode = %settings.display.mode,
        "Starting seismograph"
    );

    if let Some(secs) = cli.duration {
        if !(secs.is_finite() && secs >= 0.0) {
            return Err(anyhow!("Invalid duration {}", secs));
        }
    }

    let sensor = create_sensor(&settings.sensor)?;
    let renderer = TerminalRenderer::stdout()?
        .with_min_repaint(Duration::from_millis(settings.display.repaint_interval_ms));

    let options = SessionOptions::from_settings(&settings);
    let session = SeismographSession::new(sensor, renderer, options);
    let (handle, task) = spawn_session(session, &settings.runtime);

    let run_result = run(&handle, cli.duration).await;
    let status = handle.status().await;
    handle.shutdown().await?;
    let mut session = task.await.context("Session actor panicked")?;
    session.surface_mut().restore()?;
    run_result?;

    if let Ok(status) = status {
        info!(
            samples = status.samples_accepted,
            capacity = status.capacity,
            "Seismograph stopped"
        );
    }
    Ok(())
}

/// Start the session and wait for Ctrl-C or the run duration.
async fn run(handle: &SessionHandle, duration: Option<f64>) -> Result<()> {
    if !handle.start().await? {
        warn!("Session did not start; showing status only");
    }

    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .context("Failed to listen for Ctrl-C")
    };

    match duration {
        Some(secs) => {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs_f64(secs)) => {
                    info!(secs, "Run duration elapsed");
                }
                res = ctrl_c => {
                    res?;
                    info!("Interrupted");
                }
            }
        }
        None => {
            ctrl_c.await?;
            info!("Interrupted");
        }
    }
    Ok(())
}
