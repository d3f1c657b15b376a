//! Drowsiness Monitor - Main Entry Point

use anyhow::{Context, Result};
use clap::Parser;
use monitor_cli::alarm::AlarmChoice;
use monitor_cli::runner::{replay_session, ReplayOptions};
use monitor_cli::settings::{Preset, Settings};
use monitor_cli::trace::parse_sessions;
use monitor_cli::{init_logging, LogFormat};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines frame trace to replay
    #[arg(short, long)]
    trace: PathBuf,

    /// Settings file (TOML, YAML, JSON, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Threshold preset applied before the settings file
    #[arg(long, value_enum, default_value = "standard")]
    preset: Preset,

    /// Alarm sound asset; overrides the settings file
    #[arg(long)]
    alarm_sound: Option<PathBuf>,

    /// Replay at the recorded pace instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// Log and report format
    #[arg(long, value_enum, default_value = "text")]
    log_format: LogFormat,

    /// Enable debug output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_format, args.verbose).context("initializing logging")?;

    info!("=== Drowsiness Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let settings =
        Settings::load(args.config.as_deref(), args.preset).context("loading settings")?;
    settings
        .thresholds
        .validate()
        .context("validating thresholds")?;

    let sound = args.alarm_sound.or(settings.alarm_sound);
    let alarm = AlarmChoice::select(sound.as_deref());

    let text = tokio::fs::read_to_string(&args.trace)
        .await
        .with_context(|| format!("reading trace {}", args.trace.display()))?;
    let sessions = parse_sessions(&text).context("parsing trace")?;
    if sessions.is_empty() {
        warn!("Trace {} contains no records", args.trace.display());
        return Ok(());
    }

    let interrupted = Arc::new(AtomicBool::new(false));
    {
        let interrupted = Arc::clone(&interrupted);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Interrupted, quitting session");
                interrupted.store(true, Ordering::Release);
            }
        });
    }

    let options = ReplayOptions {
        realtime: args.realtime,
    };

    for records in &sessions {
        let report = replay_session(
            records,
            &settings.thresholds,
            alarm.port(),
            options,
            &interrupted,
        )
        .await?;

        match args.log_format {
            LogFormat::Text => println!("{}", report.summary.message()),
            LogFormat::Json => println!("{}", serde_json::to_string(&report)?),
        }

        if interrupted.load(Ordering::Acquire) {
            break;
        }
    }

    Ok(())
}
