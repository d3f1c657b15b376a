//! Drowsiness Monitor CLI
//!
//! Replays recorded eye-openness traces through monitoring sessions and
//! reports a summary per session.

pub mod alarm;
pub mod runner;
pub mod settings;
pub mod trace;

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// Initialize logging
pub fn init_logging(
    format: LogFormat,
    verbose: bool,
) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    }
}
