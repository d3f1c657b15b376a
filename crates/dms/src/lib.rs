//! Driver Monitoring System (DMS)
//!
//! Frame-level drowsiness analysis on top of the eye-openness signal:
//! - Threshold configuration
//! - Debounced blink detection
//! - Prolonged-closure tracking
//! - Priority-ordered drowsiness status

pub mod analysis;
pub mod blink;
pub mod classifier;
pub mod config;
pub mod state;

pub use analysis::FrameAnalysis;
pub use blink::{BlinkDetector, BlinkEvent};
pub use classifier::DrowsinessClassifier;
pub use config::Thresholds;
pub use state::{DrowsinessStatus, FrameState};

use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid thresholds: {0}")]
    Invalid(String),
}
