//! Monitoring Session
//!
//! Wraps the per-frame pipeline (smoothing, openness, blinks, status, alarm)
//! into one bounded session with a start time, external commands, and an
//! end-of-session summary.

pub mod clock;
pub mod command;
pub mod summary;
pub mod supervisor;

pub use clock::{Clock, ManualClock};
pub use command::SessionCommand;
pub use summary::{SessionSummary, SummaryCategory};
pub use supervisor::{EndReason, SessionPhase, SessionState, SessionSupervisor};

use thiserror::Error;

/// Session error types
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Session is not running ({0})")]
    NotRunning(SessionPhase),

    #[error("Session already started")]
    AlreadyStarted,

    #[error(transparent)]
    Config(#[from] dms::ConfigError),

    #[error("Invalid eye measurement: {0}")]
    Measurement(#[from] eye_signal::SignalError),
}
