//! Recorded frame traces
//!
//! One JSON object per line, tagged by `event`:
//!
//! ```text
//! {"event":"frame","t":0.033,"ratio":35.0}
//! {"event":"frame","t":0.066,"vertical":12.0,"horizontal":40.0}
//! {"event":"no_face","t":0.100}
//! {"event":"command","t":0.133,"command":"reset"}
//! {"event":"capture_error","t":0.166,"reason":"device unplugged"}
//! {"event":"new_session"}
//! ```
//!
//! Blank lines and lines starting with `#` are ignored.

use eye_signal::EyeDistances;
use serde::{Deserialize, Serialize};
use session::SessionCommand;
use std::time::Duration;
use thiserror::Error;

/// Trace parsing errors
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("line {line}: frame needs either `ratio` or `vertical` and `horizontal`")]
    MissingMeasurement { line: usize },

    #[error("line {line}: invalid timestamp {t}")]
    InvalidTime { line: usize, t: f64 },
}

/// One trace record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceRecord {
    Frame {
        t: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        ratio: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vertical: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        horizontal: Option<f64>,
    },
    NoFace {
        t: f64,
    },
    Command {
        t: f64,
        command: SessionCommand,
    },
    CaptureError {
        t: f64,
        reason: String,
    },
    NewSession,
}

/// Face measurement carried by a frame record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Measurement {
    Ratio(f64),
    Distances(EyeDistances),
}

impl TraceRecord {
    /// Record timestamp, if it has one
    pub fn time(&self) -> Option<Duration> {
        let t = match self {
            Self::Frame { t, .. }
            | Self::NoFace { t }
            | Self::Command { t, .. }
            | Self::CaptureError { t, .. } => *t,
            Self::NewSession => return None,
        };
        Duration::try_from_secs_f64(t).ok()
    }

    fn validate(&self, line: usize) -> Result<(), TraceError> {
        match self {
            Self::Frame { t, .. }
            | Self::NoFace { t }
            | Self::Command { t, .. }
            | Self::CaptureError { t, .. } => {
                if !t.is_finite() || *t < 0.0 {
                    return Err(TraceError::InvalidTime { line, t: *t });
                }
            }
            Self::NewSession => {}
        }
        if let Self::Frame { .. } = self {
            if self.measurement().is_none() {
                return Err(TraceError::MissingMeasurement { line });
            }
        }
        Ok(())
    }

    /// Measurement of a frame record; a ratio wins over distances
    pub fn measurement(&self) -> Option<Measurement> {
        match self {
            Self::Frame {
                ratio: Some(ratio), ..
            } => Some(Measurement::Ratio(*ratio)),
            Self::Frame {
                vertical: Some(vertical),
                horizontal: Some(horizontal),
                ..
            } => Some(Measurement::Distances(EyeDistances::new(*vertical, *horizontal))),
            _ => None,
        }
    }
}

/// Parse a trace into sessions, split at `new_session` records.
///
/// Empty sessions are dropped.
pub fn parse_sessions(text: &str) -> Result<Vec<Vec<TraceRecord>>, TraceError> {
    let mut sessions = Vec::new();
    let mut current = Vec::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let raw = raw.trim();
        if raw.is_empty() || raw.starts_with('#') {
            continue;
        }

        let record: TraceRecord =
            serde_json::from_str(raw).map_err(|source| TraceError::Parse { line, source })?;
        record.validate(line)?;

        if record == TraceRecord::NewSession {
            if !current.is_empty() {
                sessions.push(std::mem::take(&mut current));
            }
        } else {
            current.push(record);
        }
    }

    if !current.is_empty() {
        sessions.push(current);
    }
    Ok(sessions)
}
