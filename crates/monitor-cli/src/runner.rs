//! Trace replay through a monitoring session

use crate::trace::{Measurement, TraceRecord};
use alerting::AlarmPort;
use chrono::{DateTime, Utc};
use dms::{DrowsinessStatus, Thresholds};
use serde::Serialize;
use session::{Clock, ManualClock, SessionCommand, SessionError, SessionSummary, SessionSupervisor};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};
use uuid::Uuid;

/// Replay options
#[derive(Debug, Clone, Copy, Default)]
pub struct ReplayOptions {
    /// Sleep between records to reproduce the recorded timing
    pub realtime: bool,
}

/// End-of-session report
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    /// Frames processed, with or without a face
    pub frames: u64,
    pub summary: SessionSummary,
}

/// Run one session over `records`.
///
/// Session time follows the record timestamps. Running out of records while
/// the session is still live counts as a capture failure, as does an explicit
/// `capture_error` record. Setting `interrupted` quits at the next record.
pub async fn replay_session(
    records: &[TraceRecord],
    thresholds: &Thresholds,
    alarm: Box<dyn AlarmPort>,
    options: ReplayOptions,
    interrupted: &AtomicBool,
) -> Result<SessionReport, SessionError> {
    let session_id = Uuid::new_v4();
    let started_at = Utc::now();

    let clock = ManualClock::new();
    if let Some(first) = records.iter().find_map(TraceRecord::time) {
        clock.set(first);
    }
    let mut session = SessionSupervisor::new(thresholds.clone(), alarm, Box::new(clock.clone()))?;
    session.start()?;
    info!(%session_id, "Session started");

    let mut last_status: Option<DrowsinessStatus> = None;

    for record in records {
        if interrupted.load(Ordering::Acquire) {
            session.on_command(SessionCommand::Quit)?;
            break;
        }

        if let Some(t) = record.time() {
            let now = clock.now();
            if t > now {
                if options.realtime {
                    tokio::time::sleep(t - now).await;
                }
                clock.set(t);
            }
        }

        let status = match record {
            TraceRecord::Frame { .. } => {
                let analysis = match record.measurement() {
                    Some(Measurement::Ratio(ratio)) => session.next_frame(Some(ratio))?,
                    Some(Measurement::Distances(distances)) => {
                        session.on_measurement(Some(distances), clock.now())?
                    }
                    None => session.next_frame(None)?,
                };
                Some(analysis.status)
            }
            TraceRecord::NoFace { .. } => Some(session.next_frame(None)?.status),
            TraceRecord::Command { command, .. } => {
                session.on_command(*command)?;
                None
            }
            TraceRecord::CaptureError { reason, .. } => {
                session.capture_failed(reason);
                None
            }
            TraceRecord::NewSession => None,
        };

        if let Some(status) = status {
            if last_status != Some(status) {
                info!("Status: {}", status);
                last_status = Some(status);
            } else {
                debug!("Status: {}", status);
            }
        }

        if !session.is_running() {
            break;
        }
    }

    if session.is_running() {
        session.capture_failed("end of trace");
    }

    let frames = session.frames();
    let summary = session.finish();
    Ok(SessionReport {
        session_id,
        started_at,
        ended_at: Utc::now(),
        frames,
        summary,
    })
}
