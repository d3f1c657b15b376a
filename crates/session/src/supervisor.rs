//! Session supervisor: one bounded monitoring run

use crate::clock::Clock;
use crate::command::SessionCommand;
use crate::summary::{SessionSummary, SummaryCategory};
use crate::SessionError;
use alerting::{AlarmCommand, AlarmConfig, AlarmController, AlarmPort};
use dms::{
    BlinkDetector, DrowsinessClassifier, DrowsinessStatus, FrameAnalysis, FrameState, Thresholds,
};
use eye_signal::{EyeDistances, OpennessClassifier, OpennessZone, SignalSmoother, SlidingWindow};
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{error, info};

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EndReason {
    /// Monitoring time elapsed
    Timeout,
    /// Critical blink count reached
    Critical,
    /// Quit command received
    Quit,
    /// Camera could not be opened or read
    CaptureFailure,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Critical => "critical",
            Self::Quit => "quit",
            Self::CaptureFailure => "capture-failure",
        }
    }
}

impl fmt::Display for EndReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Created,
    Running,
    Ended(EndReason),
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => f.write_str("created"),
            Self::Running => f.write_str("running"),
            Self::Ended(reason) => write!(f, "ended: {reason}"),
        }
    }
}

/// Snapshot of the session-scoped counters and alarm flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub blink_count: u32,
    pub session_start: Duration,
    pub drowsy_warning_given: bool,
    pub last_blink_time: Duration,
    pub alarm_active: bool,
    pub last_alarm_time: Option<Duration>,
}

/// Drives one monitoring session through the frame pipeline.
///
/// Single-threaded and frame-driven: every input produces one state update.
/// Timeouts are evaluated when a frame arrives, so their precision is bounded
/// by the frame rate.
pub struct SessionSupervisor {
    thresholds: Thresholds,
    clock: Box<dyn Clock>,
    smoother: SignalSmoother,
    openness: OpennessClassifier,
    detector: BlinkDetector,
    classifier: DrowsinessClassifier,
    alarm: AlarmController,
    phase: SessionPhase,
    frame: FrameState,
    history: SlidingWindow<u8>,
    blink_count: u32,
    session_start: Duration,
    last_blink_time: Duration,
    last_seen: Duration,
    frames: u64,
}

impl SessionSupervisor {
    /// Create a session; it does not run until [`start`](Self::start)
    pub fn new(
        thresholds: Thresholds,
        alarm: Box<dyn AlarmPort>,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SessionError> {
        thresholds.validate()?;

        Ok(Self {
            smoother: SignalSmoother::new(thresholds.smoothing_window),
            openness: thresholds.openness_classifier(),
            detector: BlinkDetector::new(thresholds.eye_closed_ratio, thresholds.debounce_frames),
            classifier: DrowsinessClassifier::new(&thresholds),
            alarm: AlarmController::new(AlarmConfig::from(&thresholds), alarm),
            phase: SessionPhase::Created,
            frame: FrameState::default(),
            history: SlidingWindow::new(thresholds.history_size),
            blink_count: 0,
            session_start: Duration::ZERO,
            last_blink_time: Duration::ZERO,
            last_seen: Duration::ZERO,
            frames: 0,
            clock,
            thresholds,
        })
    }

    /// Start monitoring at the clock's current time
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Created {
            return Err(SessionError::AlreadyStarted);
        }
        let now = self.clock.now();
        self.session_start = now;
        self.last_blink_time = now;
        self.last_seen = now;
        self.phase = SessionPhase::Running;
        info!(
            "Monitoring started - drowsy alert at {} blinks, critical at {} blinks",
            self.thresholds.drowsy_blink_threshold, self.thresholds.critical_blink_threshold
        );
        Ok(())
    }

    /// Process one frame read at the clock's current time
    pub fn next_frame(&mut self, ratio: Option<f64>) -> Result<FrameAnalysis, SessionError> {
        let now = self.clock.now();
        self.on_frame(ratio, now)
    }

    /// Process one frame from landmark distances (`None` when no face)
    pub fn on_measurement(
        &mut self,
        distances: Option<EyeDistances>,
        now: Duration,
    ) -> Result<FrameAnalysis, SessionError> {
        let ratio = distances.map(|d| d.ratio()).transpose()?;
        self.on_frame(ratio, now)
    }

    /// Process one frame. `None` means no face was found: the frame state is
    /// left untouched and the status is NO FACE, but the session clock still
    /// runs.
    pub fn on_frame(
        &mut self,
        ratio: Option<f64>,
        now: Duration,
    ) -> Result<FrameAnalysis, SessionError> {
        self.ensure_running()?;
        self.last_seen = self.last_seen.max(now);
        self.frames += 1;

        let mut analysis = match ratio {
            Some(raw) => self.process_face(raw, now),
            None => self.no_face(),
        };
        analysis.time_remaining_secs = self.time_remaining(now).as_secs();

        if analysis.critical {
            self.end(EndReason::Critical);
        } else if self.is_expired(now) {
            info!("Monitoring session completed ({}s)", self.thresholds.monitoring_time_secs);
            self.end(EndReason::Timeout);
        }

        Ok(analysis)
    }

    fn process_face(&mut self, raw: f64, now: Duration) -> FrameAnalysis {
        let smoothed = self.smoother.push(raw);
        let openness = self.openness.score(smoothed);

        let blink = self.detector.update(smoothed, openness);
        if blink.is_some() {
            self.blink_count += 1;
            self.last_blink_time = now;
            counter!("dms_blinks_total").increment(1);
            info!("Blink detected #{} (ratio: {:.1})", self.blink_count, smoothed);
        }

        self.frame = self.detector.frame_state(openness);
        self.history.push(openness);

        let status = self.classifier.classify(
            self.frame.consecutive_closed_frames,
            self.blink_count,
            openness,
        );
        let evaluation =
            self.alarm
                .evaluate(status, self.blink_count, openness, self.last_blink_time, now);
        if evaluation.command == Some(AlarmCommand::Start) {
            counter!("dms_alarm_starts_total").increment(1);
        }

        FrameAnalysis {
            face_detected: true,
            status,
            openness,
            zone: OpennessZone::from_score(openness),
            blink_count: self.blink_count,
            drowsy_threshold: self.thresholds.drowsy_blink_threshold,
            smoothed_ratio: Some(smoothed),
            time_remaining_secs: 0,
            blink,
            alarm_active: self.alarm.is_active(),
            critical: evaluation.critical,
        }
    }

    fn no_face(&self) -> FrameAnalysis {
        FrameAnalysis {
            face_detected: false,
            status: DrowsinessStatus::NoFace,
            openness: self.frame.openness,
            zone: OpennessZone::from_score(self.frame.openness),
            blink_count: self.blink_count,
            drowsy_threshold: self.thresholds.drowsy_blink_threshold,
            smoothed_ratio: None,
            time_remaining_secs: 0,
            blink: None,
            alarm_active: self.alarm.is_active(),
            critical: false,
        }
    }

    /// Apply an external command
    pub fn on_command(&mut self, command: SessionCommand) -> Result<(), SessionError> {
        self.ensure_running()?;
        match command {
            SessionCommand::Reset => {
                self.blink_count = 0;
                self.alarm.reset();
                info!("Counters reset");
            }
            SessionCommand::StopAlarm => {
                self.alarm.request_stop();
                info!("Alarm stopped by request");
            }
            SessionCommand::Quit => {
                info!("Exiting by user request");
                self.end(EndReason::Quit);
            }
        }
        Ok(())
    }

    /// Report that the frame source failed; ends the session
    pub fn capture_failed(&mut self, reason: &str) {
        error!("Capture failure: {}", reason);
        if self.is_running() {
            self.end(EndReason::CaptureFailure);
        }
    }

    /// Whether the monitoring time has elapsed at `now`
    pub fn is_expired(&self, now: Duration) -> bool {
        self.phase != SessionPhase::Created
            && now.saturating_sub(self.session_start) > self.thresholds.monitoring_time()
    }

    /// Time left before the session times out
    pub fn time_remaining(&self, now: Duration) -> Duration {
        let elapsed = now.saturating_sub(self.session_start);
        self.thresholds.monitoring_time().saturating_sub(elapsed)
    }

    /// Summary of the session so far
    pub fn summarize(&self) -> SessionSummary {
        SessionSummary {
            category: SummaryCategory::from_blinks(
                self.blink_count,
                self.thresholds.excellent_blink_limit,
                self.thresholds.drowsy_blink_threshold,
            ),
            blink_count: self.blink_count,
            duration: self.last_seen.saturating_sub(self.session_start),
            end_reason: self.end_reason(),
        }
    }

    /// Tear the session down: silence the alarm and report
    pub fn finish(mut self) -> SessionSummary {
        self.alarm.request_stop();
        let summary = self.summarize();
        info!(
            "Session finished: {} ({} blinks, {:.1}s)",
            summary.category,
            summary.blink_count,
            summary.duration.as_secs_f64()
        );
        summary
    }

    fn end(&mut self, reason: EndReason) {
        self.phase = SessionPhase::Ended(reason);
        counter!("dms_sessions_ended_total", "reason" => reason.as_str()).increment(1);
        info!("Session ended: {} after {} frames", reason, self.frames);
    }

    fn ensure_running(&self) -> Result<(), SessionError> {
        match self.phase {
            SessionPhase::Running => Ok(()),
            phase => Err(SessionError::NotRunning(phase)),
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        match self.phase {
            SessionPhase::Ended(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            blink_count: self.blink_count,
            session_start: self.session_start,
            drowsy_warning_given: self.alarm.drowsy_warning_given(),
            last_blink_time: self.last_blink_time,
            alarm_active: self.alarm.is_active(),
            last_alarm_time: self.alarm.last_alarm_time(),
        }
    }

    /// Frame state of the last face frame
    pub fn frame_state(&self) -> FrameState {
        self.frame
    }

    /// Openness scores of recent face frames, oldest first
    pub fn openness_history(&self) -> Vec<u8> {
        self.history.to_vec()
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    pub fn alarm(&self) -> &AlarmController {
        &self.alarm
    }

    /// Frames processed, with or without a face
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl fmt::Debug for SessionSupervisor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionSupervisor")
            .field("phase", &self.phase)
            .field("blink_count", &self.blink_count)
            .field("frame", &self.frame)
            .field("frames", &self.frames)
            .field("alarm", &self.alarm)
            .finish()
    }
}
