//! Alerting System
//!
//! Drives the drowsiness alarm: threshold-triggered starts gated by a
//! cooldown, explicit and automatic silencing, and the audio command port.

mod controller;
mod port;

pub use controller::{AlarmConfig, AlarmController, AlarmEvaluation};
pub use port::{AlarmCommand, AlarmPort, AlarmUnavailable, RecordingAlarm, SilentAlarm};
