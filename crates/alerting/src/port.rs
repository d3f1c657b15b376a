//! Alarm command port

use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tracing::debug;

/// Command issued to the audio collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmCommand {
    /// Start (or restart) the looping alarm
    Start,
    Stop,
}

/// Raised by audio collaborators that cannot play the alarm
#[derive(Error, Debug)]
#[error("Alarm unavailable: {0}")]
pub struct AlarmUnavailable(pub String);

/// Audio collaborator driven by the alarm controller.
///
/// Commands are fire-and-forget. `stop` must tolerate being called while idle.
pub trait AlarmPort: Send {
    /// Start the alarm looping, restarting it if it is already playing
    fn start_looping(&mut self);

    fn stop(&mut self);

    /// Whether start requests can have any effect
    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &str;
}

/// No-op port used when no alarm sound is available
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAlarm;

impl AlarmPort for SilentAlarm {
    fn start_looping(&mut self) {
        debug!("Silent alarm: start ignored");
    }

    fn stop(&mut self) {}

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &str {
        "SilentAlarm"
    }
}

/// Port that records every command it receives.
///
/// Clones share the same log, so a handle can be kept after the port is
/// moved into a controller.
#[derive(Debug, Default, Clone)]
pub struct RecordingAlarm {
    commands: Arc<Mutex<Vec<AlarmCommand>>>,
}

impl RecordingAlarm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands received so far, oldest first
    pub fn commands(&self) -> Vec<AlarmCommand> {
        self.commands
            .lock()
            .map(|log| log.clone())
            .unwrap_or_default()
    }

    pub fn count(&self, command: AlarmCommand) -> usize {
        self.commands().iter().filter(|&&c| c == command).count()
    }

    fn record(&self, command: AlarmCommand) {
        if let Ok(mut log) = self.commands.lock() {
            log.push(command);
        }
    }
}

impl AlarmPort for RecordingAlarm {
    fn start_looping(&mut self) {
        self.record(AlarmCommand::Start);
    }

    fn stop(&mut self) {
        self.record(AlarmCommand::Stop);
    }

    fn name(&self) -> &str {
        "RecordingAlarm"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_handle_shares_log() {
        let handle = RecordingAlarm::new();
        let mut port: Box<dyn AlarmPort> = Box::new(handle.clone());

        port.start_looping();
        port.stop();
        port.stop();

        assert_eq!(
            handle.commands(),
            vec![AlarmCommand::Start, AlarmCommand::Stop, AlarmCommand::Stop]
        );
        assert_eq!(handle.count(AlarmCommand::Stop), 2);
    }

    #[test]
    fn test_silent_alarm_is_unavailable() {
        assert!(!SilentAlarm.is_available());
        assert!(RecordingAlarm::new().is_available());
    }
}
