//! Console alarm collaborator

use alerting::{AlarmPort, AlarmUnavailable, SilentAlarm};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Alarm that rings the terminal bell and logs start/stop.
///
/// Requires the configured sound asset to exist so that a missing asset is
/// detected at startup.
#[derive(Debug, Clone)]
pub struct ConsoleAlarm {
    sound: PathBuf,
    playing: bool,
}

impl ConsoleAlarm {
    pub fn open(sound: &Path) -> Result<Self, AlarmUnavailable> {
        if !sound.is_file() {
            return Err(AlarmUnavailable(format!(
                "sound asset {} not found",
                sound.display()
            )));
        }
        Ok(Self {
            sound: sound.to_path_buf(),
            playing: false,
        })
    }
}

impl AlarmPort for ConsoleAlarm {
    fn start_looping(&mut self) {
        self.playing = true;
        warn!("ALARM ({})", self.sound.display());
        let mut stderr = std::io::stderr();
        if let Err(e) = stderr.write_all(b"\x07").and_then(|()| stderr.flush()) {
            debug!("Failed to ring terminal bell: {}", e);
        }
    }

    fn stop(&mut self) {
        if self.playing {
            self.playing = false;
            info!("Alarm silenced");
        }
    }

    fn name(&self) -> &str {
        "ConsoleAlarm"
    }
}

/// Alarm collaborator chosen once at startup
#[derive(Debug, Clone)]
pub enum AlarmChoice {
    Console(ConsoleAlarm),
    Silent,
}

impl AlarmChoice {
    /// Pick the console alarm if its asset is present, otherwise warn once and
    /// fall back to a silent alarm
    pub fn select(sound: Option<&Path>) -> Self {
        match sound.map(ConsoleAlarm::open) {
            Some(Ok(alarm)) => Self::Console(alarm),
            Some(Err(e)) => {
                warn!("{}. Continuing without sound.", e);
                Self::Silent
            }
            None => {
                warn!("No alarm sound configured. Continuing without sound.");
                Self::Silent
            }
        }
    }

    /// Fresh port for a new session
    pub fn port(&self) -> Box<dyn AlarmPort> {
        match self {
            Self::Console(alarm) => Box::new(alarm.clone()),
            Self::Silent => Box::new(SilentAlarm),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_asset_falls_back_to_silent() {
        let choice = AlarmChoice::select(Some(Path::new("/nonexistent/alarm.wav")));
        assert!(matches!(choice, AlarmChoice::Silent));
        assert!(!choice.port().is_available());
    }

    #[test]
    fn test_existing_asset_is_used() {
        // Any readable file will do as the asset
        let asset = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let choice = AlarmChoice::select(Some(asset.as_path()));
        assert!(matches!(choice, AlarmChoice::Console(_)));
        assert!(choice.port().is_available());
    }
}
