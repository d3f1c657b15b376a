//! External session commands

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Command from the keyboard/UI collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionCommand {
    /// Zero the blink count and clear the drowsy warning
    Reset,
    /// Silence the alarm
    StopAlarm,
    /// End the session
    Quit,
}

impl SessionCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reset => "reset",
            Self::StopAlarm => "stop_alarm",
            Self::Quit => "quit",
        }
    }
}

impl fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" | "r" => Ok(Self::Reset),
            "stop_alarm" | "stop-alarm" | "s" => Ok(Self::StopAlarm),
            "quit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys() {
        assert_eq!("r".parse(), Ok(SessionCommand::Reset));
        assert_eq!("S".parse(), Ok(SessionCommand::StopAlarm));
        assert_eq!("q".parse(), Ok(SessionCommand::Quit));
        assert!("x".parse::<SessionCommand>().is_err());
    }

    #[test]
    fn test_parse() {
        assert_eq!("stop-alarm".parse(), Ok(SessionCommand::StopAlarm));
        assert_eq!(" Quit ".parse(), Ok(SessionCommand::Quit));
        assert!("pause".parse::<SessionCommand>().is_err());
    }
}
