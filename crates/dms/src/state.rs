//! Per-frame driver state

use serde::{Deserialize, Serialize};
use std::fmt;

/// Drowsiness status reported for each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DrowsinessStatus {
    #[default]
    Alert,
    /// Eyes noticeably narrowed
    Sleepy,
    /// Blink count reached the drowsy threshold
    Drowsy,
    /// Eyes fully closed for a prolonged streak
    Sleeping,
    /// No face in frame; state frozen
    NoFace,
}

impl DrowsinessStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "ALERT",
            Self::Sleepy => "SLEEPY",
            Self::Drowsy => "DROWSY",
            Self::Sleeping => "SLEEPING",
            Self::NoFace => "NO FACE",
        }
    }
}

impl fmt::Display for DrowsinessStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame-level state, recomputed on face frames and frozen otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameState {
    /// Openness score of the last face frame (0-100)
    pub openness: u8,
    /// Consecutive fully closed frames
    pub consecutive_closed_frames: u32,
    /// Blink debounce counter, 0 when armed
    pub debounce_counter: u32,
}
