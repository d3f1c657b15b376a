//! Per-frame analysis handed to the overlay collaborator

use crate::blink::BlinkEvent;
use crate::state::DrowsinessStatus;
use eye_signal::OpennessZone;
use serde::{Deserialize, Serialize};

/// Complete result of one processed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnalysis {
    /// Whether a face was measured on this frame
    pub face_detected: bool,

    pub status: DrowsinessStatus,

    /// Openness score (0-100); frozen on frames without a face
    pub openness: u8,

    pub zone: OpennessZone,

    /// Blinks counted this session
    pub blink_count: u32,

    /// Blink count that raises the drowsy warning
    pub drowsy_threshold: u32,

    /// Smoothed ratio, absent when no face was measured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smoothed_ratio: Option<f64>,

    /// Whole seconds left in the session
    pub time_remaining_secs: u64,

    /// Blink counted on this frame, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink: Option<BlinkEvent>,

    pub alarm_active: bool,

    /// Critical blink count reached; the session ends
    pub critical: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_face_omits_ratio() {
        let analysis = FrameAnalysis {
            face_detected: false,
            status: DrowsinessStatus::NoFace,
            openness: 0,
            zone: OpennessZone::Drowsy,
            blink_count: 3,
            drowsy_threshold: 15,
            smoothed_ratio: None,
            time_remaining_secs: 42,
            blink: None,
            alarm_active: false,
            critical: false,
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["status"], "NO_FACE");
        assert!(json.get("smoothed_ratio").is_none());
        assert_eq!(json["blink_count"], 3);
    }
}
