//! End-of-session summary

use crate::supervisor::EndReason;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Overall drowsiness category of a finished session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryCategory {
    Excellent,
    Moderate,
    HighDrowsiness,
}

impl SummaryCategory {
    /// Categorize a blink count
    pub fn from_blinks(blink_count: u32, excellent_limit: u32, drowsy_threshold: u32) -> Self {
        if blink_count <= excellent_limit {
            Self::Excellent
        } else if blink_count <= drowsy_threshold {
            Self::Moderate
        } else {
            Self::HighDrowsiness
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Moderate => "moderate",
            Self::HighDrowsiness => "high-drowsiness",
        }
    }
}

impl fmt::Display for SummaryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session report for the CLI/reporting collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub category: SummaryCategory,
    pub blink_count: u32,
    /// Time from session start to the last processed input
    #[serde(with = "duration_secs")]
    pub duration: Duration,
    /// Why the session ended, if it has
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_reason: Option<EndReason>,
}

impl SessionSummary {
    /// One-line human-readable report
    pub fn message(&self) -> String {
        let secs = self.duration.as_secs_f64();
        match self.category {
            SummaryCategory::Excellent => format!(
                "Excellent! Only {} blinks in {:.1}s - You stayed alert!",
                self.blink_count, secs
            ),
            SummaryCategory::Moderate => format!(
                "In this session {} blinks detected in {:.1}s - Stay hydrated!",
                self.blink_count, secs
            ),
            SummaryCategory::HighDrowsiness => format!(
                "High drowsiness detected: {} blinks in {:.1}s - Consider taking a break!",
                self.blink_count, secs
            ),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_boundaries() {
        assert_eq!(SummaryCategory::from_blinks(0, 5, 15), SummaryCategory::Excellent);
        assert_eq!(SummaryCategory::from_blinks(5, 5, 15), SummaryCategory::Excellent);
        assert_eq!(SummaryCategory::from_blinks(6, 5, 15), SummaryCategory::Moderate);
        assert_eq!(SummaryCategory::from_blinks(15, 5, 15), SummaryCategory::Moderate);
        assert_eq!(SummaryCategory::from_blinks(16, 5, 15), SummaryCategory::HighDrowsiness);
    }

    #[test]
    fn test_message_carries_count_and_duration() {
        let summary = SessionSummary {
            category: SummaryCategory::HighDrowsiness,
            blink_count: 22,
            duration: Duration::from_millis(61_250),
            end_reason: Some(EndReason::Timeout),
        };
        let message = summary.message();
        assert!(message.contains("22 blinks"));
        assert!(message.contains("61.2s") || message.contains("61.3s"));
        assert_eq!(summary.category.to_string(), "high-drowsiness");
    }
}
