//! DMS thresholds

use crate::ConfigError;
use eye_signal::OpennessClassifier;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Thresholds driving blink counting, status classification and alarms.
///
/// Fixed for the lifetime of a session. Any subset of fields may be given
/// when deserializing; the rest take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Blink count that raises the drowsy warning
    pub drowsy_blink_threshold: u32,

    /// Blink count that ends the session as critical
    pub critical_blink_threshold: u32,

    /// Smoothed ratio below which a closure starts a blink
    pub eye_closed_ratio: f64,

    /// Frames a counted blink suppresses further counting
    pub debounce_frames: u32,

    /// Fully closed frames before the subject counts as sleeping
    pub prolonged_closure_frames: u32,

    /// Minimum gap between alarm starts (seconds)
    pub alarm_cooldown_secs: u64,

    /// Session length (seconds)
    pub monitoring_time_secs: u64,

    /// Openness (%) above which the alarm may auto-recover
    pub auto_recover_openness: u8,

    /// Time without blinks before auto-recovery (seconds)
    pub auto_recover_idle_secs: u64,

    /// Raw samples averaged by the smoother
    pub smoothing_window: usize,

    /// Smoothed ratio mapped to 0% openness
    pub openness_lower_ratio: f64,

    /// Smoothed ratio mapped to 100% openness
    pub openness_upper_ratio: f64,

    /// Openness (%) below which the subject looks sleepy
    pub sleepy_openness: u8,

    /// Highest blink count still summarized as excellent
    pub excellent_blink_limit: u32,

    /// Openness scores kept for the plot
    pub history_size: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            drowsy_blink_threshold: 15,
            critical_blink_threshold: 30,
            eye_closed_ratio: 30.0,
            debounce_frames: 15,
            prolonged_closure_frames: 30,
            alarm_cooldown_secs: 10,
            monitoring_time_secs: 60,
            auto_recover_openness: 80,
            auto_recover_idle_secs: 5,
            smoothing_window: 5,
            openness_lower_ratio: 18.0,
            openness_upper_ratio: 50.0,
            sleepy_openness: 40,
            excellent_blink_limit: 5,
            history_size: 150,
        }
    }
}

impl Thresholds {
    /// Create strict thresholds (earlier warnings)
    pub fn strict() -> Self {
        Self {
            drowsy_blink_threshold: 10,
            critical_blink_threshold: 20,
            prolonged_closure_frames: 20,
            alarm_cooldown_secs: 5,
            ..Default::default()
        }
    }

    /// Create lenient thresholds (later warnings)
    pub fn lenient() -> Self {
        Self {
            drowsy_blink_threshold: 20,
            critical_blink_threshold: 40,
            prolonged_closure_frames: 45,
            alarm_cooldown_secs: 15,
            ..Default::default()
        }
    }

    pub fn alarm_cooldown(&self) -> Duration {
        Duration::from_secs(self.alarm_cooldown_secs)
    }

    pub fn monitoring_time(&self) -> Duration {
        Duration::from_secs(self.monitoring_time_secs)
    }

    pub fn auto_recover_idle(&self) -> Duration {
        Duration::from_secs(self.auto_recover_idle_secs)
    }

    /// Openness classifier for these bounds
    pub fn openness_classifier(&self) -> OpennessClassifier {
        OpennessClassifier::new(self.openness_lower_ratio, self.openness_upper_ratio)
    }

    /// Reject tables the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.smoothing_window == 0 {
            return Err(ConfigError::Invalid("smoothing_window must be at least 1".into()));
        }
        if self.debounce_frames == 0 {
            return Err(ConfigError::Invalid("debounce_frames must be at least 1".into()));
        }
        if !self.openness_lower_ratio.is_finite()
            || !self.openness_upper_ratio.is_finite()
            || self.openness_lower_ratio >= self.openness_upper_ratio
        {
            return Err(ConfigError::Invalid(format!(
                "openness bounds must satisfy lower < upper, got {} and {}",
                self.openness_lower_ratio, self.openness_upper_ratio
            )));
        }
        if self.critical_blink_threshold < self.drowsy_blink_threshold {
            return Err(ConfigError::Invalid(format!(
                "critical_blink_threshold ({}) is below drowsy_blink_threshold ({})",
                self.critical_blink_threshold, self.drowsy_blink_threshold
            )));
        }
        if self.auto_recover_openness > 100 || self.sleepy_openness > 100 {
            return Err(ConfigError::Invalid("openness percentages must be within 0-100".into()));
        }
        if self.history_size == 0 {
            return Err(ConfigError::Invalid("history_size must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Thresholds::default().validate().is_ok());
        assert!(Thresholds::strict().validate().is_ok());
        assert!(Thresholds::lenient().validate().is_ok());
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let thresholds = Thresholds {
            openness_lower_ratio: 50.0,
            openness_upper_ratio: 18.0,
            ..Default::default()
        };
        assert!(thresholds.validate().is_err());
    }

    #[test]
    fn test_rejects_critical_below_drowsy() {
        let thresholds = Thresholds {
            drowsy_blink_threshold: 20,
            critical_blink_threshold: 10,
            ..Default::default()
        };
        assert!(matches!(thresholds.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_durations() {
        let thresholds = Thresholds::default();
        assert_eq!(thresholds.alarm_cooldown(), Duration::from_secs(10));
        assert_eq!(thresholds.monitoring_time(), Duration::from_secs(60));
        assert_eq!(thresholds.auto_recover_idle(), Duration::from_secs(5));
    }
}
