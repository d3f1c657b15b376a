//! Drowsiness status classification

use crate::config::Thresholds;
use crate::state::DrowsinessStatus;

/// Priority-ordered status rules; the first match wins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrowsinessClassifier {
    prolonged_closure_frames: u32,
    drowsy_blink_threshold: u32,
    sleepy_openness: u8,
}

impl DrowsinessClassifier {
    pub fn new(thresholds: &Thresholds) -> Self {
        Self {
            prolonged_closure_frames: thresholds.prolonged_closure_frames,
            drowsy_blink_threshold: thresholds.drowsy_blink_threshold,
            sleepy_openness: thresholds.sleepy_openness,
        }
    }

    pub fn classify(
        &self,
        consecutive_closed_frames: u32,
        blink_count: u32,
        openness: u8,
    ) -> DrowsinessStatus {
        if consecutive_closed_frames > self.prolonged_closure_frames {
            DrowsinessStatus::Sleeping
        } else if blink_count >= self.drowsy_blink_threshold {
            DrowsinessStatus::Drowsy
        } else if openness < self.sleepy_openness {
            DrowsinessStatus::Sleepy
        } else {
            DrowsinessStatus::Alert
        }
    }
}

impl Default for DrowsinessClassifier {
    fn default() -> Self {
        Self::new(&Thresholds::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_streak_dominates() {
        let classifier = DrowsinessClassifier::default();
        assert_eq!(classifier.classify(31, 0, 100), DrowsinessStatus::Sleeping);
        assert_eq!(classifier.classify(31, 20, 0), DrowsinessStatus::Sleeping);
    }

    #[test]
    fn test_streak_threshold_is_exclusive() {
        let classifier = DrowsinessClassifier::default();
        assert_eq!(classifier.classify(30, 0, 100), DrowsinessStatus::Alert);
    }

    #[test]
    fn test_blink_count_before_openness() {
        let classifier = DrowsinessClassifier::default();
        assert_eq!(classifier.classify(0, 15, 10), DrowsinessStatus::Drowsy);
        assert_eq!(classifier.classify(0, 14, 10), DrowsinessStatus::Sleepy);
    }

    #[test]
    fn test_openness_boundary() {
        let classifier = DrowsinessClassifier::default();
        assert_eq!(classifier.classify(0, 0, 39), DrowsinessStatus::Sleepy);
        assert_eq!(classifier.classify(0, 0, 40), DrowsinessStatus::Alert);
    }
}
