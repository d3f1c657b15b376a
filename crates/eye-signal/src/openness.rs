//! Openness scoring of the smoothed eye ratio

use serde::{Deserialize, Serialize};

/// Clamped piecewise-linear map from smoothed ratio to a 0-100 score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpennessClassifier {
    /// Ratio at or below which the eye counts as fully closed
    pub lower_bound: f64,
    /// Ratio at or above which the eye counts as fully open
    pub upper_bound: f64,
}

impl Default for OpennessClassifier {
    fn default() -> Self {
        Self {
            lower_bound: 18.0,
            upper_bound: 50.0,
        }
    }
}

impl OpennessClassifier {
    pub fn new(lower_bound: f64, upper_bound: f64) -> Self {
        Self {
            lower_bound,
            upper_bound,
        }
    }

    /// Score a smoothed ratio, rounding to the nearest integer percentage
    pub fn score(&self, ratio: f64) -> u8 {
        if ratio.is_nan() || ratio <= self.lower_bound {
            return 0;
        }
        if ratio >= self.upper_bound {
            return 100;
        }
        let span = self.upper_bound - self.lower_bound;
        let pct = (ratio - self.lower_bound) / span * 100.0;
        pct.round().clamp(0.0, 100.0) as u8
    }
}

/// Colour band of an openness score, as used by the plot overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpennessZone {
    /// Above 70%
    Alert,
    /// Above 40%
    Caution,
    Drowsy,
}

impl OpennessZone {
    pub fn from_score(score: u8) -> Self {
        if score > 70 {
            Self::Alert
        } else if score > 40 {
            Self::Caution
        } else {
            Self::Drowsy
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::Caution => "caution",
            Self::Drowsy => "drowsy",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_bounds() {
        let classifier = OpennessClassifier::default();
        assert_eq!(classifier.score(10.0), 0);
        assert_eq!(classifier.score(18.0), 0);
        assert_eq!(classifier.score(50.0), 100);
        assert_eq!(classifier.score(60.0), 100);
    }

    #[test]
    fn test_linear_region_rounds() {
        let classifier = OpennessClassifier::default();
        assert_eq!(classifier.score(34.0), 50);
        // (30 - 18) / 32 * 100 = 37.5
        assert_eq!(classifier.score(30.0), 38);
        // 0.3125 rounds down to a full closure
        assert_eq!(classifier.score(18.1), 0);
    }

    #[test]
    fn test_nan_is_closed() {
        assert_eq!(OpennessClassifier::default().score(f64::NAN), 0);
    }

    #[test]
    fn test_zones() {
        assert_eq!(OpennessZone::from_score(100), OpennessZone::Alert);
        assert_eq!(OpennessZone::from_score(70), OpennessZone::Caution);
        assert_eq!(OpennessZone::from_score(41), OpennessZone::Caution);
        assert_eq!(OpennessZone::from_score(40), OpennessZone::Drowsy);
        assert_eq!(OpennessZone::from_score(0), OpennessZone::Drowsy);
    }

    proptest! {
        #[test]
        fn score_stays_in_range(ratio in -1000.0_f64..1000.0) {
            let score = OpennessClassifier::default().score(ratio);
            prop_assert!(score <= 100);
        }

        #[test]
        fn score_is_monotonic(a in 0.0_f64..80.0, b in 0.0_f64..80.0) {
            let classifier = OpennessClassifier::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(classifier.score(lo) <= classifier.score(hi));
        }
    }
}
