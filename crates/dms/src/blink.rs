//! Debounced blink detection

use crate::state::FrameState;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A completed closure, counted once per debounce cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlinkEvent {
    /// Sequence number across the detector's lifetime, starting at 1
    pub index: u64,
    /// Frame number (1-based) on which the blink was counted
    pub frame: u64,
    /// Smoothed ratio that triggered the blink
    pub ratio: f64,
}

/// Edge detector over the smoothed ratio.
///
/// A closure below `closed_ratio` counts one blink and disarms the detector
/// for `debounce_frames` further frames. Fully closed frames (openness 0) are
/// tracked separately as a streak for prolonged-closure detection.
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    closed_ratio: f64,
    debounce_frames: u32,
    debounce_counter: u32,
    consecutive_closed_frames: u32,
    frames_seen: u64,
    blinks_emitted: u64,
}

impl BlinkDetector {
    pub fn new(closed_ratio: f64, debounce_frames: u32) -> Self {
        Self {
            closed_ratio,
            debounce_frames,
            debounce_counter: 0,
            consecutive_closed_frames: 0,
            frames_seen: 0,
            blinks_emitted: 0,
        }
    }

    /// Advance one face frame
    pub fn update(&mut self, smoothed_ratio: f64, openness: u8) -> Option<BlinkEvent> {
        self.frames_seen += 1;
        let mut event = None;

        if smoothed_ratio < self.closed_ratio && self.debounce_counter == 0 {
            self.blinks_emitted += 1;
            self.debounce_counter = 1;
            event = Some(BlinkEvent {
                index: self.blinks_emitted,
                frame: self.frames_seen,
                ratio: smoothed_ratio,
            });
            debug!(
                "Blink #{} on frame {} (ratio: {:.1})",
                self.blinks_emitted, self.frames_seen, smoothed_ratio
            );
        } else if self.debounce_counter != 0 {
            self.debounce_counter += 1;
            if self.debounce_counter > self.debounce_frames {
                self.debounce_counter = 0;
            }
        }

        if openness == 0 {
            self.consecutive_closed_frames = self.consecutive_closed_frames.saturating_add(1);
        } else {
            self.consecutive_closed_frames = 0;
        }

        event
    }

    /// Snapshot the detector counters alongside the frame's openness
    pub fn frame_state(&self, openness: u8) -> FrameState {
        FrameState {
            openness,
            consecutive_closed_frames: self.consecutive_closed_frames,
            debounce_counter: self.debounce_counter,
        }
    }

    pub fn debounce_counter(&self) -> u32 {
        self.debounce_counter
    }

    pub fn consecutive_closed_frames(&self) -> u32 {
        self.consecutive_closed_frames
    }

    /// Whether the next closure would be counted
    pub fn is_armed(&self) -> bool {
        self.debounce_counter == 0
    }

    /// Total blinks emitted, unaffected by session resets
    pub fn blinks_emitted(&self) -> u64 {
        self.blinks_emitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_closure_counts_once() {
        let mut detector = BlinkDetector::new(30.0, 15);

        let first = detector.update(20.0, 6);
        assert_eq!(first.map(|e| e.index), Some(1));
        assert_eq!(detector.debounce_counter(), 1);

        // Still closed, but debounced
        for _ in 0..5 {
            assert!(detector.update(20.0, 6).is_none());
        }
        assert_eq!(detector.blinks_emitted(), 1);
    }

    #[test]
    fn test_rearms_after_debounce_window() {
        let mut detector = BlinkDetector::new(30.0, 15);
        assert!(detector.update(20.0, 6).is_some());

        // Counter runs 2..=15, then 16 wraps to 0
        for _ in 0..14 {
            assert!(detector.update(60.0, 100).is_none());
        }
        assert_eq!(detector.debounce_counter(), 15);
        assert!(detector.update(60.0, 100).is_none());
        assert!(detector.is_armed());

        let second = detector.update(20.0, 6).expect("re-armed detector counts");
        assert_eq!(second.index, 2);
        assert_eq!(second.frame, 17);
    }

    #[test]
    fn test_closed_streak_resets_on_any_opening() {
        let mut detector = BlinkDetector::new(30.0, 15);
        for _ in 0..40 {
            detector.update(10.0, 0);
        }
        assert_eq!(detector.consecutive_closed_frames(), 40);

        detector.update(19.0, 3);
        assert_eq!(detector.consecutive_closed_frames(), 0);
    }

    #[test]
    fn test_frame_state_snapshot() {
        let mut detector = BlinkDetector::new(30.0, 15);
        detector.update(10.0, 0);
        let state = detector.frame_state(0);
        assert_eq!(
            state,
            FrameState {
                openness: 0,
                consecutive_closed_frames: 1,
                debounce_counter: 1,
            }
        );
    }

    proptest! {
        #[test]
        fn debounce_counter_stays_bounded(
            ratios in proptest::collection::vec(0.0_f64..80.0, 1..200),
            debounce in 1_u32..30,
        ) {
            let mut detector = BlinkDetector::new(30.0, debounce);
            for ratio in ratios {
                detector.update(ratio, 50);
                prop_assert!(detector.debounce_counter() <= debounce);
            }
        }

        #[test]
        fn continuous_closure_respects_debounce_bound(n in 1_usize..400, debounce in 1_u32..30) {
            let mut detector = BlinkDetector::new(30.0, debounce);
            let blinks = (0..n).filter(|_| detector.update(5.0, 0).is_some()).count();
            let period = debounce as usize + 1;
            prop_assert!(blinks <= (n + period - 1) / period);
        }
    }
}
