//! Moving-average smoothing of raw ratio samples

use crate::window::SlidingWindow;

/// Default number of samples averaged (about 1/6 s at 30fps)
pub const DEFAULT_WINDOW: usize = 5;

/// Sliding window mean filter for the per-frame eye ratio
#[derive(Debug, Clone)]
pub struct SignalSmoother {
    window: SlidingWindow<f64>,
}

impl SignalSmoother {
    /// Create a smoother averaging the last `size` samples
    pub fn new(size: usize) -> Self {
        Self {
            window: SlidingWindow::new(size),
        }
    }

    /// Add a raw sample and return the mean of the current window
    pub fn push(&mut self, sample: f64) -> f64 {
        self.window.push(sample);
        self.window
            .iter()
            .sum::<f64>()
            / self.window.len() as f64
    }

    /// Mean of the current window, `None` until a sample has been pushed
    pub fn smoothed(&self) -> Option<f64> {
        if self.window.is_empty() {
            return None;
        }
        Some(self.window.iter().sum::<f64>() / self.window.len() as f64)
    }

    /// Number of samples currently held
    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    /// Reset the smoother
    pub fn reset(&mut self) {
        self.window.clear();
    }
}

impl Default for SignalSmoother {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_window_averages_what_it_has() {
        let mut smoother = SignalSmoother::new(5);
        assert_eq!(smoother.smoothed(), None);

        assert_eq!(smoother.push(10.0), 10.0);
        assert_eq!(smoother.push(20.0), 15.0);
        assert_eq!(smoother.smoothed(), Some(15.0));
    }

    #[test]
    fn test_full_window_drops_oldest() {
        let mut smoother = SignalSmoother::new(3);
        for v in [10.0, 20.0, 30.0] {
            smoother.push(v);
        }
        // [20, 30, 60]
        let avg = smoother.push(60.0);
        assert!((avg - 36.666_666).abs() < 1e-3);
        assert_eq!(smoother.len(), 3);
    }

    #[test]
    fn test_steady_signal() {
        let mut smoother = SignalSmoother::default();
        let mut last = 0.0;
        for _ in 0..5 {
            last = smoother.push(60.0);
        }
        assert_eq!(last, 60.0);
    }

    #[test]
    fn test_reset() {
        let mut smoother = SignalSmoother::default();
        smoother.push(42.0);
        smoother.reset();
        assert!(smoother.is_empty());
        assert_eq!(smoother.smoothed(), None);
    }
}
