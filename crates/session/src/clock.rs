//! Time sources

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Monotonic clock, read once per frame
pub trait Clock: Send {
    /// Time elapsed since the clock's origin
    fn now(&self) -> Duration;
}

/// Externally driven clock for replays and tests.
///
/// Clones share the same time, so a handle can keep advancing a clock that
/// was moved into a supervisor.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(at: Duration) -> Self {
        let clock = Self::new();
        clock.set(at);
        clock
    }

    /// Jump to `at`, saturating at `u64::MAX` nanoseconds
    pub fn set(&self, at: Duration) {
        self.nanos.store(saturating_nanos(at), Ordering::Release);
    }

    pub fn advance(&self, by: Duration) {
        let by = saturating_nanos(by);
        // Closure always returns Some, so the update cannot fail
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(by))
            });
    }
}

fn saturating_nanos(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_nanos(self.nanos.load(Ordering::Acquire))
    }
}
