//! Alarm Controller Implementation

use crate::port::{AlarmCommand, AlarmPort};
use dms::{DrowsinessStatus, Thresholds};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Alarm configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AlarmConfig {
    /// Blink count that raises the one-shot drowsy warning (default: 15)
    pub drowsy_blink_threshold: u32,
    /// Blink count that signals a critical condition (default: 30)
    pub critical_blink_threshold: u32,
    /// Minimum gap between alarm starts while one is playing (default: 10s)
    pub cooldown: Duration,
    /// Openness (%) the subject must exceed to auto-recover (default: 80)
    pub recover_openness: u8,
    /// Time since the last blink required to auto-recover (default: 5s)
    pub recover_idle: Duration,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self::from(&Thresholds::default())
    }
}

impl From<&Thresholds> for AlarmConfig {
    fn from(thresholds: &Thresholds) -> Self {
        Self {
            drowsy_blink_threshold: thresholds.drowsy_blink_threshold,
            critical_blink_threshold: thresholds.critical_blink_threshold,
            cooldown: thresholds.alarm_cooldown(),
            recover_openness: thresholds.auto_recover_openness,
            recover_idle: thresholds.auto_recover_idle(),
        }
    }
}

/// Outcome of evaluating one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlarmEvaluation {
    /// Command actually sent to the port, if any
    pub command: Option<AlarmCommand>,
    /// The drowsy warning was raised on this frame
    pub drowsy_warning: bool,
    /// Critical blink count reached; the session must end
    pub critical: bool,
}

/// Cooldown-gated alarm trigger with auto-recovery
pub struct AlarmController {
    config: AlarmConfig,
    port: Box<dyn AlarmPort>,
    drowsy_warning_given: bool,
    alarm_active: bool,
    /// Time of the last effective start
    last_alarm_time: Option<Duration>,
    starts: usize,
}

impl AlarmController {
    /// Create a new alarm controller driving `port`
    pub fn new(config: AlarmConfig, port: Box<dyn AlarmPort>) -> Self {
        if !port.is_available() {
            debug!("Alarm port {} unavailable, alarm requests are no-ops", port.name());
        }
        Self {
            config,
            port,
            drowsy_warning_given: false,
            alarm_active: false,
            last_alarm_time: None,
            starts: 0,
        }
    }

    /// Apply the threshold and auto-recovery rules for one frame
    pub fn evaluate(
        &mut self,
        status: DrowsinessStatus,
        blink_count: u32,
        openness: u8,
        last_blink_time: Duration,
        now: Duration,
    ) -> AlarmEvaluation {
        let mut evaluation = AlarmEvaluation::default();

        if blink_count >= self.config.drowsy_blink_threshold && !self.drowsy_warning_given {
            info!("DROWSY ALERT! {} blinks detected (status: {})", blink_count, status);
            self.drowsy_warning_given = true;
            evaluation.drowsy_warning = true;
            if self.request_start(now) {
                evaluation.command = Some(AlarmCommand::Start);
            }
        }

        if blink_count >= self.config.critical_blink_threshold {
            warn!("CRITICAL! {} blinks detected", blink_count);
            evaluation.critical = true;
            if self.request_start(now) {
                evaluation.command = Some(AlarmCommand::Start);
            }
            return evaluation;
        }

        let idle = now.saturating_sub(last_blink_time);
        if self.drowsy_warning_given
            && openness > self.config.recover_openness
            && idle > self.config.recover_idle
            && self.request_stop()
        {
            info!(
                "Subject appears alert again after {:.1}s without blinking, alarm stopped",
                idle.as_secs_f64()
            );
            evaluation.command = Some(AlarmCommand::Stop);
        }

        evaluation
    }

    /// Start the alarm unless a playing alarm is still within its cooldown.
    ///
    /// The cooldown only gates restarts of an active alarm; an idle alarm
    /// starts immediately. Returns whether the alarm was started.
    pub fn request_start(&mut self, now: Duration) -> bool {
        if !self.port.is_available() {
            debug!("Alarm start suppressed: port unavailable");
            return false;
        }

        let cooled_down = match self.last_alarm_time {
            Some(last) => now.saturating_sub(last) > self.config.cooldown,
            None => true,
        };

        if !cooled_down && self.alarm_active {
            debug!("Alarm start suppressed: in cooldown period");
            return false;
        }

        self.port.start_looping();
        self.alarm_active = true;
        self.last_alarm_time = Some(now);
        self.starts += 1;
        info!("Alarm started (count: {})", self.starts);
        true
    }

    /// Stop the alarm if it is playing. Returns whether a stop was issued.
    pub fn request_stop(&mut self) -> bool {
        if !self.alarm_active {
            return false;
        }
        self.port.stop();
        self.alarm_active = false;
        info!("Alarm stopped");
        true
    }

    /// Clear the drowsy warning and silence the alarm.
    ///
    /// The last start time is kept.
    pub fn reset(&mut self) {
        self.drowsy_warning_given = false;
        self.request_stop();
    }

    pub fn is_active(&self) -> bool {
        self.alarm_active
    }

    pub fn drowsy_warning_given(&self) -> bool {
        self.drowsy_warning_given
    }

    pub fn last_alarm_time(&self) -> Option<Duration> {
        self.last_alarm_time
    }

    /// Number of effective starts
    pub fn starts(&self) -> usize {
        self.starts
    }

    pub fn config(&self) -> &AlarmConfig {
        &self.config
    }
}

impl std::fmt::Debug for AlarmController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlarmController")
            .field("config", &self.config)
            .field("port", &self.port.name())
            .field("drowsy_warning_given", &self.drowsy_warning_given)
            .field("alarm_active", &self.alarm_active)
            .field("last_alarm_time", &self.last_alarm_time)
            .field("starts", &self.starts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{RecordingAlarm, SilentAlarm};
    use proptest::prelude::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn controller() -> (AlarmController, RecordingAlarm) {
        let port = RecordingAlarm::new();
        let controller = AlarmController::new(AlarmConfig::default(), Box::new(port.clone()));
        (controller, port)
    }

    #[test]
    fn test_cooldown_blocks_restart_of_active_alarm() {
        let (mut alarm, port) = controller();

        assert!(alarm.request_start(secs(100)));
        assert!(!alarm.request_start(secs(105)));
        assert!(!alarm.request_start(secs(110)));
        assert!(alarm.request_start(secs(111)));

        assert_eq!(port.count(AlarmCommand::Start), 2);
        assert_eq!(alarm.last_alarm_time(), Some(secs(111)));
    }

    #[test]
    fn test_idle_alarm_skips_cooldown() {
        let (mut alarm, _port) = controller();

        assert!(alarm.request_start(secs(0)));
        assert!(alarm.request_stop());
        assert!(alarm.request_start(secs(3)));
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let (mut alarm, port) = controller();
        assert!(!alarm.request_stop());
        assert!(port.commands().is_empty());
    }

    #[test]
    fn test_silent_port_never_starts() {
        let mut alarm = AlarmController::new(AlarmConfig::default(), Box::new(SilentAlarm));
        assert!(!alarm.request_start(secs(0)));
        assert!(!alarm.is_active());

        let eval = alarm.evaluate(DrowsinessStatus::Drowsy, 15, 50, secs(0), secs(1));
        assert!(eval.drowsy_warning);
        assert_eq!(eval.command, None);
    }

    #[test]
    fn test_drowsy_warning_fires_once() {
        let (mut alarm, port) = controller();

        let first = alarm.evaluate(DrowsinessStatus::Drowsy, 15, 50, secs(20), secs(20));
        assert!(first.drowsy_warning);
        assert_eq!(first.command, Some(AlarmCommand::Start));
        assert!(alarm.drowsy_warning_given());

        alarm.request_stop();
        let second = alarm.evaluate(DrowsinessStatus::Drowsy, 16, 50, secs(21), secs(40));
        assert!(!second.drowsy_warning);
        assert_eq!(second.command, None);
        assert_eq!(port.count(AlarmCommand::Start), 1);
    }

    #[test]
    fn test_critical_signals_and_starts() {
        let (mut alarm, _port) = controller();

        let eval = alarm.evaluate(DrowsinessStatus::Drowsy, 30, 50, secs(5), secs(5));
        assert!(eval.critical);
        assert!(eval.drowsy_warning);
        assert_eq!(eval.command, Some(AlarmCommand::Start));
        assert_eq!(alarm.starts(), 1);
    }

    #[test]
    fn test_auto_recovery() {
        let (mut alarm, port) = controller();
        alarm.evaluate(DrowsinessStatus::Drowsy, 15, 50, secs(10), secs(10));
        assert!(alarm.is_active());

        // Only 5s idle: not yet
        let eval = alarm.evaluate(DrowsinessStatus::Drowsy, 15, 90, secs(10), secs(15));
        assert_eq!(eval.command, None);

        let eval = alarm.evaluate(DrowsinessStatus::Drowsy, 15, 90, secs(10), secs(16));
        assert_eq!(eval.command, Some(AlarmCommand::Stop));
        assert!(!alarm.is_active());
        assert!(alarm.drowsy_warning_given());
        assert_eq!(port.commands(), vec![AlarmCommand::Start, AlarmCommand::Stop]);
    }

    #[test]
    fn test_auto_recovery_needs_high_openness() {
        let (mut alarm, _port) = controller();
        alarm.evaluate(DrowsinessStatus::Drowsy, 15, 50, secs(10), secs(10));

        let eval = alarm.evaluate(DrowsinessStatus::Drowsy, 15, 80, secs(10), secs(30));
        assert_eq!(eval.command, None);
        assert!(alarm.is_active());
    }

    #[test]
    fn test_reset_keeps_last_alarm_time() {
        let (mut alarm, port) = controller();
        alarm.evaluate(DrowsinessStatus::Drowsy, 15, 50, secs(7), secs(7));

        alarm.reset();
        assert!(!alarm.drowsy_warning_given());
        assert!(!alarm.is_active());
        assert_eq!(alarm.last_alarm_time(), Some(secs(7)));
        assert_eq!(port.count(AlarmCommand::Stop), 1);

        // The warning can fire again after a reset
        let eval = alarm.evaluate(DrowsinessStatus::Drowsy, 15, 50, secs(8), secs(8));
        assert!(eval.drowsy_warning);
    }

    proptest! {
        #[test]
        fn starts_within_cooldown_are_exclusive(
            t1 in 0_u64..10_000,
            gap_ms in 0_u64..=10_000,
        ) {
            let (mut alarm, _port) = controller();
            let first = Duration::from_millis(t1 * 1000);
            let second = first + Duration::from_millis(gap_ms);

            let a = alarm.request_start(first);
            let b = alarm.request_start(second);
            prop_assert!(!(a && b));
        }
    }
}
