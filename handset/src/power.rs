//! Simulated handset battery.

use crate::config::BatteryConfig;
use handset_ui::{PowerSnapshot, PowerStatus};
use std::cell::Cell;
use std::time::{Duration, Instant};

/// Battery that drains linearly from a start level, or charges back up
/// at the same rate while the charger is connected.
pub struct SimulatedBattery {
    started: Instant,
    start_percent: f32,
    rate_per_minute: f32,
    charging: Cell<bool>,
}

impl SimulatedBattery {
    #[must_use]
    pub fn new(config: &BatteryConfig) -> Self {
        Self {
            started: Instant::now(),
            start_percent: f32::from(config.start_percent.min(100)),
            rate_per_minute: config.drain_per_minute.max(0.0),
            charging: Cell::new(config.charging),
        }
    }

    pub fn set_charging(&self, charging: bool) {
        self.charging.set(charging);
    }

    /// Reading after `elapsed` time on battery.
    #[must_use]
    pub fn snapshot_after(&self, elapsed: Duration) -> PowerSnapshot {
        let delta = self.rate_per_minute * elapsed.as_secs_f32() / 60.0;
        let charging = self.charging.get();
        let level = if charging {
            self.start_percent + delta
        } else {
            self.start_percent - delta
        };
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "level is clamped to 0..=100 before the cast"
        )]
        let percent = level.clamp(0.0, 100.0).round() as u8;
        PowerSnapshot::from_percent(percent, charging)
    }
}

impl PowerStatus for SimulatedBattery {
    fn snapshot(&self) -> PowerSnapshot {
        self.snapshot_after(self.started.elapsed())
    }
}
