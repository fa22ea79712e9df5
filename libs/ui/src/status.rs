//! Read-only power status consumed by the chrome layout and pages.

/// Empty single-cell Li-ion voltage in millivolts.
pub const CELL_EMPTY_MV: u16 = 3300;
/// Full single-cell Li-ion voltage in millivolts.
pub const CELL_FULL_MV: u16 = 4200;

/// Battery reading at one point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PowerSnapshot {
    /// State of charge, 0..=100.
    pub percent: u8,
    pub voltage_mv: u16,
    pub charging: bool,
}

impl PowerSnapshot {
    /// Snapshot with a voltage interpolated linearly from `percent`.
    #[must_use]
    pub fn from_percent(percent: u8, charging: bool) -> Self {
        let percent = percent.min(100);
        let span = CELL_FULL_MV - CELL_EMPTY_MV;
        Self {
            percent,
            voltage_mv: CELL_EMPTY_MV + span * u16::from(percent) / 100,
            charging,
        }
    }

    /// Voltage in volts, for display.
    #[must_use]
    pub fn volts(&self) -> f32 {
        f32::from(self.voltage_mv) / 1000.0
    }

    /// Whether `other` would render differently in the status icon.
    #[must_use]
    pub fn differs_visibly(&self, other: &Self) -> bool {
        self.percent != other.percent || self.charging != other.charging
    }
}

/// Battery and charger state, polled (no callbacks).
pub trait PowerStatus {
    fn snapshot(&self) -> PowerSnapshot;
}
