//! Display hysteresis for magnetic field strength

/// Whole-µT field strength for display, damped against sudden drops
///
/// The first reading is taken as is. After that a reading replaces the
/// displayed value unless it falls more than [`FieldStrengthGauge::DROP_LIMIT`]
/// below it. Rises always pass through. Cycles that report 0 (no new
/// magnetometer sample) are held back the same way once the display is at
/// 4 µT or above.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldStrengthGauge {
    displayed: i32,
}

impl FieldStrengthGauge {
    pub const DROP_LIMIT: f32 = 4.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a field strength in µT and return the value to display
    pub fn update(&mut self, magnetic_field: f32) -> i32 {
        if self.displayed == 0 || (self.displayed as f32 - magnetic_field) < Self::DROP_LIMIT {
            self.displayed = magnetic_field.round() as i32;
        }
        self.displayed
    }

    pub fn displayed(&self) -> i32 {
        self.displayed
    }
}
