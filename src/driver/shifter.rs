use crate::engine::state::{ControlInput, Shift, Telemetry};
use super::Driver;

// ---------------------------------------------------------------------------
// Drag-strip driver: pinned throttle, upshift at a set rpm
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ShiftDriver {
    pub throttle: f64,
    pub shift_rpm: f64,
    pub top_gear: u8,
    /// Minimum time between shifts (s), so the clutch can pull rpm down.
    pub settle_time: f64,
    since_shift: f64,
}

impl ShiftDriver {
    pub fn new(shift_rpm: f64) -> Self {
        Self {
            throttle: 1.0,
            shift_rpm,
            top_gear: u8::MAX,
            settle_time: 0.4,
            since_shift: 0.0,
        }
    }

    pub fn with_throttle(mut self, throttle: f64) -> Self {
        self.throttle = throttle;
        self
    }

    /// Stop upshifting past this gear.
    pub fn with_top_gear(mut self, gear: u8) -> Self {
        self.top_gear = gear;
        self
    }
}

impl Default for ShiftDriver {
    fn default() -> Self {
        Self::new(7000.0)
    }
}

impl Driver for ShiftDriver {
    fn control(&mut self, telemetry: &Telemetry, dt: f64) -> ControlInput {
        self.since_shift += dt;

        let wants_up = telemetry.gear == 0
            || (telemetry.rpm >= self.shift_rpm
                && telemetry.gear < self.top_gear
                && self.since_shift >= self.settle_time);

        let shift = if wants_up {
            self.since_shift = 0.0;
            Shift::Up
        } else {
            Shift::Hold
        };
        ControlInput::throttle(self.throttle).with_shift(shift)
    }

    fn reset(&mut self) {
        self.since_shift = 0.0;
    }

    fn name(&self) -> &str {
        "ShiftDriver"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::sim::Simulation;

    #[test]
    fn engages_first_from_neutral() {
        let mut d = ShiftDriver::default();
        let t = Simulation::new(EngineConfig::default(), 1).telemetry();
        assert_eq!(d.control(&t, 0.01).shift, Shift::Up);
    }

    #[test]
    fn waits_for_settle_time_between_shifts() {
        let mut d = ShiftDriver::new(6000.0);
        let mut t = Simulation::new(EngineConfig::default(), 1).telemetry();
        t.gear = 2;
        t.rpm = 6500.0;
        assert_eq!(d.control(&t, 0.5).shift, Shift::Up);
        assert_eq!(d.control(&t, 0.1).shift, Shift::Hold);
        assert_eq!(d.control(&t, 0.4).shift, Shift::Up);
    }

    #[test]
    fn respects_top_gear() {
        let mut d = ShiftDriver::new(6000.0).with_top_gear(3);
        let mut t = Simulation::new(EngineConfig::default(), 1).telemetry();
        t.gear = 3;
        t.rpm = 7000.0;
        assert_eq!(d.control(&t, 1.0).shift, Shift::Hold);
    }
}
