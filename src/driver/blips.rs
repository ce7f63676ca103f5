use crate::engine::state::{ControlInput, Telemetry};
use super::Driver;

/// Revs the engine in neutral and snaps the throttle shut on a fixed
/// cycle. Each lift-off above the backfire rpm is a backfire opportunity.
#[derive(Debug, Clone)]
pub struct ThrottleBlips {
    pub on_time: f64,
    pub off_time: f64,
    phase: f64,
}

impl ThrottleBlips {
    pub fn new(on_time: f64, off_time: f64) -> Self {
        Self { on_time: on_time.max(0.0), off_time: off_time.max(0.0), phase: 0.0 }
    }
}

impl Default for ThrottleBlips {
    fn default() -> Self {
        Self::new(0.8, 0.4)
    }
}

impl Driver for ThrottleBlips {
    fn control(&mut self, _telemetry: &Telemetry, dt: f64) -> ControlInput {
        let period = self.on_time + self.off_time;
        if period <= 0.0 {
            return ControlInput::default();
        }
        let on = self.phase < self.on_time;
        self.phase = (self.phase + dt) % period;
        ControlInput::throttle(if on { 1.0 } else { 0.0 })
    }

    fn reset(&mut self) {
        self.phase = 0.0;
    }

    fn name(&self) -> &str {
        "ThrottleBlips"
    }
}
