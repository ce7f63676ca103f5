use crate::engine::state::{ControlInput, Shift, Telemetry};
use super::Driver;

// ---------------------------------------------------------------------------
// Scripted driver: time-keyed throttle / brake / gear program
// ---------------------------------------------------------------------------

/// From `time` onward, hold these pedal positions. `gear`, when set, is the
/// gear the driver shifts toward one step per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Keyframe {
    pub time: f64,
    pub throttle: f64,
    pub brake: bool,
    pub load: f64,
    pub gear: Option<u8>,
}

impl Keyframe {
    pub fn at(time: f64) -> Self {
        Self { time, throttle: 0.0, brake: false, load: 0.0, gear: None }
    }

    pub fn throttle(mut self, v: f64) -> Self { self.throttle = v; self }
    pub fn brake(mut self, v: bool) -> Self { self.brake = v; self }
    pub fn load(mut self, v: f64) -> Self { self.load = v; self }
    pub fn gear(mut self, v: u8) -> Self { self.gear = Some(v); self }
}

#[derive(Debug, Clone)]
pub struct ScriptedDriver {
    keyframes: Vec<Keyframe>,
}

impl ScriptedDriver {
    /// Keyframes are sorted by time; before the first one the pedals rest.
    pub fn new(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keyframes }
    }

    fn active(&self, time: f64) -> Option<&Keyframe> {
        self.keyframes.iter().take_while(|k| k.time <= time).last()
    }
}

impl Driver for ScriptedDriver {
    fn control(&mut self, telemetry: &Telemetry, _dt: f64) -> ControlInput {
        let Some(frame) = self.active(telemetry.time) else {
            return ControlInput::default();
        };
        let shift = match frame.gear {
            Some(g) if g > telemetry.gear => Shift::Up,
            Some(g) if g < telemetry.gear => Shift::Down,
            _ => Shift::Hold,
        };
        ControlInput::throttle(frame.throttle)
            .with_brake(frame.brake)
            .with_load(frame.load)
            .with_shift(shift)
    }

    fn name(&self) -> &str {
        "Scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineConfig;
    use crate::sim::Simulation;

    #[test]
    fn picks_latest_keyframe() {
        let mut d = ScriptedDriver::new(vec![
            Keyframe::at(1.0).throttle(1.0),
            Keyframe::at(0.0).throttle(0.2),
            Keyframe::at(2.0).brake(true),
        ]);
        let mut t = Simulation::new(EngineConfig::default(), 1).telemetry();

        t.time = 0.5;
        assert_eq!(d.control(&t, 0.01).throttle, 0.2);
        t.time = 1.5;
        assert_eq!(d.control(&t, 0.01).throttle, 1.0);
        t.time = 3.0;
        let input = d.control(&t, 0.01);
        assert!(input.brake);
        assert_eq!(input.throttle, 0.0);
    }

    #[test]
    fn rest_before_first_keyframe() {
        let mut d = ScriptedDriver::new(vec![Keyframe::at(5.0).throttle(1.0)]);
        let t = Simulation::new(EngineConfig::default(), 1).telemetry();
        assert_eq!(d.control(&t, 0.01), ControlInput::default());
    }

    #[test]
    fn walks_toward_requested_gear() {
        let mut d = ScriptedDriver::new(vec![Keyframe::at(0.0).gear(3)]);
        let mut t = Simulation::new(EngineConfig::default(), 1).telemetry();
        t.gear = 1;
        assert_eq!(d.control(&t, 0.01).shift, Shift::Up);
        t.gear = 4;
        assert_eq!(d.control(&t, 0.01).shift, Shift::Down);
        t.gear = 3;
        assert_eq!(d.control(&t, 0.01).shift, Shift::Hold);
    }
}
