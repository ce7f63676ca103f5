use serde::Serialize;

use crate::engine::config::EngineConfig;

// ---------------------------------------------------------------------------
// Mutable physical state, advanced once per tick
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub rpm: f64,
    pub boost: f64,              // bar
    pub target_boost: f64,       // bar
    pub torque: f64,             // Nm at the crank
    pub coolant_temp: f64,       // °C
    pub vehicle_speed: f64,      // m/s
    pub gear: u8,                // 0 = neutral, 1..=N forward
    pub fuel_cut: bool,          // rev limiter latch
    pub limp_mode: bool,         // overheat latch, cleared only by reset
    pub previous_throttle: f64,  // raw throttle of the last tick
}

impl SimulationState {
    /// Engine idling in neutral, cold, undamaged.
    pub fn idle(config: &EngineConfig) -> Self {
        Self {
            rpm: config.idle_rpm(),
            boost: 0.0,
            target_boost: 0.0,
            torque: 0.0,
            coolant_temp: config.ambient_temp(),
            vehicle_speed: 0.0,
            gear: 0,
            fuel_cut: false,
            limp_mode: false,
            previous_throttle: 0.0,
        }
    }

    pub fn speed_kmh(&self) -> f64 {
        self.vehicle_speed * 3.6
    }

    pub fn in_neutral(&self) -> bool {
        self.gear == 0
    }
}

// ---------------------------------------------------------------------------
// Per-tick control input
// ---------------------------------------------------------------------------

/// Gear lever movement for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Shift {
    Down,
    #[default]
    Hold,
    Up,
}

impl Shift {
    /// Map a signed delta onto a single-step shift; magnitude is ignored.
    pub fn from_delta(delta: i32) -> Self {
        match delta.signum() {
            -1 => Shift::Down,
            1 => Shift::Up,
            _ => Shift::Hold,
        }
    }

    pub fn delta(self) -> i32 {
        match self {
            Shift::Down => -1,
            Shift::Hold => 0,
            Shift::Up => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ControlInput {
    pub throttle: f64,  // 0..=1
    pub brake: bool,
    pub shift: Shift,
    pub load: f64,      // 0..=1, grade / trailer load
    pub reset: bool,
}

impl ControlInput {
    pub fn throttle(throttle: f64) -> Self {
        Self { throttle, ..Self::default() }
    }

    pub fn with_brake(mut self, brake: bool) -> Self {
        self.brake = brake;
        self
    }

    pub fn with_shift(mut self, shift: Shift) -> Self {
        self.shift = shift;
        self
    }

    pub fn with_load(mut self, load: f64) -> Self {
        self.load = load;
        self
    }

    pub fn reset() -> Self {
        Self { reset: true, ..Self::default() }
    }

    /// Throttle clamped to [0, 1]; NaN reads as closed.
    pub fn clamped_throttle(&self) -> f64 {
        unit(self.throttle)
    }

    /// Load clamped to [0, 1]; NaN reads as none.
    pub fn clamped_load(&self) -> f64 {
        unit(self.load)
    }
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

// ---------------------------------------------------------------------------
// Observation snapshot
// ---------------------------------------------------------------------------

/// Read-only view of one completed tick for gauges, logs and drivers.
///
/// `backfire` is transient: it describes this tick only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Telemetry {
    pub time: f64,
    pub tick: u64,
    pub rpm: f64,
    pub throttle: f64,
    pub eff_throttle: f64,
    pub gear: u8,
    pub boost: f64,
    pub target_boost: f64,
    pub torque: f64,
    pub afr: f64,
    pub speed: f64,
    pub speed_kmh: f64,
    pub coolant_temp: f64,
    pub fuel_cut: bool,
    pub limp_mode: bool,
    pub backfire: bool,
    pub brake: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_defaults() {
        let cfg = EngineConfig::default();
        let s = SimulationState::idle(&cfg);
        assert_eq!(s.rpm, cfg.idle_rpm());
        assert_eq!(s.boost, 0.0);
        assert_eq!(s.gear, 0);
        assert_eq!(s.coolant_temp, cfg.ambient_temp());
        assert!(!s.limp_mode && !s.fuel_cut);
        assert!(s.in_neutral());
    }

    #[test]
    fn shift_from_delta_uses_sign_only() {
        assert_eq!(Shift::from_delta(-3), Shift::Down);
        assert_eq!(Shift::from_delta(0), Shift::Hold);
        assert_eq!(Shift::from_delta(7), Shift::Up);
        assert_eq!(Shift::Up.delta(), 1);
    }

    #[test]
    fn input_clamps_out_of_range() {
        assert_eq!(ControlInput::throttle(1.7).clamped_throttle(), 1.0);
        assert_eq!(ControlInput::throttle(-0.2).clamped_throttle(), 0.0);
        assert_eq!(ControlInput::throttle(f64::NAN).clamped_throttle(), 0.0);
        assert_eq!(ControlInput::default().with_load(3.0).clamped_load(), 1.0);
    }
}
