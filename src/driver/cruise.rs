use crate::engine::state::{ControlInput, Shift, Telemetry};
use super::pid::Pid;
use super::Driver;

// ---------------------------------------------------------------------------
// Cruise control: PID on road speed, with a simple gear selector
// ---------------------------------------------------------------------------

const UPSHIFT_RPM: f64 = 4200.0;
const DOWNSHIFT_RPM: f64 = 1600.0;
const SHIFT_INTERVAL: f64 = 0.6; // s
const BRAKE_THRESHOLD: f64 = -0.5;

#[derive(Debug, Clone)]
pub struct CruiseControl {
    pub target_kmh: f64,
    pub speed_pid: Pid,
    since_shift: f64,
}

impl CruiseControl {
    pub fn new(target_kmh: f64) -> Self {
        Self {
            target_kmh,
            // Error in km/h; integral bounded so ki * limit stays under full throttle
            speed_pid: Pid::new(0.08, 0.03, 0.0).with_integral_limit(20.0),
            since_shift: SHIFT_INTERVAL,
        }
    }

    fn select_gear(&mut self, telemetry: &Telemetry, dt: f64) -> Shift {
        self.since_shift += dt;
        if telemetry.gear == 0 {
            return Shift::Up;
        }
        if self.since_shift < SHIFT_INTERVAL {
            return Shift::Hold;
        }
        let shift = if telemetry.rpm > UPSHIFT_RPM {
            Shift::Up
        } else if telemetry.rpm < DOWNSHIFT_RPM && telemetry.gear > 1 && telemetry.speed_kmh > 5.0 {
            Shift::Down
        } else {
            Shift::Hold
        };
        if shift != Shift::Hold {
            self.since_shift = 0.0;
        }
        shift
    }
}

impl Driver for CruiseControl {
    fn control(&mut self, telemetry: &Telemetry, dt: f64) -> ControlInput {
        let error = self.target_kmh - telemetry.speed_kmh;
        let u = self.speed_pid.update(error, dt);
        let shift = self.select_gear(telemetry, dt);

        ControlInput::throttle(u.clamp(0.0, 1.0))
            .with_brake(u < BRAKE_THRESHOLD)
            .with_shift(shift)
    }

    fn reset(&mut self) {
        self.speed_pid.reset();
        self.since_shift = SHIFT_INTERVAL;
    }

    fn name(&self) -> &str {
        "CruiseControl"
    }
}
