pub mod blips;
pub mod cruise;
pub mod pid;
pub mod scripted;
pub mod shifter;

use crate::engine::state::{ControlInput, Telemetry};

pub use blips::ThrottleBlips;
pub use cruise::CruiseControl;
pub use pid::Pid;
pub use scripted::{Keyframe, ScriptedDriver};
pub use shifter::ShiftDriver;

/// Trait for input sources.
///
/// Implement this to plug a custom driver into the simulation loop. The
/// driver sees the last completed tick and decides the next tick's input.
pub trait Driver {
    fn control(&mut self, telemetry: &Telemetry, dt: f64) -> ControlInput;

    /// Reset driver internal state (e.g., PID integrators).
    fn reset(&mut self) {}

    /// Human-readable name for logging/display.
    fn name(&self) -> &str {
        "unnamed"
    }
}
