pub mod driver;
pub mod engine;
pub mod io;
pub mod physics;
pub mod sim;

pub use driver::Driver;
pub use engine::{ConfigError, ControlInput, EngineConfig, Shift, SimulationState, Telemetry};
pub use sim::{simulate, simulate_with, Run, Simulation};
