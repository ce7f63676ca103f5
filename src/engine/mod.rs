pub mod config;
pub mod state;

pub use config::{ConfigError, EngineConfig, EngineConfigBuilder};
pub use state::{ControlInput, Shift, SimulationState, Telemetry};
