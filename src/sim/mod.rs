pub mod clock;
pub mod event;
pub mod random;
pub mod runner;
pub mod step;

pub use clock::{FixedTimestep, DT, TICK_RATE};
pub use random::{FixedDraws, RandomSource};
pub use runner::{run_driver, simulate, simulate_with, Run, Simulation};
pub use step::{step, StepOutcome};
