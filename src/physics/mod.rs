pub mod drivetrain;
pub mod limiter;
pub mod mixture;
pub mod thermal;
pub mod torque;
pub mod turbo;

pub use limiter::{FUEL_CUT_TORQUE, LIMITER_ENGAGE_MARGIN, LIMITER_RELEASE_MARGIN};
pub use torque::{TorqueCurve, TorqueCurveError};
