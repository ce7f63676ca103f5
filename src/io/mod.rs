pub mod calibration;
pub mod csv;
pub mod json;

pub use calibration::{load_calibration, parse_calibration, CalibrationError};
pub use csv::{write_telemetry, write_telemetry_file};
pub use json::{write_summary, write_summary_file, RunSummary};
