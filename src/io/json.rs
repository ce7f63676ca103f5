use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::engine::state::Telemetry;
use crate::sim::event::{EventKind, SimEvent};
use crate::sim::Run;

/// Summary statistics computed from a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub driver: String,
    pub duration_s: f64,
    pub peak_rpm: f64,
    pub peak_boost_bar: f64,
    pub peak_torque_nm: f64,
    pub peak_coolant_c: f64,
    pub top_speed_kmh: f64,
    pub zero_to_100_s: Option<f64>,
    pub backfires: usize,
    pub fuel_cut_engagements: usize,
    pub gear_changes: usize,
    pub limp_mode_at_s: Option<f64>,
}

impl RunSummary {
    /// Compute summary from a run's trace and events.
    pub fn from_run(driver: &str, run: &Run) -> Self {
        let trace = &run.telemetry;
        let peak = |f: fn(&Telemetry) -> f64| trace.iter().map(f).fold(0.0_f64, f64::max);
        let first_event = |pred: fn(&EventKind) -> bool| {
            run.events.iter().find(|e| pred(&e.kind)).map(|e: &SimEvent| e.time)
        };
        let count = |pred: fn(&EventKind) -> bool| run.events.iter().filter(|e| pred(&e.kind)).count();

        RunSummary {
            driver: driver.to_owned(),
            duration_s: trace.last().map_or(0.0, |t| t.time),
            peak_rpm: peak(|t| t.rpm),
            peak_boost_bar: peak(|t| t.boost),
            peak_torque_nm: peak(|t| t.torque),
            peak_coolant_c: peak(|t| t.coolant_temp),
            top_speed_kmh: peak(|t| t.speed_kmh),
            zero_to_100_s: first_event(|k| matches!(k, EventKind::SpeedReached { kmh } if *kmh >= 100.0)),
            backfires: count(|k| *k == EventKind::Backfire),
            fuel_cut_engagements: count(|k| *k == EventKind::FuelCutEngaged),
            gear_changes: count(|k| matches!(k, EventKind::GearChanged { .. })),
            limp_mode_at_s: first_event(|k| *k == EventKind::LimpModeEngaged),
        }
    }
}

/// Write the summary as pretty-printed JSON.
pub fn write_summary<W: Write>(writer: W, summary: &RunSummary) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, summary)
}

/// Write the summary JSON to a file.
pub fn write_summary_file(path: impl AsRef<Path>, summary: &RunSummary) -> std::io::Result<()> {
    let file = std::fs::File::create(path)?;
    write_summary(std::io::BufWriter::new(file), summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::driver::ShiftDriver;
    use crate::engine::EngineConfig;
    use crate::sim::simulate_with;

    #[test]
    fn summary_of_launch() {
        let run = simulate_with(&EngineConfig::default(), &mut ShiftDriver::default(), 10.0, 3);
        let s = RunSummary::from_run("ShiftDriver", &run);
        assert!(s.top_speed_kmh > 100.0);
        assert!(s.zero_to_100_s.is_some());
        assert!(s.gear_changes >= 2);
        assert!(s.peak_boost_bar <= EngineConfig::default().max_boost());
        assert!((s.duration_s - 10.0).abs() < 1e-6);
    }

    #[test]
    fn json_output_is_valid() {
        let run = simulate_with(&EngineConfig::default(), &mut ShiftDriver::default(), 1.0, 3);
        let summary = RunSummary::from_run("Test", &run);

        let mut buf = Vec::new();
        write_summary(&mut buf, &summary).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["driver"], "Test");
        assert!(value["peak_rpm"].as_f64().unwrap() > 900.0);
        assert!(value.get("limp_mode_at_s").is_some());
    }
}
