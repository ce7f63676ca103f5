//! Standing start with the default calibration and automatic upshifts.
//!
//! ```sh
//! cargo run --example launch
//! ```

use turbo_sim::driver::ShiftDriver;
use turbo_sim::io::RunSummary;
use turbo_sim::sim::event::EventKind;
use turbo_sim::{simulate_with, EngineConfig};

fn main() {
    let config = EngineConfig::default();
    let mut driver = ShiftDriver::new(6800.0);
    let run = simulate_with(&config, &mut driver, 15.0, 7);

    for event in &run.events {
        match event.kind {
            EventKind::GearChanged { from, to } => {
                println!("{:>6.2}s  gear {} -> {} at {:.0} rpm", event.time, from, to, event.telemetry.rpm)
            }
            EventKind::SpeedReached { kmh } => println!("{:>6.2}s  {kmh:.0} km/h", event.time),
            EventKind::LimpModeEngaged => println!("{:>6.2}s  limp mode", event.time),
            _ => {}
        }
    }

    let summary = RunSummary::from_run("ShiftDriver", &run);
    println!();
    println!("top speed {:.1} km/h, peak boost {:.2} bar", summary.top_speed_kmh, summary.peak_boost_bar);
    if let Some(t) = summary.zero_to_100_s {
        println!("0-100 km/h in {t:.2} s");
    }
}
