//! Plugging a hand-written driver into the simulation loop.
//!
//! The driver below holds a fixed rpm window in second gear: it feeds
//! throttle below 4000 rpm, lifts above 5500, and so triggers the odd
//! backfire on each lift-off.

use turbo_sim::driver::Driver;
use turbo_sim::engine::{ControlInput, Shift, Telemetry};
use turbo_sim::sim::event::EventKind;
use turbo_sim::{simulate_with, EngineConfig};

struct RevHanger {
    gear: u8,
    on: bool,
}

impl Driver for RevHanger {
    fn control(&mut self, telemetry: &Telemetry, _dt: f64) -> ControlInput {
        let shift = match telemetry.gear.cmp(&self.gear) {
            std::cmp::Ordering::Less => Shift::Up,
            std::cmp::Ordering::Greater => Shift::Down,
            std::cmp::Ordering::Equal => Shift::Hold,
        };
        if telemetry.rpm > 5500.0 {
            self.on = false;
        } else if telemetry.rpm < 4000.0 {
            self.on = true;
        }
        ControlInput::throttle(if self.on { 1.0 } else { 0.0 })
            .with_shift(shift)
            .with_load(0.3)
    }

    fn reset(&mut self) {
        self.on = true;
    }

    fn name(&self) -> &str {
        "RevHanger"
    }
}

fn main() {
    let mut driver = RevHanger { gear: 2, on: true };
    let run = simulate_with(&EngineConfig::default(), &mut driver, 30.0, 1234);

    let backfires = run.events.iter().filter(|e| e.kind == EventKind::Backfire).count();
    let Some(last) = run.telemetry.last() else {
        return;
    };
    println!("{}: {} backfires in {:.0} s", driver.name(), backfires, last.time);
    println!(
        "final: {:.0} rpm, {:.1} km/h, coolant {:.1} °C{}",
        last.rpm,
        last.speed_kmh,
        last.coolant_temp,
        if last.limp_mode { " (limp mode)" } else { "" }
    );
}
