use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use log::{error, info};

use turbo_sim::driver::{CruiseControl, Driver, Keyframe, ScriptedDriver, ShiftDriver, ThrottleBlips};
use turbo_sim::io::{self, RunSummary};
use turbo_sim::sim::event::EventKind;
use turbo_sim::{simulate_with, EngineConfig, Run};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Scenario {
    /// Standing start, full throttle, upshift at 7000 rpm
    Launch,
    /// Accelerate and hold 90 km/h with the speed controller
    Cruise,
    /// Rev and snap-close the throttle in neutral
    Blips,
    /// Full throttle up a grade in third until the coolant limit trips
    Overheat,
}

/// Headless turbocharged engine and drivetrain simulation.
#[derive(Debug, Parser)]
#[command(name = "turbo-sim", version, about)]
struct Args {
    #[arg(short, long, value_enum, default_value_t = Scenario::Launch)]
    scenario: Scenario,

    /// Simulated seconds
    #[arg(short, long, default_value_t = 20.0)]
    duration: f64,

    /// Seed for the backfire draws
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// INI calibration overriding the default engine
    #[arg(short, long)]
    calibration: Option<PathBuf>,

    /// Write the telemetry trace as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Write the run summary as JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn driver_for(scenario: Scenario) -> Box<dyn Driver> {
    match scenario {
        Scenario::Launch => Box::new(ShiftDriver::default()),
        Scenario::Cruise => Box::new(CruiseControl::new(90.0)),
        Scenario::Blips => Box::new(ThrottleBlips::default()),
        Scenario::Overheat => Box::new(ScriptedDriver::new(vec![Keyframe::at(0.0)
            .throttle(1.0)
            .load(0.5)
            .gear(3)])),
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.calibration {
        Some(path) => io::load_calibration(path)?,
        None => EngineConfig::default(),
    };

    let mut driver = driver_for(args.scenario);
    let run = simulate_with(&config, driver.as_mut(), args.duration, args.seed);
    let summary = RunSummary::from_run(driver.name(), &run);

    print_report(args, &config, &run, &summary);

    if let Some(path) = &args.csv {
        io::write_telemetry_file(path, &run.telemetry)?;
        info!("Telemetry written to {:?} ({} rows)", path, run.telemetry.len());
    }
    if let Some(path) = &args.json {
        io::write_summary_file(path, &summary)?;
        info!("Summary written to {:?}", path);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

fn print_report(args: &Args, config: &EngineConfig, run: &Run, summary: &RunSummary) {
    println!();
    println!("====================================================================");
    println!("  TURBO ENGINE SIMULATION — {:?} ({})", args.scenario, summary.driver);
    println!("====================================================================");
    println!();
    println!("  Calibration");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Idle:          {:>8.0} rpm   Redline:      {:>8.0} rpm",
        config.idle_rpm(),
        config.redline()
    );
    println!(
        "  Max boost:     {:>8.2} bar   Spool rate:   {:>8.2} bar/s",
        config.max_boost(),
        config.spool_rate()
    );
    println!(
        "  Gears:         {:>8}       Final drive:  {:>8.2}",
        config.gear_count(),
        config.final_drive()
    );
    println!(
        "  Mass:          {:>8.0} kg    Coolant max:  {:>8.0} °C",
        config.vehicle_mass(),
        config.coolant_max()
    );
    println!();

    println!("  Events");
    println!("  ──────────────────────────────────────────────────────────────────");
    let mut shown = 0;
    for event in &run.events {
        let label = match event.kind {
            EventKind::Backfire => "BACKFIRE".to_owned(),
            EventKind::FuelCutEngaged => "FUEL CUT".to_owned(),
            EventKind::FuelCutReleased => continue,
            EventKind::LimpModeEngaged => "LIMP MODE".to_owned(),
            EventKind::GearChanged { from, to } => format!("GEAR {from}->{to}"),
            EventKind::SpeedReached { kmh } => format!("{kmh:.0} KM/H"),
        };
        shown += 1;
        if shown > 25 {
            continue;
        }
        let t = &event.telemetry;
        println!(
            "  {:<10} t={:>6.2}s   rpm={:>6.0}   boost={:>5.2}   speed={:>6.1} km/h",
            label, event.time, t.rpm, t.boost, t.speed_kmh
        );
    }
    if shown > 25 {
        println!("  ... {} more", shown - 25);
    }
    if shown == 0 {
        println!("  (none)");
    }
    println!();

    println!("  Performance Summary");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!("  Peak rpm:      {:>8.0}", summary.peak_rpm);
    println!("  Peak boost:    {:>8.2} bar", summary.peak_boost_bar);
    println!("  Peak torque:   {:>8.0} Nm", summary.peak_torque_nm);
    println!("  Top speed:     {:>8.1} km/h", summary.top_speed_kmh);
    match summary.zero_to_100_s {
        Some(t) => println!("  0-100 km/h:    {:>8.2} s", t),
        None => println!("  0-100 km/h:         n/a"),
    }
    println!("  Peak coolant:  {:>8.1} °C", summary.peak_coolant_c);
    println!(
        "  Backfires:     {:>8}       Fuel cuts:    {:>8}",
        summary.backfires, summary.fuel_cut_engagements
    );
    if let Some(t) = summary.limp_mode_at_s {
        println!("  Limp mode:     t={:.2}s (throttle capped)", t);
    }
    println!();

    // -----------------------------------------------------------------------
    // Telemetry table (sampled)
    // -----------------------------------------------------------------------
    println!("  Telemetry");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>6}  {:>6}  {:>4}  {:>5}  {:>6}  {:>7}  {:>6}  {:>5}",
        "t (s)", "rpm", "gear", "thr", "boost", "km/h", "°C", "flags"
    );
    println!("  {}", "─".repeat(60));

    let trace = &run.telemetry;
    let sample_interval = (trace.len() / 30).max(1);
    for (i, t) in trace.iter().enumerate() {
        if i % sample_interval != 0 && i != trace.len() - 1 {
            continue;
        }
        let flags = format!(
            "{}{}{}",
            if t.fuel_cut { "C" } else { "" },
            if t.limp_mode { "L" } else { "" },
            if t.backfire { "B" } else { "" },
        );
        println!(
            "  {:>6.2}  {:>6.0}  {:>4}  {:>5.2}  {:>6.2}  {:>7.1}  {:>6.1}  {:>5}",
            t.time, t.rpm, t.gear, t.eff_throttle, t.boost, t.speed_kmh, t.coolant_temp, flags
        );
    }
    println!();
}
