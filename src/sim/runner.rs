use log::{debug, info, warn};

use crate::driver::{Driver, ShiftDriver};
use crate::engine::config::EngineConfig;
use crate::engine::state::{ControlInput, SimulationState, Telemetry};
use crate::physics::mixture;
use super::clock::DT;
use super::event::{standard_detectors, EventDetector, SimEvent};
use super::random::{self, RandomSource};
use super::step::{self, StepOutcome};

// ---------------------------------------------------------------------------
// Simulation: sole owner and writer of the engine state
// ---------------------------------------------------------------------------

/// Owns the state, the random source and the simulation clock, and applies
/// one control input per fixed tick.
///
/// Readers get `&SimulationState` / [`Telemetry`] between ticks; the borrow
/// checker rules out a read overlapping a step.
#[derive(Debug, Clone)]
pub struct Simulation<R: RandomSource = fastrand::Rng> {
    config: EngineConfig,
    state: SimulationState,
    rng: R,
    dt: f64,
    time: f64,
    tick: u64,
    last_input: ControlInput,
    last_outcome: StepOutcome,
}

impl Simulation<fastrand::Rng> {
    /// Seeded simulation at the default tick rate.
    pub fn new(config: EngineConfig, seed: u64) -> Self {
        Self::with_rng(config, random::seeded(seed))
    }
}

impl<R: RandomSource> Simulation<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Self {
        let state = SimulationState::idle(&config);
        Self {
            config,
            state,
            rng,
            dt: DT,
            time: 0.0,
            tick: 0,
            last_input: ControlInput::default(),
            last_outcome: StepOutcome::default(),
        }
    }

    /// Override the tick length. Ignored unless positive and finite.
    pub fn with_timestep(mut self, dt: f64) -> Self {
        if dt > 0.0 && dt.is_finite() {
            self.dt = dt;
        }
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn dt(&self) -> f64 {
        self.dt
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Back to idle defaults; clears limp mode and the limiter latch.
    pub fn reset(&mut self) {
        self.state = SimulationState::idle(&self.config);
        self.last_outcome = StepOutcome::default();
        info!("engine reset at t={:.2}s", self.time);
    }

    /// Advance one tick with `input` and return the resulting snapshot.
    ///
    /// A reset request reinitialises the state instead of integrating.
    pub fn apply(&mut self, input: &ControlInput) -> Telemetry {
        self.last_input = *input;
        self.time += self.dt;
        self.tick += 1;

        if input.reset {
            self.reset();
            return self.telemetry();
        }

        let before = self.state.clone();
        self.last_outcome = step::step(&mut self.state, &self.config, input, self.dt, &mut self.rng);
        self.log_transitions(&before);
        self.telemetry()
    }

    /// Snapshot of the last completed tick.
    pub fn telemetry(&self) -> Telemetry {
        let s = &self.state;
        Telemetry {
            time: self.time,
            tick: self.tick,
            rpm: s.rpm,
            throttle: self.last_input.clamped_throttle(),
            eff_throttle: self.last_outcome.eff_throttle,
            gear: s.gear,
            boost: s.boost,
            target_boost: s.target_boost,
            torque: s.torque,
            afr: mixture::afr_estimate(self.last_outcome.eff_throttle, s.boost, s.fuel_cut),
            speed: s.vehicle_speed,
            speed_kmh: s.speed_kmh(),
            coolant_temp: s.coolant_temp,
            fuel_cut: s.fuel_cut,
            limp_mode: s.limp_mode,
            backfire: self.last_outcome.backfire,
            brake: self.last_input.brake,
        }
    }

    fn log_transitions(&self, before: &SimulationState) {
        let s = &self.state;
        if s.gear != before.gear {
            debug!("gear {} -> {}", before.gear, s.gear);
        }
        if s.fuel_cut != before.fuel_cut {
            debug!(
                "fuel cut {} at {:.0} rpm",
                if s.fuel_cut { "engaged" } else { "released" },
                before.rpm
            );
        }
        if self.last_outcome.backfire {
            debug!("backfire at {:.0} rpm", before.rpm);
        }
        if s.limp_mode && !before.limp_mode {
            warn!(
                "coolant {:.1}°C over limit {:.1}°C, limp mode engaged (throttle capped)",
                s.coolant_temp,
                self.config.coolant_max()
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Batch runs
// ---------------------------------------------------------------------------

/// Telemetry trace and detected events of one run.
#[derive(Debug, Clone, Default)]
pub struct Run {
    pub telemetry: Vec<Telemetry>,
    pub events: Vec<SimEvent>,
}

/// Run `duration` seconds of simulated time with a custom driver.
/// The first sample is the idle state before any input.
pub fn simulate_with(
    config: &EngineConfig,
    driver: &mut dyn Driver,
    duration: f64,
    seed: u64,
) -> Run {
    let mut sim = Simulation::new(config.clone(), seed);
    let mut detectors = standard_detectors();
    run_driver(&mut sim, driver, &mut detectors, duration)
}

/// Run with the default [`ShiftDriver`] (convenience wrapper).
pub fn simulate(config: &EngineConfig, duration: f64, seed: u64) -> Run {
    let mut driver = ShiftDriver::default();
    simulate_with(config, &mut driver, duration, seed)
}

/// Drive an existing simulation for `duration` seconds.
pub fn run_driver<R: RandomSource>(
    sim: &mut Simulation<R>,
    driver: &mut dyn Driver,
    detectors: &mut [Box<dyn EventDetector>],
    duration: f64,
) -> Run {
    let ticks = if duration > 0.0 { (duration / sim.dt()).round() as usize } else { 0 };
    let mut run = Run {
        telemetry: Vec::with_capacity((ticks + 1).min(1_000_000)),
        events: Vec::new(),
    };

    info!("running {} for {:.1}s ({} ticks)", driver.name(), duration, ticks);

    let mut prev = sim.telemetry();
    run.telemetry.push(prev);

    for _ in 0..ticks {
        let input = driver.control(&prev, sim.dt());
        let current = sim.apply(&input);

        for det in detectors.iter_mut() {
            if let Some(kind) = det.check(&prev, &current) {
                run.events.push(SimEvent { time: current.time, kind, telemetry: current });
            }
        }

        run.telemetry.push(current);
        prev = current;
    }

    run
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
