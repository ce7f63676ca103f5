use crate::engine::config::EngineConfig;
use crate::engine::state::{ControlInput, Shift, SimulationState};
use crate::physics::{drivetrain, limiter, thermal, turbo};
use crate::physics::limiter::FUEL_CUT_TORQUE;
use super::random::RandomSource;

// ---------------------------------------------------------------------------
// Tuned constants
// ---------------------------------------------------------------------------

/// Throttle drop within one tick that can light unburnt fuel in the exhaust.
pub const BACKFIRE_THROTTLE_DROP: f64 = 0.30;
pub const BACKFIRE_MIN_RPM: f64 = 4500.0;
pub const BACKFIRE_PROBABILITY: f64 = 0.40;

/// Throttle ceiling while in limp mode.
pub const LIMP_THROTTLE_CAP: f64 = 0.5;

/// What a tick produced besides the new state.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Backfire this tick only; never carried over.
    pub backfire: bool,
    /// Throttle the torque model actually saw.
    pub eff_throttle: f64,
}

pub fn effective_throttle(throttle: f64, limp_mode: bool) -> f64 {
    if limp_mode {
        throttle.min(LIMP_THROTTLE_CAP)
    } else {
        throttle
    }
}

/// Apply one lever movement, clamped to neutral..top gear.
pub fn shift_gear(gear: u8, shift: Shift, gear_count: u8) -> u8 {
    match shift {
        Shift::Up => gear.saturating_add(1).min(gear_count),
        Shift::Down => gear.saturating_sub(1),
        Shift::Hold => gear.min(gear_count),
    }
}

/// True when the lift-off and rpm conditions for a backfire both hold.
pub fn backfire_armed(previous_throttle: f64, throttle: f64, rpm: f64) -> bool {
    previous_throttle - throttle > BACKFIRE_THROTTLE_DROP && rpm > BACKFIRE_MIN_RPM
}

// ---------------------------------------------------------------------------
// Fixed-timestep update
// ---------------------------------------------------------------------------

/// Advance `state` by one tick of length `dt`.
///
/// Order within the tick: gear, effective throttle, turbo, backfire check,
/// torque, rev limiter, drivetrain, thermal. The limiter and torque model
/// read the rpm the tick started with.
///
/// Never fails. Out-of-range inputs are clamped; a non-positive or
/// non-finite `dt` leaves the state untouched. `input.reset` is ignored here
/// and handled by the owner of the state (see [`Simulation`]).
///
/// [`Simulation`]: super::runner::Simulation
pub fn step<R: RandomSource + ?Sized>(
    state: &mut SimulationState,
    config: &EngineConfig,
    input: &ControlInput,
    dt: f64,
    rng: &mut R,
) -> StepOutcome {
    let throttle = input.clamped_throttle();

    if !(dt > 0.0 && dt.is_finite()) {
        return StepOutcome {
            backfire: false,
            eff_throttle: effective_throttle(throttle, state.limp_mode),
        };
    }

    let rpm = state.rpm;
    let redline = config.redline();
    let max_boost = config.max_boost();

    // 1. Gear
    state.gear = shift_gear(state.gear, input.shift, config.gear_count());

    // 2. Throttle
    let eff_throttle = effective_throttle(throttle, state.limp_mode);

    // 3. Turbo
    state.target_boost = turbo::target_boost(eff_throttle, rpm, max_boost, redline);
    state.boost = turbo::spool(
        state.boost,
        state.target_boost,
        rpm,
        config.spool_rate(),
        max_boost,
        redline,
        dt,
    );

    // 4. Backfire (draw only when armed)
    let backfire = backfire_armed(state.previous_throttle, throttle, rpm)
        && rng.next_unit() < BACKFIRE_PROBABILITY;

    // 5. Torque
    let mut torque = config.torque_curve().at(rpm)
        * turbo::boost_multiplier(state.boost, max_boost)
        * eff_throttle;

    // 6. Rev limiter
    state.fuel_cut = limiter::next_fuel_cut(state.fuel_cut, rpm, redline);
    if state.fuel_cut {
        torque = FUEL_CUT_TORQUE;
    }
    state.torque = torque;

    // 7. Drivetrain
    let ratio = config.gear_ratio(state.gear);
    let free = drivetrain::free_spin_rpm(rpm, torque, config, dt);
    let drive = drivetrain::drive_force(torque, ratio, config);
    state.vehicle_speed = drivetrain::next_speed(
        state.vehicle_speed,
        drive,
        input.brake,
        input.clamped_load(),
        config,
        dt,
    );
    let coupled = match ratio {
        Some(ratio) => {
            let wheel = drivetrain::wheel_rpm(state.vehicle_speed, ratio, config);
            drivetrain::coupled_rpm(free, wheel, config)
        }
        None => free,
    };
    state.rpm = drivetrain::idle_governor(coupled, config, dt).max(0.0);

    // 8. Thermal
    state.coolant_temp =
        thermal::next_coolant_temp(state.coolant_temp, torque, eff_throttle, config, dt);
    if thermal::is_overheated(state.coolant_temp, config) {
        state.limp_mode = true;
    }

    state.previous_throttle = throttle;

    StepOutcome { backfire, eff_throttle }
}
