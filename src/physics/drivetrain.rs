use std::f64::consts::PI;

use crate::engine::config::EngineConfig;

pub const G0: f64 = 9.80665;

// ---------------------------------------------------------------------------
// Engine rotational dynamics
// ---------------------------------------------------------------------------

/// Engine rpm one tick ahead with nothing attached to the crank.
pub fn free_spin_rpm(rpm: f64, torque: f64, config: &EngineConfig, dt: f64) -> f64 {
    let net = torque - config.friction() * rpm.max(0.0);
    rpm + net / config.inertia() * dt
}

/// Crank rpm implied by road speed through the selected gear.
pub fn wheel_rpm(speed: f64, gear_ratio: f64, config: &EngineConfig) -> f64 {
    let circumference = 2.0 * PI * config.wheel_radius();
    if circumference <= 0.0 {
        return 0.0;
    }
    speed.max(0.0) / circumference * 60.0 * gear_ratio * config.final_drive()
}

/// Engine rpm with the clutch engaged.
///
/// Below idle the wheels cannot hold the crank (launch / standstill), so the
/// clutch slips and the engine spins free. Above it, engine and wheel
/// speed are blended, which locks the two together over a few ticks
/// without the stiff coupling ringing.
pub fn coupled_rpm(free_rpm: f64, wheel_rpm: f64, config: &EngineConfig) -> f64 {
    if wheel_rpm < config.idle_rpm() {
        return free_rpm;
    }
    let blend = config.engine_blend();
    blend * free_rpm + (1.0 - blend) * wheel_rpm
}

/// Pull rpm back up toward idle when it sags below it.
pub fn idle_governor(rpm: f64, config: &EngineConfig, dt: f64) -> f64 {
    let idle = config.idle_rpm();
    if rpm >= idle {
        return rpm;
    }
    let gain = (config.idle_governor_gain() * dt).min(1.0);
    rpm + (idle - rpm) * gain
}

// ---------------------------------------------------------------------------
// Longitudinal vehicle forces (N)
// ---------------------------------------------------------------------------

/// Tractive force at the contact patch; zero in neutral.
pub fn drive_force(torque: f64, gear_ratio: Option<f64>, config: &EngineConfig) -> f64 {
    match gear_ratio {
        Some(ratio) if config.wheel_radius() > 0.0 => {
            torque * ratio * config.final_drive() / config.wheel_radius()
        }
        _ => 0.0,
    }
}

/// Quadratic aerodynamic drag.
pub fn drag_force(speed: f64, config: &EngineConfig) -> f64 {
    0.5 * config.air_density() * config.drag_coefficient() * config.frontal_area() * speed * speed
}

pub fn rolling_force(config: &EngineConfig) -> f64 {
    G0 * config.rolling_resistance() * config.vehicle_mass()
}

/// Integrate road speed one tick. Braking and resistance never roll the car
/// backwards.
pub fn next_speed(
    speed: f64,
    drive: f64,
    brake_held: bool,
    load: f64,
    config: &EngineConfig,
    dt: f64,
) -> f64 {
    let brake = if brake_held { config.brake_force() } else { 0.0 };
    let road_load = load * config.road_load_force();
    let net = drive - drag_force(speed, config) - rolling_force(config) - brake - road_load;
    (speed + net / config.vehicle_mass() * dt).max(0.0)
}
