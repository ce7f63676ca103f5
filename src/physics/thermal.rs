use crate::engine::config::EngineConfig;

// ---------------------------------------------------------------------------
// Coolant temperature
// ---------------------------------------------------------------------------

/// Heat input (°C/s). Only positive torque heats the engine; fuel-cut
/// torque contributes nothing.
pub fn heat_generation(torque: f64, eff_throttle: f64, config: &EngineConfig) -> f64 {
    config.heat_coefficient() * torque.max(0.0) * eff_throttle.max(0.0)
}

/// Radiator rejection (°C/s), proportional to the rise over ambient.
pub fn cooling(coolant_temp: f64, config: &EngineConfig) -> f64 {
    config.cooling_coefficient()
        * (coolant_temp - config.ambient_temp())
        * config.cooling_efficiency()
}

/// Integrate coolant temperature one tick, floored at ambient.
pub fn next_coolant_temp(
    coolant_temp: f64,
    torque: f64,
    eff_throttle: f64,
    config: &EngineConfig,
    dt: f64,
) -> f64 {
    let rate = heat_generation(torque, eff_throttle, config) - cooling(coolant_temp, config);
    (coolant_temp + rate * dt).max(config.ambient_temp())
}

pub fn is_overheated(coolant_temp: f64, config: &EngineConfig) -> bool {
    coolant_temp > config.coolant_max()
}
