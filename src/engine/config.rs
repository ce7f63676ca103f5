use thiserror::Error;

use crate::physics::limiter::LIMITER_RELEASE_MARGIN;
use crate::physics::torque::{TorqueCurve, TorqueCurveError};

// ---------------------------------------------------------------------------
// Calibration defaults
// ---------------------------------------------------------------------------

const DEFAULT_IDLE_RPM: f64 = 900.0;
const DEFAULT_REDLINE: f64 = 7500.0;
const DEFAULT_MAX_BOOST: f64 = 1.6; // bar
const DEFAULT_SPOOL_RATE: f64 = 0.8; // bar/s at zero rpm
const DEFAULT_INERTIA: f64 = 0.02; // Nm per (rpm/s)
const DEFAULT_FRICTION: f64 = 0.02; // Nm per rpm
const DEFAULT_ENGINE_BLEND: f64 = 0.6;
const DEFAULT_GEAR_RATIOS: [f64; 5] = [3.8, 2.3, 1.5, 1.1, 0.9];
const DEFAULT_FINAL_DRIVE: f64 = 3.9;
const DEFAULT_WHEEL_RADIUS: f64 = 0.33; // m
const DEFAULT_VEHICLE_MASS: f64 = 1350.0; // kg
const DEFAULT_DRAG_COEFFICIENT: f64 = 0.30;
const DEFAULT_FRONTAL_AREA: f64 = 2.2; // m^2
const DEFAULT_AIR_DENSITY: f64 = 1.225; // kg/m^3
const DEFAULT_ROLLING_RESISTANCE: f64 = 0.015;
const DEFAULT_BRAKE_FORCE: f64 = 10_000.0; // N
const DEFAULT_ROAD_LOAD_FORCE: f64 = 2000.0; // N at load = 1
const DEFAULT_COOLANT_MAX: f64 = 120.0; // °C
const DEFAULT_AMBIENT_TEMP: f64 = 25.0; // °C
const DEFAULT_COOLING_EFFICIENCY: f64 = 0.6;
const DEFAULT_HEAT_COEFFICIENT: f64 = 0.08; // °C/s per Nm of throttled torque
const DEFAULT_COOLING_COEFFICIENT: f64 = 0.3; // 1/s
const DEFAULT_IDLE_GOVERNOR_GAIN: f64 = 24.0; // 1/s

/// Malformed calibration, reported once at construction.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("gear ratio table is empty")]
    NoGears,

    #[error("gear {gear} ratio must be finite and positive, got {ratio}")]
    GearRatio { gear: usize, ratio: f64 },

    #[error("{name} must be finite and positive, got {value}")]
    NotPositive { name: &'static str, value: f64 },

    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("idle rpm ({idle}) must stay below the limiter release point of redline {redline}")]
    IdleAboveLimiter { idle: f64, redline: f64 },

    #[error("coolant max ({max}) must be above ambient ({ambient})")]
    CoolantRange { max: f64, ambient: f64 },

    #[error("engine blend must lie in [0, 1], got {0}")]
    Blend(f64),

    #[error(transparent)]
    TorqueCurve(#[from] TorqueCurveError),
}

// ---------------------------------------------------------------------------
// Engine configuration (immutable once built)
// ---------------------------------------------------------------------------

/// Tunable physical constants for one engine + drivetrain.
///
/// Fields are private: the only way to get one is [`EngineConfig::default`]
/// or [`EngineConfigBuilder::build`], both of which hand back a validated
/// value that the step function can trust without re-checking.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    idle_rpm: f64,
    redline: f64,
    max_boost: f64,
    spool_rate: f64,
    inertia: f64,
    friction: f64,
    engine_blend: f64,
    gear_ratios: Vec<f64>,
    final_drive: f64,
    wheel_radius: f64,
    vehicle_mass: f64,
    drag_coefficient: f64,
    frontal_area: f64,
    air_density: f64,
    rolling_resistance: f64,
    brake_force: f64,
    road_load_force: f64,
    coolant_max: f64,
    ambient_temp: f64,
    cooling_efficiency: f64,
    heat_coefficient: f64,
    cooling_coefficient: f64,
    idle_governor_gain: f64,
    torque_curve: TorqueCurve,
}

impl Default for EngineConfig {
    fn default() -> Self {
        // Known-good calibration, validation cannot fail
        Self {
            idle_rpm: DEFAULT_IDLE_RPM,
            redline: DEFAULT_REDLINE,
            max_boost: DEFAULT_MAX_BOOST,
            spool_rate: DEFAULT_SPOOL_RATE,
            inertia: DEFAULT_INERTIA,
            friction: DEFAULT_FRICTION,
            engine_blend: DEFAULT_ENGINE_BLEND,
            gear_ratios: DEFAULT_GEAR_RATIOS.to_vec(),
            final_drive: DEFAULT_FINAL_DRIVE,
            wheel_radius: DEFAULT_WHEEL_RADIUS,
            vehicle_mass: DEFAULT_VEHICLE_MASS,
            drag_coefficient: DEFAULT_DRAG_COEFFICIENT,
            frontal_area: DEFAULT_FRONTAL_AREA,
            air_density: DEFAULT_AIR_DENSITY,
            rolling_resistance: DEFAULT_ROLLING_RESISTANCE,
            brake_force: DEFAULT_BRAKE_FORCE,
            road_load_force: DEFAULT_ROAD_LOAD_FORCE,
            coolant_max: DEFAULT_COOLANT_MAX,
            ambient_temp: DEFAULT_AMBIENT_TEMP,
            cooling_efficiency: DEFAULT_COOLING_EFFICIENCY,
            heat_coefficient: DEFAULT_HEAT_COEFFICIENT,
            cooling_coefficient: DEFAULT_COOLING_COEFFICIENT,
            idle_governor_gain: DEFAULT_IDLE_GOVERNOR_GAIN,
            torque_curve: TorqueCurve::default(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }

    /// Builder pre-filled with this configuration's values.
    pub fn to_builder(&self) -> EngineConfigBuilder {
        EngineConfigBuilder { config: self.clone() }
    }

    pub fn idle_rpm(&self) -> f64 { self.idle_rpm }
    pub fn redline(&self) -> f64 { self.redline }
    pub fn max_boost(&self) -> f64 { self.max_boost }
    pub fn spool_rate(&self) -> f64 { self.spool_rate }
    pub fn inertia(&self) -> f64 { self.inertia }
    pub fn friction(&self) -> f64 { self.friction }
    pub fn engine_blend(&self) -> f64 { self.engine_blend }
    pub fn final_drive(&self) -> f64 { self.final_drive }
    pub fn wheel_radius(&self) -> f64 { self.wheel_radius }
    pub fn vehicle_mass(&self) -> f64 { self.vehicle_mass }
    pub fn drag_coefficient(&self) -> f64 { self.drag_coefficient }
    pub fn frontal_area(&self) -> f64 { self.frontal_area }
    pub fn air_density(&self) -> f64 { self.air_density }
    pub fn rolling_resistance(&self) -> f64 { self.rolling_resistance }
    pub fn brake_force(&self) -> f64 { self.brake_force }
    pub fn road_load_force(&self) -> f64 { self.road_load_force }
    pub fn coolant_max(&self) -> f64 { self.coolant_max }
    pub fn ambient_temp(&self) -> f64 { self.ambient_temp }
    pub fn cooling_efficiency(&self) -> f64 { self.cooling_efficiency }
    pub fn heat_coefficient(&self) -> f64 { self.heat_coefficient }
    pub fn cooling_coefficient(&self) -> f64 { self.cooling_coefficient }
    pub fn idle_governor_gain(&self) -> f64 { self.idle_governor_gain }
    pub fn torque_curve(&self) -> &TorqueCurve { &self.torque_curve }

    /// Forward gear ratios, index 0 is first gear.
    pub fn gear_ratios(&self) -> &[f64] {
        &self.gear_ratios
    }

    /// Number of forward gears.
    pub fn gear_count(&self) -> u8 {
        self.gear_ratios.len().min(u8::MAX as usize) as u8
    }

    /// Ratio for a 1-indexed gear; `None` for neutral or out of range.
    pub fn gear_ratio(&self, gear: u8) -> Option<f64> {
        if gear == 0 {
            return None;
        }
        self.gear_ratios.get(gear as usize - 1).copied()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gear_ratios.is_empty() {
            return Err(ConfigError::NoGears);
        }
        for (i, &ratio) in self.gear_ratios.iter().enumerate() {
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(ConfigError::GearRatio { gear: i + 1, ratio });
            }
        }

        positive("idle_rpm", self.idle_rpm)?;
        positive("redline", self.redline)?;
        positive("spool_rate", self.spool_rate)?;
        positive("inertia", self.inertia)?;
        positive("final_drive", self.final_drive)?;
        positive("wheel_radius", self.wheel_radius)?;
        positive("vehicle_mass", self.vehicle_mass)?;

        non_negative("max_boost", self.max_boost)?;
        non_negative("friction", self.friction)?;
        non_negative("drag_coefficient", self.drag_coefficient)?;
        non_negative("frontal_area", self.frontal_area)?;
        non_negative("air_density", self.air_density)?;
        non_negative("rolling_resistance", self.rolling_resistance)?;
        non_negative("brake_force", self.brake_force)?;
        non_negative("road_load_force", self.road_load_force)?;
        non_negative("cooling_efficiency", self.cooling_efficiency)?;
        non_negative("heat_coefficient", self.heat_coefficient)?;
        non_negative("cooling_coefficient", self.cooling_coefficient)?;
        non_negative("idle_governor_gain", self.idle_governor_gain)?;

        if self.idle_rpm >= self.redline - LIMITER_RELEASE_MARGIN {
            return Err(ConfigError::IdleAboveLimiter {
                idle: self.idle_rpm,
                redline: self.redline,
            });
        }
        if !self.ambient_temp.is_finite()
            || !self.coolant_max.is_finite()
            || self.coolant_max <= self.ambient_temp
        {
            return Err(ConfigError::CoolantRange {
                max: self.coolant_max,
                ambient: self.ambient_temp,
            });
        }
        if !(0.0..=1.0).contains(&self.engine_blend) {
            return Err(ConfigError::Blend(self.engine_blend));
        }

        self.torque_curve.validate()?;
        Ok(())
    }
}

fn positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { name, value })
    }
}

fn non_negative(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { name, value })
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Chained setters over the default calibration; [`build`](Self::build)
/// validates everything at once.
#[derive(Debug, Clone)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self { config: EngineConfig::default() }
    }

    pub fn idle_rpm(mut self, v: f64) -> Self { self.config.idle_rpm = v; self }
    pub fn redline(mut self, v: f64) -> Self { self.config.redline = v; self }
    pub fn max_boost(mut self, v: f64) -> Self { self.config.max_boost = v; self }
    pub fn spool_rate(mut self, v: f64) -> Self { self.config.spool_rate = v; self }
    pub fn inertia(mut self, v: f64) -> Self { self.config.inertia = v; self }
    pub fn friction(mut self, v: f64) -> Self { self.config.friction = v; self }
    pub fn engine_blend(mut self, v: f64) -> Self { self.config.engine_blend = v; self }
    pub fn gear_ratios(mut self, v: Vec<f64>) -> Self { self.config.gear_ratios = v; self }
    pub fn final_drive(mut self, v: f64) -> Self { self.config.final_drive = v; self }
    pub fn wheel_radius(mut self, v: f64) -> Self { self.config.wheel_radius = v; self }
    pub fn vehicle_mass(mut self, v: f64) -> Self { self.config.vehicle_mass = v; self }
    pub fn drag_coefficient(mut self, v: f64) -> Self { self.config.drag_coefficient = v; self }
    pub fn frontal_area(mut self, v: f64) -> Self { self.config.frontal_area = v; self }
    pub fn air_density(mut self, v: f64) -> Self { self.config.air_density = v; self }
    pub fn rolling_resistance(mut self, v: f64) -> Self { self.config.rolling_resistance = v; self }
    pub fn brake_force(mut self, v: f64) -> Self { self.config.brake_force = v; self }
    pub fn road_load_force(mut self, v: f64) -> Self { self.config.road_load_force = v; self }
    pub fn coolant_max(mut self, v: f64) -> Self { self.config.coolant_max = v; self }
    pub fn ambient_temp(mut self, v: f64) -> Self { self.config.ambient_temp = v; self }
    pub fn cooling_efficiency(mut self, v: f64) -> Self { self.config.cooling_efficiency = v; self }
    pub fn heat_coefficient(mut self, v: f64) -> Self { self.config.heat_coefficient = v; self }
    pub fn cooling_coefficient(mut self, v: f64) -> Self { self.config.cooling_coefficient = v; self }
    pub fn idle_governor_gain(mut self, v: f64) -> Self { self.config.idle_governor_gain = v; self }
    pub fn torque_curve(mut self, v: TorqueCurve) -> Self { self.config.torque_curve = v; self }

    /// Validate and freeze.
    ///
    /// # Errors
    ///
    /// Returns the first malformed value found.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
