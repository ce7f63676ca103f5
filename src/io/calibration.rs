use std::path::Path;

use configparser::ini::Ini;
use log::info;
use thiserror::Error;

use crate::engine::config::{ConfigError, EngineConfig, EngineConfigBuilder};
use crate::physics::torque::TorqueCurve;

/// Failure to turn an INI file into a valid [`EngineConfig`].
#[derive(Debug, Error)]
pub enum CalibrationError {
    #[error("failed to read calibration: {0}")]
    Parse(String),

    #[error("[{section}] {key}: {message}")]
    Value { section: &'static str, key: &'static str, message: String },

    #[error("invalid calibration: {0}")]
    Invalid(#[from] ConfigError),
}

type Setter = fn(EngineConfigBuilder, f64) -> EngineConfigBuilder;

/// Scalar keys understood per section. Anything else in the file is ignored.
const SCALAR_KEYS: &[(&str, &str, Setter)] = &[
    ("engine", "idle_rpm", EngineConfigBuilder::idle_rpm),
    ("engine", "redline", EngineConfigBuilder::redline),
    ("engine", "inertia", EngineConfigBuilder::inertia),
    ("engine", "friction", EngineConfigBuilder::friction),
    ("engine", "idle_governor_gain", EngineConfigBuilder::idle_governor_gain),
    ("turbo", "max_boost", EngineConfigBuilder::max_boost),
    ("turbo", "spool_rate", EngineConfigBuilder::spool_rate),
    ("drivetrain", "final_drive", EngineConfigBuilder::final_drive),
    ("drivetrain", "wheel_radius", EngineConfigBuilder::wheel_radius),
    ("drivetrain", "engine_blend", EngineConfigBuilder::engine_blend),
    ("vehicle", "mass", EngineConfigBuilder::vehicle_mass),
    ("vehicle", "drag_coefficient", EngineConfigBuilder::drag_coefficient),
    ("vehicle", "frontal_area", EngineConfigBuilder::frontal_area),
    ("vehicle", "air_density", EngineConfigBuilder::air_density),
    ("vehicle", "rolling_resistance", EngineConfigBuilder::rolling_resistance),
    ("vehicle", "brake_force", EngineConfigBuilder::brake_force),
    ("vehicle", "road_load_force", EngineConfigBuilder::road_load_force),
    ("thermal", "coolant_max", EngineConfigBuilder::coolant_max),
    ("thermal", "ambient", EngineConfigBuilder::ambient_temp),
    ("thermal", "cooling_efficiency", EngineConfigBuilder::cooling_efficiency),
    ("thermal", "heat_coefficient", EngineConfigBuilder::heat_coefficient),
    ("thermal", "cooling_coefficient", EngineConfigBuilder::cooling_coefficient),
];

/// Load an INI calibration file. Keys not present keep their defaults.
pub fn load_calibration(path: impl AsRef<Path>) -> Result<EngineConfig, CalibrationError> {
    let path = path.as_ref();
    let mut ini = Ini::new();
    ini.load(path)
        .map_err(|e| CalibrationError::Parse(format!("{}: {e}", path.display())))?;
    let config = from_ini(&ini)?;
    info!(
        "Loaded calibration {:?}: redline {:.0} rpm, {} gears, {:.2} bar max boost",
        path,
        config.redline(),
        config.gear_count(),
        config.max_boost()
    );
    Ok(config)
}

/// Parse calibration text in INI format.
pub fn parse_calibration(text: &str) -> Result<EngineConfig, CalibrationError> {
    let mut ini = Ini::new();
    ini.read(text.to_owned()).map_err(CalibrationError::Parse)?;
    from_ini(&ini)
}

fn from_ini(ini: &Ini) -> Result<EngineConfig, CalibrationError> {
    let mut builder = EngineConfig::builder();

    for &(section, key, set) in SCALAR_KEYS {
        let value = ini
            .getfloat(section, key)
            .map_err(|message| CalibrationError::Value { section, key, message })?;
        if let Some(v) = value {
            builder = set(builder, v);
        }
    }

    if let Some(list) = ini.get("drivetrain", "gear_ratios") {
        let ratios = parse_list(&list)
            .map_err(|message| CalibrationError::Value { section: "drivetrain", key: "gear_ratios", message })?;
        builder = builder.gear_ratios(ratios);
    }

    if let Some(table) = ini.get("engine", "torque_curve") {
        let points = parse_torque_table(&table)
            .map_err(|message| CalibrationError::Value { section: "engine", key: "torque_curve", message })?;
        builder = builder.torque_curve(TorqueCurve::new(points).map_err(ConfigError::from)?);
    }

    Ok(builder.build()?)
}

fn parse_number(s: &str) -> Result<f64, String> {
    let s = s.trim();
    s.parse::<f64>().map_err(|_| format!("`{s}` is not a number"))
}

/// `3.8, 2.3, 1.5`
fn parse_list(s: &str) -> Result<Vec<f64>, String> {
    s.split(',').filter(|p| !p.trim().is_empty()).map(parse_number).collect()
}

/// `800:160, 1500:200, ...` as rpm:torque pairs.
fn parse_torque_table(s: &str) -> Result<Vec<(f64, f64)>, String> {
    s.split(',')
        .filter(|p| !p.trim().is_empty())
        .map(|pair| {
            let (rpm, nm) = pair
                .split_once(':')
                .ok_or_else(|| format!("`{}` is not an rpm:torque pair", pair.trim()))?;
            Ok((parse_number(rpm)?, parse_number(nm)?))
        })
        .collect()
}
