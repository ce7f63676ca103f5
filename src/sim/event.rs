use crate::engine::state::Telemetry;

// ---------------------------------------------------------------------------
// Simulation events
// ---------------------------------------------------------------------------

/// Kinds of simulation events.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Backfire,
    FuelCutEngaged,
    FuelCutReleased,
    LimpModeEngaged,
    GearChanged { from: u8, to: u8 },
    SpeedReached { kmh: f64 },
}

/// A discrete event that occurred during simulation.
#[derive(Debug, Clone)]
pub struct SimEvent {
    pub time: f64,
    pub kind: EventKind,
    pub telemetry: Telemetry,
}

/// Trait for passive event detectors.
/// Implementations inspect consecutive snapshots and report events.
pub trait EventDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind>;
}

/// Reports each tick that produced a backfire.
pub struct BackfireDetector;

impl EventDetector for BackfireDetector {
    fn check(&mut self, _prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        current.backfire.then_some(EventKind::Backfire)
    }
}

/// Rising and falling edges of the rev limiter.
pub struct LimiterDetector;

impl EventDetector for LimiterDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        match (prev.fuel_cut, current.fuel_cut) {
            (false, true) => Some(EventKind::FuelCutEngaged),
            (true, false) => Some(EventKind::FuelCutReleased),
            _ => None,
        }
    }
}

pub struct LimpDetector;

impl EventDetector for LimpDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        (!prev.limp_mode && current.limp_mode).then_some(EventKind::LimpModeEngaged)
    }
}

pub struct GearDetector;

impl EventDetector for GearDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        (prev.gear != current.gear).then_some(EventKind::GearChanged {
            from: prev.gear,
            to: current.gear,
        })
    }
}

/// Fires once when road speed first crosses a threshold (0-100 timing).
pub struct SpeedDetector {
    pub kmh: f64,
    fired: bool,
}

impl SpeedDetector {
    pub fn new(kmh: f64) -> Self {
        Self { kmh, fired: false }
    }
}

impl EventDetector for SpeedDetector {
    fn check(&mut self, prev: &Telemetry, current: &Telemetry) -> Option<EventKind> {
        if self.fired {
            return None;
        }
        if prev.speed_kmh < self.kmh && current.speed_kmh >= self.kmh {
            self.fired = true;
            Some(EventKind::SpeedReached { kmh: self.kmh })
        } else {
            None
        }
    }
}

/// Detectors every run carries.
pub fn standard_detectors() -> Vec<Box<dyn EventDetector>> {
    vec![
        Box::new(BackfireDetector),
        Box::new(LimiterDetector),
        Box::new(LimpDetector),
        Box::new(GearDetector),
        Box::new(SpeedDetector::new(100.0)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> Telemetry {
        Telemetry {
            time: 0.0,
            tick: 0,
            rpm: 900.0,
            throttle: 0.0,
            eff_throttle: 0.0,
            gear: 0,
            boost: 0.0,
            target_boost: 0.0,
            torque: 0.0,
            afr: 14.7,
            speed: 0.0,
            speed_kmh: 0.0,
            coolant_temp: 25.0,
            fuel_cut: false,
            limp_mode: false,
            backfire: false,
            brake: false,
        }
    }

    #[test]
    fn limiter_edges_detected() {
        let mut det = LimiterDetector;
        let off = snapshot();
        let on = Telemetry { fuel_cut: true, ..snapshot() };
        assert_eq!(det.check(&off, &on), Some(EventKind::FuelCutEngaged));
        assert_eq!(det.check(&on, &on), None);
        assert_eq!(det.check(&on, &off), Some(EventKind::FuelCutReleased));
    }

    #[test]
    fn speed_detector_fires_once() {
        let mut det = SpeedDetector::new(100.0);
        let prev = Telemetry { speed_kmh: 99.0, ..snapshot() };
        let curr = Telemetry { speed_kmh: 100.5, ..snapshot() };
        assert!(det.check(&prev, &curr).is_some());
        // Should not fire again
        assert!(det.check(&prev, &curr).is_none());
    }

    #[test]
    fn gear_change_reports_both_gears() {
        let mut det = GearDetector;
        let prev = Telemetry { gear: 2, ..snapshot() };
        let curr = Telemetry { gear: 3, ..snapshot() };
        assert_eq!(det.check(&prev, &curr), Some(EventKind::GearChanged { from: 2, to: 3 }));
    }

    #[test]
    fn limp_reported_on_rising_edge_only() {
        let mut det = LimpDetector;
        let hot = Telemetry { limp_mode: true, ..snapshot() };
        assert_eq!(det.check(&snapshot(), &hot), Some(EventKind::LimpModeEngaged));
        assert_eq!(det.check(&hot, &hot), None);
    }
}
