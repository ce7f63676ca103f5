use thiserror::Error;

// ---------------------------------------------------------------------------
// Wide-open-throttle torque curve (piecewise linear table)
// ---------------------------------------------------------------------------

/// Calibrated (rpm, Nm) breakpoints. Rises to a plateau around 4500 rpm and
/// falls off hard past redline.
const DEFAULT_TABLE: [(f64, f64); 9] = [
    (800.0, 160.0),
    (1500.0, 200.0),
    (2500.0, 280.0),
    (3500.0, 320.0),
    (4500.0, 340.0),
    (5500.0, 330.0),
    (6500.0, 300.0),
    (7500.0, 240.0),
    (8000.0, 100.0),
];

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TorqueCurveError {
    #[error("torque curve needs at least two points, got {0}")]
    TooFewPoints(usize),

    #[error("torque curve point {index} is not finite")]
    NotFinite { index: usize },

    #[error("torque curve rpm must strictly increase (point {index})")]
    NotIncreasing { index: usize },
}

/// Base engine torque as a function of rpm, before boost and throttle.
///
/// Linear interpolation between breakpoints; flat extrapolation outside the
/// table, so the lookup is total over all rpm values.
#[derive(Debug, Clone, PartialEq)]
pub struct TorqueCurve {
    points: Vec<(f64, f64)>,
}

impl Default for TorqueCurve {
    fn default() -> Self {
        Self { points: DEFAULT_TABLE.to_vec() }
    }
}

impl TorqueCurve {
    /// # Errors
    ///
    /// Fails if the table has fewer than two points, contains non-finite
    /// values, or rpm does not strictly increase.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, TorqueCurveError> {
        let curve = Self { points };
        curve.validate()?;
        Ok(curve)
    }

    pub fn points(&self) -> &[(f64, f64)] {
        &self.points
    }

    pub(crate) fn validate(&self) -> Result<(), TorqueCurveError> {
        if self.points.len() < 2 {
            return Err(TorqueCurveError::TooFewPoints(self.points.len()));
        }
        for (index, &(rpm, nm)) in self.points.iter().enumerate() {
            if !rpm.is_finite() || !nm.is_finite() {
                return Err(TorqueCurveError::NotFinite { index });
            }
        }
        for (i, pair) in self.points.windows(2).enumerate() {
            if pair[1].0 <= pair[0].0 {
                return Err(TorqueCurveError::NotIncreasing { index: i + 1 });
            }
        }
        Ok(())
    }

    /// Torque (Nm) at `rpm`.
    pub fn at(&self, rpm: f64) -> f64 {
        let Some(&(first_rpm, first_nm)) = self.points.first() else {
            return 0.0;
        };
        if !(rpm > first_rpm) {
            return first_nm;
        }
        for pair in self.points.windows(2) {
            let (r0, t0) = pair[0];
            let (r1, t1) = pair[1];
            if rpm <= r1 {
                let span = r1 - r0;
                if span <= 0.0 {
                    return t1;
                }
                return t0 + (t1 - t0) * (rpm - r0) / span;
            }
        }
        self.points.last().map_or(0.0, |&(_, nm)| nm)
    }

    /// Rpm of the highest breakpoint torque.
    pub fn peak_rpm(&self) -> f64 {
        self.points
            .iter()
            .copied()
            .fold((0.0, f64::NEG_INFINITY), |best, p| if p.1 > best.1 { p } else { best })
            .0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn breakpoints_are_exact() {
        let curve = TorqueCurve::default();
        assert_abs_diff_eq!(curve.at(4500.0), 340.0);
        assert_abs_diff_eq!(curve.at(7500.0), 240.0);
    }

    #[test]
    fn interpolates_between_breakpoints() {
        let curve = TorqueCurve::default();
        assert_abs_diff_eq!(curve.at(3000.0), 300.0, epsilon = 1e-9);
    }

    #[test]
    fn clamps_outside_table() {
        let curve = TorqueCurve::default();
        assert_abs_diff_eq!(curve.at(0.0), 160.0);
        assert_abs_diff_eq!(curve.at(-500.0), 160.0);
        assert_abs_diff_eq!(curve.at(12_000.0), 100.0);
        assert_abs_diff_eq!(curve.at(f64::NAN), 160.0);
    }

    #[test]
    fn peaks_mid_range_and_falls_near_redline() {
        let curve = TorqueCurve::default();
        let peak = curve.peak_rpm();
        assert!(peak > 3000.0 && peak < 6000.0, "peak at {peak}");
        assert!(curve.at(7500.0) < curve.at(peak));
        assert!(curve.at(1000.0) < curve.at(peak));
    }

    #[test]
    fn rejects_malformed_tables() {
        assert_eq!(
            TorqueCurve::new(vec![(1000.0, 100.0)]),
            Err(TorqueCurveError::TooFewPoints(1))
        );
        assert_eq!(
            TorqueCurve::new(vec![(1000.0, 100.0), (1000.0, 120.0)]),
            Err(TorqueCurveError::NotIncreasing { index: 1 })
        );
        assert_eq!(
            TorqueCurve::new(vec![(1000.0, f64::INFINITY), (2000.0, 120.0)]),
            Err(TorqueCurveError::NotFinite { index: 0 })
        );
    }
}
