// ---------------------------------------------------------------------------
// Turbocharger: spool-up, blow-off, and the torque multiplier from boost
// ---------------------------------------------------------------------------

/// Exhaust-flow limit on achievable boost: linear in rpm, reaching full flow
/// at two thirds of redline.
pub fn flow_factor(rpm: f64, redline: f64) -> f64 {
    if redline <= 0.0 {
        return 1.0;
    }
    (1.5 * rpm.max(0.0) / redline).min(1.0)
}

/// Spool rate multiplier; the turbo reacts faster at high revs.
pub fn rpm_factor(rpm: f64, redline: f64) -> f64 {
    if redline <= 0.0 {
        return 1.0;
    }
    1.0 + (rpm.max(0.0) / redline).min(1.5)
}

/// Boost the turbo is chasing for a given throttle and rpm.
pub fn target_boost(eff_throttle: f64, rpm: f64, max_boost: f64, redline: f64) -> f64 {
    (eff_throttle * max_boost * flow_factor(rpm, redline)).clamp(0.0, max_boost)
}

/// Move `boost` one tick toward `target`.
///
/// Spool-up runs at `spool_rate * rpm_factor`; blow-off dumps at three
/// times the base spool rate. Neither side overshoots the target.
pub fn spool(
    boost: f64,
    target: f64,
    rpm: f64,
    spool_rate: f64,
    max_boost: f64,
    redline: f64,
    dt: f64,
) -> f64 {
    let next = if target > boost {
        (boost + spool_rate * rpm_factor(rpm, redline) * dt).min(target)
    } else if target < boost {
        (boost - 3.0 * spool_rate * dt).max(target)
    } else {
        boost
    };
    next.clamp(0.0, max_boost)
}

/// Torque multiplier: 1.0 at zero boost, 1.8 at max boost.
pub fn boost_multiplier(boost: f64, max_boost: f64) -> f64 {
    if max_boost <= 0.0 {
        return 1.0;
    }
    1.0 + 0.8 * (boost / max_boost).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const REDLINE: f64 = 7500.0;
    const MAX: f64 = 1.6;
    const DT: f64 = 1.0 / 120.0;

    #[test]
    fn flow_factor_grows_with_rpm_and_saturates() {
        assert_abs_diff_eq!(flow_factor(0.0, REDLINE), 0.0);
        assert!(flow_factor(2000.0, REDLINE) < flow_factor(4000.0, REDLINE));
        assert_abs_diff_eq!(flow_factor(5000.0, REDLINE), 1.0);
        assert_abs_diff_eq!(flow_factor(7000.0, REDLINE), 1.0);
        assert_abs_diff_eq!(flow_factor(3000.0, 0.0), 1.0);
    }

    #[test]
    fn spools_faster_at_high_rpm() {
        let low = spool(0.0, MAX, 1500.0, 0.8, MAX, REDLINE, DT);
        let high = spool(0.0, MAX, 6500.0, 0.8, MAX, REDLINE, DT);
        assert!(high > low);
    }

    #[test]
    fn blow_off_is_three_times_spool_rate() {
        let after = spool(1.0, 0.0, 3000.0, 0.8, MAX, REDLINE, DT);
        assert_abs_diff_eq!(1.0 - after, 3.0 * 0.8 * DT, epsilon = 1e-12);
    }

    #[test]
    fn never_overshoots_target() {
        let up = spool(0.99, 1.0, 7000.0, 50.0, MAX, REDLINE, DT);
        assert_abs_diff_eq!(up, 1.0);
        let down = spool(0.51, 0.5, 7000.0, 50.0, MAX, REDLINE, DT);
        assert_abs_diff_eq!(down, 0.5);
    }

    #[test]
    fn clamped_to_max_boost() {
        let b = spool(MAX + 0.5, MAX + 1.0, 7000.0, 0.8, MAX, REDLINE, DT);
        assert!(b <= MAX);
    }

    #[test]
    fn multiplier_spans_one_to_one_point_eight() {
        assert_abs_diff_eq!(boost_multiplier(0.0, MAX), 1.0);
        assert_abs_diff_eq!(boost_multiplier(MAX, MAX), 1.8);
        assert_abs_diff_eq!(boost_multiplier(0.8, 0.0), 1.0);
    }
}
