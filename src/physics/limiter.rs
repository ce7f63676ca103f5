// ---------------------------------------------------------------------------
// Hard-cut rev limiter with hysteresis
// ---------------------------------------------------------------------------

/// Fuel is cut once rpm exceeds `redline + LIMITER_ENGAGE_MARGIN`.
pub const LIMITER_ENGAGE_MARGIN: f64 = 50.0;

/// Fuel is restored once rpm drops below `redline - LIMITER_RELEASE_MARGIN`.
pub const LIMITER_RELEASE_MARGIN: f64 = 150.0;

/// Torque applied while fuel is cut (Nm). Negative: the engine drags itself down.
pub const FUEL_CUT_TORQUE: f64 = -50.0;

// Engage and release thresholds must never collapse into one value.
const _: () = assert!(LIMITER_ENGAGE_MARGIN + LIMITER_RELEASE_MARGIN >= 100.0);

/// Next fuel-cut flag given the current flag and start-of-tick rpm.
///
/// The flag only changes at the band edges; inside the band it keeps
/// whatever it was, which is what makes the engine bounce off the limiter
/// instead of sitting on a clamped rpm.
pub fn next_fuel_cut(fuel_cut: bool, rpm: f64, redline: f64) -> bool {
    if !fuel_cut && rpm > redline + LIMITER_ENGAGE_MARGIN {
        true
    } else if fuel_cut && rpm < redline - LIMITER_RELEASE_MARGIN {
        false
    } else {
        fuel_cut
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REDLINE: f64 = 7500.0;

    #[test]
    fn engages_just_above_engage_threshold() {
        assert!(!next_fuel_cut(false, REDLINE + 50.0, REDLINE));
        assert!(next_fuel_cut(false, REDLINE + 51.0, REDLINE));
    }

    #[test]
    fn holds_inside_band() {
        for rpm in [REDLINE + 49.0, REDLINE, REDLINE - 100.0, REDLINE - 150.0] {
            assert!(next_fuel_cut(true, rpm, REDLINE), "released early at {rpm}");
            assert!(!next_fuel_cut(false, rpm, REDLINE), "engaged early at {rpm}");
        }
    }

    #[test]
    fn releases_below_release_threshold() {
        assert!(!next_fuel_cut(true, REDLINE - 151.0, REDLINE));
    }
}
