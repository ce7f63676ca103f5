// Air/fuel ratio estimate for the AFR gauge.

const STOICH_AFR: f64 = 14.7;
const FUEL_CUT_AFR: f64 = 22.0;
const MIN_AFR: f64 = 10.0;

/// Richens with throttle and boost; reads lean-max under fuel cut.
pub fn afr_estimate(eff_throttle: f64, boost: f64, fuel_cut: bool) -> f64 {
    if fuel_cut {
        return FUEL_CUT_AFR;
    }
    let mut afr = STOICH_AFR - 3.5 * eff_throttle;
    if boost > 0.1 {
        afr -= 1.2 * boost;
    }
    afr.clamp(MIN_AFR, FUEL_CUT_AFR)
}
