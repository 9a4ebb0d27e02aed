//! Psychrometric helpers for the drying log.
//!
//! GPP (grains per pound of dry air) is derived from a temperature/humidity
//! pair and is never authoritative on its own: it gets recomputed whenever
//! both inputs are present.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Standard atmospheric pressure in Pa.
const ATM_PRESSURE_PA: f64 = 101_325.0;

// Condition tier cutoffs, in grains per pound. Product-tunable, not physics.
pub const GOOD_MAX_GPP: f64 = 40.0;
pub const MODERATE_MAX_GPP: f64 = 60.0;

/// Drying condition tier used for color-coding readings.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum DryingCondition {
    Good,
    Moderate,
    Poor,
}

/// Grains of moisture per pound of dry air for a temperature (°F) and
/// relative humidity (%).
///
/// Fail-soft by contract: a non-finite input or a negative RH yields `None`
/// rather than an error, and callers treat `None` as "no GPP value".
pub fn gpp(temperature_f: f64, relative_humidity: f64) -> Option<f64> {
    if !temperature_f.is_finite() || !relative_humidity.is_finite() || relative_humidity < 0.0 {
        return None;
    }

    let temp_k = (temperature_f - 32.0) / 1.8 + 273.15;

    // Saturation vapor pressure (Pa), Magnus-style approximation.
    let sat_pressure = (23.196_452 - 3816.44 / (temp_k - 46.13)).exp();
    let vapor_pressure = sat_pressure * relative_humidity / 100.0;

    if vapor_pressure >= ATM_PRESSURE_PA {
        return None;
    }

    // Humidity ratio (lb water / lb dry air) scaled to grains.
    let ratio = 0.622 * vapor_pressure / (ATM_PRESSURE_PA - vapor_pressure);
    let grains = ratio * 7000.0;

    if grains.is_finite() {
        Some(grains)
    } else {
        None
    }
}

/// Same as [`gpp`] but over the optional form inputs: either side missing
/// means no derived value.
pub fn gpp_opt(temperature_f: Option<f64>, relative_humidity: Option<f64>) -> Option<f64> {
    match (temperature_f, relative_humidity) {
        (Some(t), Some(rh)) => gpp(t, rh),
        _ => None,
    }
}

pub fn classify(gpp_value: f64) -> DryingCondition {
    if gpp_value <= GOOD_MAX_GPP {
        DryingCondition::Good
    } else if gpp_value <= MODERATE_MAX_GPP {
        DryingCondition::Moderate
    } else {
        DryingCondition::Poor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_humidity_is_zero_grains() {
        let value = gpp(70.0, 0.0).unwrap();
        assert_eq!(value, 0.0);
    }

    #[test]
    fn result_is_finite_and_non_negative() {
        for temp in [33.0, 50.0, 70.0, 95.0, 120.0] {
            for rh in [0.0, 10.0, 35.0, 50.0, 80.0, 100.0] {
                let value = gpp(temp, rh).unwrap();
                assert!(value.is_finite(), "gpp({}, {}) not finite", temp, rh);
                assert!(value >= 0.0, "gpp({}, {}) negative", temp, rh);
            }
        }
    }

    #[test]
    fn monotone_in_humidity_at_fixed_temperature() {
        for temp in [40.0, 70.0, 100.0] {
            let mut prev = -1.0;
            for rh in 0..=100 {
                let value = gpp(temp, rh as f64).unwrap();
                assert!(value >= prev, "gpp({}, {}) decreased", temp, rh);
                prev = value;
            }
        }
    }

    #[test]
    fn seventy_degrees_half_humidity_is_moderate() {
        // ~54 GPP, the usual "mid-dry-down" reading.
        let value = gpp(70.0, 50.0).unwrap();
        assert!(value > 50.0 && value < 60.0, "got {}", value);
        assert_eq!(classify(value), DryingCondition::Moderate);
    }

    #[test]
    fn raising_humidity_never_lowers_severity() {
        let at_50 = gpp(70.0, 50.0).unwrap();
        let at_80 = gpp(70.0, 80.0).unwrap();
        assert!(at_80 >= at_50);
        // 70°F / 80% is past the poor cutoff.
        assert_eq!(classify(at_80), DryingCondition::Poor);
    }

    #[test]
    fn bad_inputs_are_absent_not_errors() {
        assert!(gpp(f64::NAN, 50.0).is_none());
        assert!(gpp(70.0, f64::INFINITY).is_none());
        assert!(gpp(70.0, -5.0).is_none());
        assert!(gpp_opt(None, Some(50.0)).is_none());
        assert!(gpp_opt(Some(70.0), None).is_none());
    }
}
