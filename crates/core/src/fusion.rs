//! Multi-source fusion scoring.
//!
//! Combines an instantaneous support pressure, microseismic energy and
//! deformation reading into a single 0-100 stability score (higher is safer)
//! and a three-tier risk classification. Pure and infallible: out-of-range
//! inputs are clamped rather than rejected.

use serde::Serialize;

use crate::error::CoreError;

/// Pressure at or below this value (MPa) carries no penalty.
const PRESSURE_FREE_LIMIT: f64 = 25.0;
/// Points lost per MPa above [`PRESSURE_FREE_LIMIT`].
const PRESSURE_PENALTY_PER_MPA: f64 = 5.0;
/// Seismic penalty starts at 10^3 J.
const SEISMIC_FREE_EXPONENT: f64 = 3.0;
/// Points lost per order of magnitude above 10^3 J.
const SEISMIC_PENALTY_PER_DECADE: f64 = 20.0;
/// Points lost per mm/d of deformation.
const DEFORMATION_PENALTY_PER_UNIT: f64 = 8.0;

const WEIGHT_PRESSURE: f64 = 0.4;
const WEIGHT_SEISMIC: f64 = 0.35;
const WEIGHT_DEFORMATION: f64 = 0.25;

/// Scores below this are [`RiskLevel::Red`].
const RED_BELOW: f64 = 40.0;
/// Scores below this (and not red) are [`RiskLevel::Yellow`].
const YELLOW_BELOW: f64 = 70.0;

/// Stand-in pressure (MPa) when no pressure sample has been ingested.
pub const FALLBACK_PRESSURE: f64 = 32.0;
/// Stand-in microseismic energy (J) when no seismic sample has been ingested.
pub const FALLBACK_SEISMIC: f64 = 5000.0;
/// Stand-in deformation rate (mm/d) when no deformation sample has been ingested.
pub const FALLBACK_DEFORMATION: f64 = 1.2;

/// Fusion risk tier. Distinct from the alarm engine's YELLOW/RED levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RiskLevel {
    Green,
    Yellow,
    Red,
}

impl RiskLevel {
    fn from_score(score: f64) -> Self {
        if score < RED_BELOW {
            Self::Red
        } else if score < YELLOW_BELOW {
            Self::Yellow
        } else {
            Self::Green
        }
    }
}

/// Per-source sub-scores, each in `[0, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionComponents {
    pub pressure: f64,
    pub seismic: f64,
    pub deformation: f64,
}

/// Output of [`fuse`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionResult {
    pub stability_score: f64,
    pub risk_level: RiskLevel,
    pub components: FusionComponents,
}

/// Score a single (pressure, seismic, deformation) triple.
pub fn fuse(pressure: f64, seismic: f64, deformation: f64) -> FusionResult {
    let components = FusionComponents {
        pressure: pressure_component(pressure),
        seismic: seismic_component(seismic),
        deformation: deformation_component(deformation),
    };

    let score = WEIGHT_PRESSURE * components.pressure
        + WEIGHT_SEISMIC * components.seismic
        + WEIGHT_DEFORMATION * components.deformation;

    // Tier on the unrounded score; rounding is for display only.
    FusionResult {
        stability_score: round2(score),
        risk_level: RiskLevel::from_score(score),
        components,
    }
}

/// Reject NaN and infinite readings before they reach the scorer.
///
/// Finite out-of-range values (negative pressure, tiny energies) are fine;
/// the component functions clamp them.
pub fn validate_reading(name: &str, value: f64) -> Result<(), CoreError> {
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "{name} must be a finite number, got {value}"
        )));
    }
    Ok(())
}

fn pressure_component(pressure: f64) -> f64 {
    let excess = (pressure - PRESSURE_FREE_LIMIT).max(0.0);
    clamp_component(100.0 - excess * PRESSURE_PENALTY_PER_MPA)
}

fn seismic_component(seismic: f64) -> f64 {
    let decades = seismic.max(1.0).log10() - SEISMIC_FREE_EXPONENT;
    clamp_component(100.0 - decades * SEISMIC_PENALTY_PER_DECADE)
}

fn deformation_component(deformation: f64) -> f64 {
    clamp_component(100.0 - deformation * DEFORMATION_PENALTY_PER_UNIT)
}

fn clamp_component(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Round to two decimal places, matching the dashboard's display precision.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example_scores_73_green() {
        let result = fuse(30.0, 10_000.0, 5.0);
        assert_eq!(result.components.pressure, 75.0);
        assert_eq!(result.components.seismic, 80.0);
        assert_eq!(result.components.deformation, 60.0);
        assert_eq!(result.stability_score, 73.0);
        assert_eq!(result.risk_level, RiskLevel::Green);
    }

    #[test]
    fn pressure_at_or_below_limit_has_no_penalty() {
        for p in [-10.0, 0.0, 12.5, 24.99, 25.0] {
            assert_eq!(fuse(p, 1000.0, 0.0).components.pressure, 100.0, "p = {p}");
        }
    }

    #[test]
    fn fuse_is_pure() {
        let a = fuse(41.3, 73_000.0, 9.7);
        let b = fuse(41.3, 73_000.0, 9.7);
        assert_eq!(a, b);
    }

    #[test]
    fn components_clamp_at_zero() {
        let result = fuse(100.0, 1e12, 50.0);
        assert_eq!(result.components.pressure, 0.0);
        assert_eq!(result.components.seismic, 0.0);
        assert_eq!(result.components.deformation, 0.0);
        assert_eq!(result.stability_score, 0.0);
        assert_eq!(result.risk_level, RiskLevel::Red);
    }

    #[test]
    fn negative_and_low_energy_inputs_score_full_marks() {
        let result = fuse(-5.0, -300.0, -2.0);
        assert_eq!(result.components.pressure, 100.0);
        assert_eq!(result.components.seismic, 100.0);
        assert_eq!(result.components.deformation, 100.0);
        assert_eq!(result.stability_score, 100.0);
    }

    #[test]
    fn risk_tier_boundaries() {
        assert_eq!(RiskLevel::from_score(39.99), RiskLevel::Red);
        assert_eq!(RiskLevel::from_score(40.0), RiskLevel::Yellow);
        assert_eq!(RiskLevel::from_score(69.99), RiskLevel::Yellow);
        assert_eq!(RiskLevel::from_score(70.0), RiskLevel::Green);
    }

    #[test]
    fn yellow_tier_for_loaded_roof() {
        // P: 100 - 15*5 = 25, S: 100 - 2*20 = 60, D: 100 - 6*8 = 52
        // 0.4*25 + 0.35*60 + 0.25*52 = 10 + 21 + 13 = 44
        let result = fuse(40.0, 100_000.0, 6.0);
        assert_eq!(result.stability_score, 44.0);
        assert_eq!(result.risk_level, RiskLevel::Yellow);
    }

    #[test]
    fn tier_uses_unrounded_score() {
        // 0.4 * 99.99 = 39.996, displayed as 40.0 but still below the red line.
        let result = fuse(25.002, 1e8, 12.5);
        assert_eq!(result.stability_score, 40.0);
        assert_eq!(result.risk_level, RiskLevel::Red);
    }

    #[test]
    fn validate_reading_rejects_non_finite() {
        assert!(validate_reading("pressure", f64::NAN).is_err());
        assert!(validate_reading("seismic", f64::INFINITY).is_err());
        assert!(validate_reading("deformation", -3.0).is_ok());
    }
}
