//! Before/after fracturing effectiveness evaluation (pure math).
//!
//! The evaluation engine in the API crate fetches construction records and
//! window averages through the store ports, then hands them to the functions
//! here. Nothing in this module touches a store or the clock.

use std::collections::BTreeMap;

use chrono::Duration;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::fusion::round2;
use crate::types::{DbId, Timestamp};

/// Margin added before the first and after the last construction record.
pub const WINDOW_MARGIN_DAYS: i64 = 7;

/// Pre-window average pressure (MPa) when the window has no samples.
pub const DEFAULT_PRE_PRESSURE: f64 = 35.0;
/// Pre-window average deformation rate (mm/d) when the window has no samples.
pub const DEFAULT_PRE_DEFORMATION: f64 = 5.0;
/// Post-window average pressure (MPa) when the window has no samples.
pub const DEFAULT_POST_PRESSURE: f64 = 30.0;
/// Post-window average deformation rate (mm/d) when the window has no samples.
pub const DEFAULT_POST_DEFORMATION: f64 = 2.0;

/// Construction volume (m3) at which the volume factor reaches 1.0.
const REFERENCE_VOLUME: f64 = 500.0;
/// Upper bound of the volume factor.
const MAX_VOLUME_FACTOR: f64 = 1.2;

const STABLE_ABOVE: f64 = 70.0;
const NORMAL_ABOVE: f64 = 40.0;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One row of the fracture construction log for a borehole.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstructionRecord {
    pub id: DbId,
    pub borehole_id: DbId,
    pub segment_no: Option<i32>,
    /// Construction pressure (MPa).
    pub pressure: Option<f64>,
    /// Instantaneous flow rate (m3/min).
    pub flow_rate: Option<f64>,
    /// Cumulative pumped volume for the segment so far (m3).
    pub total_volume: Option<f64>,
    pub recorded_at: Timestamp,
}

/// Total pumped volume across all segments.
///
/// `total_volume` is a running total within a segment, so each segment
/// contributes its largest reading. Records without a segment number are
/// grouped together.
pub fn total_construction_volume(records: &[ConstructionRecord]) -> f64 {
    let mut per_segment: BTreeMap<Option<i32>, f64> = BTreeMap::new();
    for record in records {
        let Some(volume) = record.total_volume.filter(|v| v.is_finite() && *v > 0.0) else {
            continue;
        };
        let entry = per_segment.entry(record.segment_no).or_insert(0.0);
        *entry = entry.max(volume);
    }
    per_segment.values().sum()
}

/// Pre- and post-treatment time ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EvaluationWindow {
    pub pre_start: Timestamp,
    pub pre_end: Timestamp,
    pub post_start: Timestamp,
    pub post_end: Timestamp,
}

impl EvaluationWindow {
    /// Derive the windows from the first and last construction timestamps.
    pub fn from_construction(first: Timestamp, last: Timestamp) -> Self {
        let margin = Duration::days(WINDOW_MARGIN_DAYS);
        Self {
            pre_start: first - margin,
            pre_end: first,
            post_start: last,
            post_end: last + margin,
        }
    }

    /// Derive the windows from an ordered record list. `None` when empty.
    pub fn from_records(records: &[ConstructionRecord]) -> Option<Self> {
        let first = records.iter().map(|r| r.recorded_at).min()?;
        let last = records.iter().map(|r| r.recorded_at).max()?;
        Some(Self::from_construction(first, last))
    }
}

/// Window averages as returned by the metric store; `None` means no samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WindowAverages {
    pub pre_pressure: Option<f64>,
    pub pre_deformation: Option<f64>,
    pub post_pressure: Option<f64>,
    pub post_deformation: Option<f64>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Roof stability classification of an evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StabilityLevel {
    Stable,
    Normal,
    Hazardous,
}

impl StabilityLevel {
    pub fn from_index(stability_index: f64) -> Self {
        if stability_index > STABLE_ABOVE {
            Self::Stable
        } else if stability_index > NORMAL_ABOVE {
            Self::Normal
        } else {
            Self::Hazardous
        }
    }
}

/// Effectiveness indices for one borehole. Recomputed on every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub pressure_reduction: f64,
    pub deformation_control: f64,
    pub efficiency: f64,
    pub stability_index: f64,
    pub level: StabilityLevel,
    pub is_simulated: bool,
}

/// Compute the effectiveness indices from window averages and pumped volume.
pub fn compute_indices(averages: &WindowAverages, total_volume: f64) -> EvaluationResult {
    let pre_p = averages.pre_pressure.unwrap_or(DEFAULT_PRE_PRESSURE);
    let pre_d = averages.pre_deformation.unwrap_or(DEFAULT_PRE_DEFORMATION);
    let post_p = averages.post_pressure.unwrap_or(DEFAULT_POST_PRESSURE);
    let post_d = averages.post_deformation.unwrap_or(DEFAULT_POST_DEFORMATION);

    let pressure_reduction = reduction_percent(pre_p, post_p);
    let deformation_control = reduction_percent(pre_d, post_d);

    let volume_factor = (total_volume.max(0.0) / REFERENCE_VOLUME).min(MAX_VOLUME_FACTOR);
    let efficiency = ((pressure_reduction * 0.5 + deformation_control * 0.5) * volume_factor)
        .clamp(0.0, 100.0);

    let stability_index = (100.0 - (post_p * 1.2 + post_d * 3.0)).clamp(0.0, 100.0);

    finish(
        pressure_reduction,
        deformation_control,
        efficiency,
        stability_index,
        false,
    )
}

/// Deterministic stand-in for a borehole with no construction history.
///
/// Seeded from the entity id, so the same id always yields the same numbers.
pub fn simulated_result(entity_id: DbId) -> EvaluationResult {
    let mut rng = StdRng::seed_from_u64(entity_id as u64);
    let pressure_reduction = rng.random_range(60.0..=90.0);
    let deformation_control = rng.random_range(50.0..=85.0);
    let efficiency = rng.random_range(30.0..=80.0);
    let stability_index = rng.random_range(75.0..=95.0);

    finish(
        pressure_reduction,
        deformation_control,
        efficiency,
        stability_index,
        true,
    )
}

/// `(pre - post) / pre` as a non-negative percentage; 0 when `pre <= 0`.
fn reduction_percent(pre: f64, post: f64) -> f64 {
    if pre > 0.0 {
        ((pre - post) / pre * 100.0).max(0.0)
    } else {
        0.0
    }
}

fn finish(
    pressure_reduction: f64,
    deformation_control: f64,
    efficiency: f64,
    stability_index: f64,
    is_simulated: bool,
) -> EvaluationResult {
    EvaluationResult {
        pressure_reduction: round2(pressure_reduction),
        deformation_control: round2(deformation_control),
        efficiency: round2(efficiency),
        stability_index: round2(stability_index),
        level: StabilityLevel::from_index(stability_index),
        is_simulated,
    }
}

// ---------------------------------------------------------------------------
// Window comparison
// ---------------------------------------------------------------------------

/// Descriptive statistics of one metric inside one window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowStats {
    pub count: usize,
    pub max: f64,
    pub avg: f64,
    /// Coefficient of variation (population stddev / mean); 0 when mean is 0.
    pub fluctuation: f64,
}

/// Summarize a window's values. `None` when the window is empty.
pub fn summarize(values: &[f64]) -> Option<WindowStats> {
    if values.is_empty() {
        return None;
    }
    let count = values.len();
    let n = count as f64;
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let avg = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;
    let fluctuation = if avg != 0.0 {
        variance.sqrt() / avg.abs()
    } else {
        0.0
    };

    Some(WindowStats {
        count,
        max: round2(max),
        avg: round2(avg),
        fluctuation: round2(fluctuation),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn ts(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, day, 8, 0, 0).unwrap()
    }

    fn record(segment: Option<i32>, volume: Option<f64>, day: u32) -> ConstructionRecord {
        ConstructionRecord {
            id: 0,
            borehole_id: 1,
            segment_no: segment,
            pressure: Some(20.0),
            flow_rate: Some(1.5),
            total_volume: volume,
            recorded_at: ts(day),
        }
    }

    #[test]
    fn window_extends_seven_days_each_side() {
        let window = EvaluationWindow::from_construction(ts(10), ts(12));
        assert_eq!(window.pre_start, ts(3));
        assert_eq!(window.pre_end, ts(10));
        assert_eq!(window.post_start, ts(12));
        assert_eq!(window.post_end, ts(19));
    }

    #[test]
    fn window_from_records_uses_extremes() {
        let records = vec![record(Some(1), None, 14), record(Some(1), None, 11), record(Some(2), None, 16)];
        let window = EvaluationWindow::from_records(&records).unwrap();
        assert_eq!(window.pre_end, ts(11));
        assert_eq!(window.post_start, ts(16));
        assert!(EvaluationWindow::from_records(&[]).is_none());
    }

    #[test]
    fn total_volume_takes_segment_maxima() {
        let records = vec![
            record(Some(1), Some(100.0), 1),
            record(Some(1), Some(250.0), 2),
            record(Some(2), Some(80.0), 3),
            record(Some(2), None, 4),
            record(None, Some(20.0), 5),
        ];
        assert_eq!(total_construction_volume(&records), 350.0);
    }

    #[test]
    fn computes_indices_from_averages() {
        let averages = WindowAverages {
            pre_pressure: Some(40.0),
            pre_deformation: Some(10.0),
            post_pressure: Some(30.0),
            post_deformation: Some(4.0),
        };
        let result = compute_indices(&averages, 500.0);
        assert_eq!(result.pressure_reduction, 25.0);
        assert_eq!(result.deformation_control, 60.0);
        // (25*0.5 + 60*0.5) * 1.0
        assert_eq!(result.efficiency, 42.5);
        // 100 - (36 + 12)
        assert_eq!(result.stability_index, 52.0);
        assert_eq!(result.level, StabilityLevel::Normal);
        assert!(!result.is_simulated);
    }

    #[test]
    fn missing_windows_use_defaults() {
        let result = compute_indices(&WindowAverages::default(), 250.0);
        // pre 35/5, post 30/2
        assert_eq!(result.pressure_reduction, 14.29);
        assert_eq!(result.deformation_control, 60.0);
        assert_eq!(result.stability_index, 58.0);
    }

    #[test]
    fn volume_factor_is_capped() {
        let averages = WindowAverages {
            pre_pressure: Some(50.0),
            pre_deformation: Some(10.0),
            post_pressure: Some(10.0),
            post_deformation: Some(1.0),
        };
        let capped = compute_indices(&averages, 10_000.0);
        // (80*0.5 + 90*0.5) * 1.2 = 102 -> clamped to 100
        assert_eq!(capped.efficiency, 100.0);
        assert_eq!(capped.level, StabilityLevel::Stable);
    }

    #[test]
    fn worsening_roof_clamps_to_zero() {
        let averages = WindowAverages {
            pre_pressure: Some(0.0),
            pre_deformation: Some(3.0),
            post_pressure: Some(80.0),
            post_deformation: Some(9.0),
        };
        let result = compute_indices(&averages, 300.0);
        assert_eq!(result.pressure_reduction, 0.0);
        assert_eq!(result.deformation_control, 0.0);
        assert_eq!(result.efficiency, 0.0);
        assert_eq!(result.stability_index, 0.0);
        assert_eq!(result.level, StabilityLevel::Hazardous);
    }

    #[test]
    fn indices_stay_in_range() {
        let cases = [
            (Some(0.0), Some(0.0), Some(0.0), Some(0.0), 0.0),
            (Some(100.0), Some(50.0), Some(-10.0), Some(-5.0), 1e6),
            (None, None, Some(500.0), Some(500.0), -20.0),
            (Some(1.0), Some(1.0), Some(1.0), Some(1.0), 499.0),
        ];
        for (pre_p, pre_d, post_p, post_d, volume) in cases {
            let averages = WindowAverages {
                pre_pressure: pre_p,
                pre_deformation: pre_d,
                post_pressure: post_p,
                post_deformation: post_d,
            };
            let r = compute_indices(&averages, volume);
            assert!((0.0..=100.0).contains(&r.efficiency), "{r:?}");
            assert!((0.0..=100.0).contains(&r.stability_index), "{r:?}");
        }
    }

    #[test]
    fn simulated_result_is_reproducible_per_id() {
        let a = simulated_result(42);
        let b = simulated_result(42);
        assert_eq!(a, b);
        assert!(a.is_simulated);
        assert!((75.0..=95.0).contains(&a.stability_index));
        assert!((30.0..=80.0).contains(&a.efficiency));
        assert_eq!(a.level, StabilityLevel::Stable);
    }

    #[test]
    fn simulated_results_differ_between_ids() {
        assert_ne!(simulated_result(1), simulated_result(2));
    }

    #[test]
    fn stability_level_boundaries() {
        assert_eq!(StabilityLevel::from_index(70.01), StabilityLevel::Stable);
        assert_eq!(StabilityLevel::from_index(70.0), StabilityLevel::Normal);
        assert_eq!(StabilityLevel::from_index(40.01), StabilityLevel::Normal);
        assert_eq!(StabilityLevel::from_index(40.0), StabilityLevel::Hazardous);
    }

    #[test]
    fn level_uses_unrounded_index() {
        let averages = WindowAverages {
            pre_pressure: Some(35.0),
            pre_deformation: Some(12.0),
            post_pressure: Some(0.0),
            post_deformation: Some(9.9985),
        };
        // 100 - 29.9955 = 70.0045, displayed as 70.0 but above the stable line.
        let result = compute_indices(&averages, 500.0);
        assert_eq!(result.stability_index, 70.0);
        assert_eq!(result.level, StabilityLevel::Stable);
    }

    #[test]
    fn summarize_reports_max_avg_and_fluctuation() {
        let stats = summarize(&[30.0, 40.0, 50.0]).unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.max, 50.0);
        assert_eq!(stats.avg, 40.0);
        // stddev = sqrt(200/3) = 8.165, / 40 = 0.204
        assert_eq!(stats.fluctuation, 0.2);
        assert!(summarize(&[]).is_none());
    }
}
