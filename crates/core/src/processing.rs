//! Raw feed cleaning.
//!
//! Third-party feeds arrive with gaps and the occasional spike. These helpers
//! run before samples are scored or compared.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Default z-score above which a reading is treated as an outlier.
pub const DEFAULT_OUTLIER_THRESHOLD: f64 = 3.0;

/// How [`fill_missing`] replaces absent readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStrategy {
    /// Mean of the present readings.
    #[default]
    Mean,
    /// Last present reading; leading gaps take the first present reading.
    Previous,
    /// Literal zero.
    Zero,
}

/// Drop readings more than `threshold` population standard deviations from
/// the mean. Series shorter than 3 or with zero spread are returned as-is.
pub fn remove_outliers(data: &[f64], threshold: f64) -> Vec<f64> {
    if data.len() < 3 {
        return data.to_vec();
    }
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let std_dev = (data.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    if std_dev == 0.0 {
        return data.to_vec();
    }
    data.iter()
        .copied()
        .filter(|v| ((v - mean) / std_dev).abs() <= threshold)
        .collect()
}

/// Replace `None` (and non-finite) readings according to `strategy`.
pub fn fill_missing(data: &[Option<f64>], strategy: FillStrategy) -> Vec<f64> {
    let present: Vec<f64> = data.iter().flatten().copied().filter(|v| v.is_finite()).collect();

    match strategy {
        FillStrategy::Zero => data.iter().map(|v| finite(*v).unwrap_or(0.0)).collect(),
        FillStrategy::Mean => {
            let mean = if present.is_empty() {
                0.0
            } else {
                present.iter().sum::<f64>() / present.len() as f64
            };
            data.iter().map(|v| finite(*v).unwrap_or(mean)).collect()
        }
        FillStrategy::Previous => {
            let mut last = present.first().copied().unwrap_or(0.0);
            data.iter()
                .map(|v| {
                    if let Some(v) = finite(*v) {
                        last = v;
                    }
                    last
                })
                .collect()
        }
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// Result of [`clean_series`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanedSeries {
    pub values: Vec<f64>,
    pub filled: usize,
    pub removed: usize,
}

/// Fill gaps, then drop outliers.
pub fn clean_series(
    data: &[Option<f64>],
    strategy: FillStrategy,
    threshold: f64,
) -> Result<CleanedSeries, CoreError> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(CoreError::Validation(format!(
            "outlier threshold must be a positive number, got {threshold}"
        )));
    }
    let filled = data.iter().filter(|v| finite(**v).is_none()).count();
    let complete = fill_missing(data, strategy);
    let values = remove_outliers(&complete, threshold);
    let removed = complete.len() - values.len();
    Ok(CleanedSeries {
        values,
        filled,
        removed,
    })
}
