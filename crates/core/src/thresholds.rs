//! Alarm threshold configuration and classification.
//!
//! Pure logic: no store access. The alarm engine reads raw config values
//! from the config store, resolves them here against the built-in defaults,
//! and classifies each reading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::alarm::AlarmLevel;
use crate::error::CoreError;
use crate::metric::MetricType;

/// Prefix shared by every threshold config key.
const KEY_PREFIX: &str = "alarm";

/// Which boundary of a [`ThresholdPair`] a config key addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdTier {
    Red,
    Yellow,
}

impl ThresholdTier {
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Yellow => "yellow",
        }
    }
}

/// Red/yellow boundaries for one metric. Invariant: `red > yellow >= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub red: f64,
    pub yellow: f64,
}

impl ThresholdPair {
    /// Check the `red > yellow >= 0` invariant.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.red.is_finite() || !self.yellow.is_finite() {
            return Err(CoreError::Validation(
                "thresholds must be finite numbers".to_string(),
            ));
        }
        if self.yellow < 0.0 {
            return Err(CoreError::Validation(format!(
                "yellow threshold must be >= 0, got {}",
                self.yellow
            )));
        }
        if self.red <= self.yellow {
            return Err(CoreError::Validation(format!(
                "red threshold ({}) must be greater than yellow threshold ({})",
                self.red, self.yellow
            )));
        }
        Ok(())
    }

    /// Return a copy with one boundary replaced.
    pub fn with(mut self, tier: ThresholdTier, value: f64) -> Self {
        match tier {
            ThresholdTier::Red => self.red = value,
            ThresholdTier::Yellow => self.yellow = value,
        }
        self
    }

    pub fn get(&self, tier: ThresholdTier) -> f64 {
        match tier {
            ThresholdTier::Red => self.red,
            ThresholdTier::Yellow => self.yellow,
        }
    }
}

/// Built-in thresholds used when the config store has no (valid) entry.
pub fn default_pair(metric: MetricType) -> ThresholdPair {
    match metric {
        MetricType::Pressure => ThresholdPair {
            red: 45.0,
            yellow: 35.0,
        },
        MetricType::Deformation => ThresholdPair {
            red: 15.0,
            yellow: 8.0,
        },
        MetricType::Seismic => ThresholdPair {
            red: 100_000.0,
            yellow: 50_000.0,
        },
    }
}

/// Effective thresholds for every metric type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThresholdConfig(pub BTreeMap<MetricType, ThresholdPair>);

impl ThresholdConfig {
    /// The built-in defaults for all metrics.
    pub fn defaults() -> Self {
        Self(
            MetricType::ALL
                .into_iter()
                .map(|m| (m, default_pair(m)))
                .collect(),
        )
    }

    /// Thresholds for one metric, falling back to the default pair.
    pub fn get(&self, metric: MetricType) -> ThresholdPair {
        self.0
            .get(&metric)
            .copied()
            .unwrap_or_else(|| default_pair(metric))
    }
}

/// Config store key for one threshold boundary, e.g. `alarm.pressure.red`.
pub fn config_key(metric: MetricType, tier: ThresholdTier) -> String {
    format!("{KEY_PREFIX}.{}.{}", metric.name(), tier.name())
}

/// Parse a key produced by [`config_key`].
pub fn parse_config_key(key: &str) -> Result<(MetricType, ThresholdTier), CoreError> {
    let invalid = || {
        CoreError::Validation(format!(
            "Invalid threshold key '{key}'. Expected '{KEY_PREFIX}.<metric>.<red|yellow>'"
        ))
    };

    let mut parts = key.split('.');
    let (Some(prefix), Some(metric), Some(tier), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    if prefix != KEY_PREFIX {
        return Err(invalid());
    }
    let metric = MetricType::from_name(metric)?;
    let tier = match tier {
        "red" => ThresholdTier::Red,
        "yellow" => ThresholdTier::Yellow,
        _ => return Err(invalid()),
    };
    Ok((metric, tier))
}

/// Parse a raw config-store value into a threshold number.
pub fn parse_threshold_value(raw: &str) -> Result<f64, CoreError> {
    let value: f64 = raw.trim().parse().map_err(|_| {
        CoreError::Validation(format!("threshold value '{raw}' is not a number"))
    })?;
    if !value.is_finite() {
        return Err(CoreError::Validation(format!(
            "threshold value '{raw}' must be finite"
        )));
    }
    Ok(value)
}

/// Classify a reading. Returns the level and the boundary that was reached,
/// or `None` when the value is below the yellow threshold.
pub fn classify(value: f64, thresholds: &ThresholdPair) -> Option<(AlarmLevel, f64)> {
    if value >= thresholds.red {
        Some((AlarmLevel::Red, thresholds.red))
    } else if value >= thresholds.yellow {
        Some((AlarmLevel::Yellow, thresholds.yellow))
    } else {
        None
    }
}
