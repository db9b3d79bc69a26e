//! Monitored metric kinds and raw samples.
//!
//! The three series the dashboard ingests from third-party feeds:
//! support pressure (KJ653, MPa), microseismic energy (SOS, J) and roadway
//! deformation rate (mm/d).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Support pressure in MPa.
pub const METRIC_PRESSURE: &str = "pressure";

/// Microseismic event energy in joules.
pub const METRIC_SEISMIC: &str = "seismic";

/// Roadway deformation rate in mm/d.
pub const METRIC_DEFORMATION: &str = "deformation";

/// A monitored metric series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricType {
    Pressure,
    Seismic,
    Deformation,
}

impl MetricType {
    /// Every metric type, in a stable order.
    pub const ALL: [MetricType; 3] = [Self::Pressure, Self::Seismic, Self::Deformation];

    /// Parse from the canonical lowercase name.
    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            METRIC_PRESSURE => Ok(Self::Pressure),
            METRIC_SEISMIC => Ok(Self::Seismic),
            METRIC_DEFORMATION => Ok(Self::Deformation),
            other => Err(CoreError::Validation(format!(
                "Unknown metric type '{other}'. Must be one of: \
                 {METRIC_PRESSURE}, {METRIC_SEISMIC}, {METRIC_DEFORMATION}"
            ))),
        }
    }

    /// Canonical name, as stored in the database and used in config keys.
    pub fn name(self) -> &'static str {
        match self {
            Self::Pressure => METRIC_PRESSURE,
            Self::Seismic => METRIC_SEISMIC,
            Self::Deformation => METRIC_DEFORMATION,
        }
    }

    /// Engineering unit for display in alarm messages.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Pressure => "MPa",
            Self::Seismic => "J",
            Self::Deformation => "mm/d",
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single stored reading. Immutable once ingested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    pub metric_type: MetricType,
    pub value: f64,
    pub recorded_at: Timestamp,
}
