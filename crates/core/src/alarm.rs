//! Alarm record types produced by the threshold engine.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::metric::MetricType;
use crate::types::{DbId, Timestamp};

/// Severity of a threshold violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlarmLevel {
    /// Value reached the yellow threshold but not the red one.
    Yellow,
    /// Value reached the red threshold.
    Red,
}

impl AlarmLevel {
    /// Database / wire name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "YELLOW" => Ok(Self::Yellow),
            "RED" => Ok(Self::Red),
            other => Err(CoreError::Validation(format!(
                "Unknown alarm level '{other}'"
            ))),
        }
    }
}

/// Operator handling state. Only ever set to `Pending` by this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlarmStatus {
    #[default]
    Pending,
    Acknowledged,
    Cleared,
}

impl AlarmStatus {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Cleared => "CLEARED",
        }
    }

    pub fn from_name(name: &str) -> Result<Self, CoreError> {
        match name {
            "PENDING" => Ok(Self::Pending),
            "ACKNOWLEDGED" => Ok(Self::Acknowledged),
            "CLEARED" => Ok(Self::Cleared),
            other => Err(CoreError::Validation(format!(
                "Unknown alarm status '{other}'"
            ))),
        }
    }
}

/// An alarm about to be persisted. The store assigns `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAlarm {
    pub metric_type: MetricType,
    pub level: AlarmLevel,
    pub value: f64,
    pub threshold_applied: f64,
    pub message: String,
}

impl NewAlarm {
    /// Build an alarm for a classified reading, with the standard message.
    pub fn new(metric_type: MetricType, level: AlarmLevel, value: f64, threshold: f64) -> Self {
        Self {
            metric_type,
            level,
            value,
            threshold_applied: threshold,
            message: alarm_message(metric_type, level, value, threshold),
        }
    }
}

/// A persisted alarm as returned by the alarm store and pushed to sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub metric_type: MetricType,
    pub level: AlarmLevel,
    pub value: f64,
    pub threshold_applied: f64,
    pub message: String,
    pub status: AlarmStatus,
}

/// Human-readable alarm description embedding metric, value, threshold and level.
pub fn alarm_message(metric_type: MetricType, level: AlarmLevel, value: f64, threshold: f64) -> String {
    let unit = metric_type.unit();
    format!(
        "{} alarm: {metric_type} reading {value:.2} {unit} reached threshold {threshold:.2} {unit}",
        level.name()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_embeds_all_fields() {
        let msg = alarm_message(MetricType::Pressure, AlarmLevel::Red, 50.0, 45.0);
        assert_eq!(msg, "RED alarm: pressure reading 50.00 MPa reached threshold 45.00 MPa");
    }

    #[test]
    fn level_and_status_names_round_trip() {
        for level in [AlarmLevel::Yellow, AlarmLevel::Red] {
            assert_eq!(AlarmLevel::from_name(level.name()).unwrap(), level);
        }
        for status in [AlarmStatus::Pending, AlarmStatus::Acknowledged, AlarmStatus::Cleared] {
            assert_eq!(AlarmStatus::from_name(status.name()).unwrap(), status);
        }
    }

    #[test]
    fn level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&AlarmLevel::Yellow).unwrap(), "\"YELLOW\"");
    }
}
