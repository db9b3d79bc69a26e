//! Alarm history rows.

use roofwatch_core::alarm::{AlarmEvent, AlarmLevel, AlarmStatus};
use roofwatch_core::error::CoreError;
use roofwatch_core::metric::MetricType;
use roofwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row in `alarm_records`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlarmRecord {
    pub id: DbId,
    pub timestamp: Timestamp,
    pub metric_type: String,
    pub level: String,
    pub value: f64,
    pub threshold_applied: f64,
    pub message: String,
    pub status: String,
    pub handler_remark: Option<String>,
}

impl TryFrom<AlarmRecord> for AlarmEvent {
    type Error = CoreError;

    fn try_from(row: AlarmRecord) -> Result<Self, Self::Error> {
        Ok(AlarmEvent {
            id: row.id,
            timestamp: row.timestamp,
            metric_type: MetricType::from_name(&row.metric_type)?,
            level: AlarmLevel::from_name(&row.level)?,
            value: row.value,
            threshold_applied: row.threshold_applied,
            message: row.message,
            status: AlarmStatus::from_name(&row.status)?,
        })
    }
}
