//! Raw monitoring sample rows (append-only).

use roofwatch_core::error::CoreError;
use roofwatch_core::metric::{MetricSample, MetricType};
use roofwatch_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row in `metric_samples`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MetricSampleRow {
    pub id: DbId,
    pub metric_type: String,
    pub value: f64,
    pub recorded_at: Timestamp,
    pub created_at: Timestamp,
}

impl TryFrom<MetricSampleRow> for MetricSample {
    type Error = CoreError;

    fn try_from(row: MetricSampleRow) -> Result<Self, Self::Error> {
        Ok(MetricSample {
            metric_type: MetricType::from_name(&row.metric_type)?,
            value: row.value,
            recorded_at: row.recorded_at,
        })
    }
}
