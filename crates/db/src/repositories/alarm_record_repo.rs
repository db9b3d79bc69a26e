//! Repository for the `alarm_records` table.

use roofwatch_core::alarm::{AlarmStatus, NewAlarm};
use sqlx::PgPool;

use crate::models::alarm::AlarmRecord;

/// Column list for `alarm_records` queries.
const COLUMNS: &str = "\
    id, timestamp, metric_type, level, value, threshold_applied, \
    message, status, handler_remark";

/// Provides query operations for alarm history.
pub struct AlarmRecordRepo;

impl AlarmRecordRepo {
    /// Insert a new alarm. `id` and `timestamp` are assigned by Postgres.
    ///
    /// A single `INSERT ... RETURNING` runs in its own implicit transaction,
    /// so a failed insert never leaves a partial row.
    pub async fn insert(pool: &PgPool, alarm: &NewAlarm) -> Result<AlarmRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO alarm_records \
                (metric_type, level, value, threshold_applied, message, status) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AlarmRecord>(&query)
            .bind(alarm.metric_type.name())
            .bind(alarm.level.name())
            .bind(alarm.value)
            .bind(alarm.threshold_applied)
            .bind(&alarm.message)
            .bind(AlarmStatus::Pending.name())
            .fetch_one(pool)
            .await
    }

    /// Most recent alarms first, ties broken by id.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<AlarmRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM alarm_records \
             ORDER BY timestamp DESC, id DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, AlarmRecord>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
