//! Repository for the `metric_samples` table (append-only time-series).

use roofwatch_core::metric::MetricType;
use roofwatch_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::metric_sample::MetricSampleRow;

/// Column list for `metric_samples` SELECT queries.
const COLUMNS: &str = "id, metric_type, value, recorded_at, created_at";

/// Provides query operations for raw metric samples.
pub struct MetricSampleRepo;

impl MetricSampleRepo {
    /// Append a single sample.
    pub async fn insert(
        pool: &PgPool,
        metric_type: MetricType,
        value: f64,
        recorded_at: Timestamp,
    ) -> Result<MetricSampleRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO metric_samples (metric_type, value, recorded_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MetricSampleRow>(&query)
            .bind(metric_type.name())
            .bind(value)
            .bind(recorded_at)
            .fetch_one(pool)
            .await
    }

    /// Samples of one metric inside `[start, end]`, oldest first.
    pub async fn list_in_range(
        pool: &PgPool,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Vec<MetricSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM metric_samples \
             WHERE metric_type = $1 AND recorded_at BETWEEN $2 AND $3 \
             ORDER BY recorded_at"
        );
        sqlx::query_as::<_, MetricSampleRow>(&query)
            .bind(metric_type.name())
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Mean value inside `[start, end]`; `None` when no rows match.
    pub async fn average_in_range(
        pool: &PgPool,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Option<f64>, sqlx::Error> {
        sqlx::query_scalar::<_, Option<f64>>(
            "SELECT AVG(value) FROM metric_samples \
             WHERE metric_type = $1 AND recorded_at BETWEEN $2 AND $3",
        )
        .bind(metric_type.name())
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }

    /// Newest sample of one metric, if any.
    pub async fn find_latest(
        pool: &PgPool,
        metric_type: MetricType,
    ) -> Result<Option<MetricSampleRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM metric_samples \
             WHERE metric_type = $1 \
             ORDER BY recorded_at DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, MetricSampleRow>(&query)
            .bind(metric_type.name())
            .fetch_optional(pool)
            .await
    }
}
