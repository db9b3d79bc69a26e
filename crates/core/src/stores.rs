//! Store ports for the collaborators the analytic core depends on.
//!
//! The engines only ever hold `Arc<dyn ...>` handles to these traits, so the
//! Postgres adapters in `roofwatch-db` and the in-memory stores used by tests
//! are interchangeable.

use async_trait::async_trait;

use crate::alarm::{AlarmEvent, NewAlarm};
use crate::error::CoreError;
use crate::evaluation::ConstructionRecord;
use crate::metric::{MetricSample, MetricType};
use crate::types::{DbId, Timestamp};

/// Result type shared by every store port.
pub type StoreResult<T> = Result<T, CoreError>;

/// Key/value store for runtime-tunable settings.
///
/// Reads are expected to be cheap and uncached by callers. A `set` replaces a
/// single key atomically.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch a raw value; `None` when the key has never been set.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Insert or overwrite a single key.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Time-indexed storage of raw metric samples.
#[async_trait]
pub trait MetricStore: Send + Sync {
    /// Samples of one metric with `start <= recorded_at <= end`, oldest first.
    async fn query_range(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Vec<MetricSample>>;

    /// Mean value over the same range; `None` when there are no samples.
    async fn average(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Option<f64>>;

    /// Most recent sample of one metric; `None` when the series is empty.
    async fn latest(&self, metric_type: MetricType) -> StoreResult<Option<MetricSample>>;

    /// Append a sample (ingestion path).
    async fn append(&self, sample: &MetricSample) -> StoreResult<()>;
}

/// Append-only alarm history.
#[async_trait]
pub trait AlarmStore: Send + Sync {
    /// Persist one alarm in a single transaction. The store assigns the id
    /// and timestamp at commit time.
    async fn insert(&self, alarm: &NewAlarm) -> StoreResult<AlarmEvent>;

    /// Most recent alarms first.
    async fn recent(&self, limit: i64) -> StoreResult<Vec<AlarmEvent>>;
}

/// Boreholes and their fracture construction logs.
#[async_trait]
pub trait ConstructionStore: Send + Sync {
    /// Whether the borehole exists at all.
    async fn entity_exists(&self, borehole_id: DbId) -> StoreResult<bool>;

    /// Construction records for a borehole, ordered by `recorded_at`.
    async fn records_for(&self, borehole_id: DbId) -> StoreResult<Vec<ConstructionRecord>>;
}
