//! Postgres-backed implementations of the core store ports.

use async_trait::async_trait;
use roofwatch_core::alarm::{AlarmEvent, NewAlarm};
use roofwatch_core::error::CoreError;
use roofwatch_core::evaluation::ConstructionRecord;
use roofwatch_core::metric::{MetricSample, MetricType};
use roofwatch_core::stores::{AlarmStore, ConfigStore, ConstructionStore, MetricStore, StoreResult};
use roofwatch_core::types::{DbId, Timestamp};

use crate::repositories::{AlarmRecordRepo, ConstructionRepo, MetricSampleRepo, SystemConfigRepo};
use crate::DbPool;

/// All store ports over a single connection pool.
#[derive(Clone)]
pub struct PgStores {
    pool: DbPool,
}

impl PgStores {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Map a sqlx failure into the core persistence error.
fn persistence(err: sqlx::Error) -> CoreError {
    tracing::debug!(error = %err, "Store query failed");
    CoreError::Persistence(err.to_string())
}

#[async_trait]
impl ConfigStore for PgStores {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let row = SystemConfigRepo::get(&self.pool, key)
            .await
            .map_err(persistence)?;
        Ok(row.map(|r| r.config_value))
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        SystemConfigRepo::upsert(&self.pool, key, value)
            .await
            .map_err(persistence)?;
        Ok(())
    }
}

#[async_trait]
impl MetricStore for PgStores {
    async fn query_range(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Vec<MetricSample>> {
        MetricSampleRepo::list_in_range(&self.pool, metric_type, start, end)
            .await
            .map_err(persistence)?
            .into_iter()
            .map(MetricSample::try_from)
            .collect()
    }

    async fn average(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Option<f64>> {
        MetricSampleRepo::average_in_range(&self.pool, metric_type, start, end)
            .await
            .map_err(persistence)
    }

    async fn latest(&self, metric_type: MetricType) -> StoreResult<Option<MetricSample>> {
        MetricSampleRepo::find_latest(&self.pool, metric_type)
            .await
            .map_err(persistence)?
            .map(MetricSample::try_from)
            .transpose()
    }

    async fn append(&self, sample: &MetricSample) -> StoreResult<()> {
        MetricSampleRepo::insert(&self.pool, sample.metric_type, sample.value, sample.recorded_at)
            .await
            .map_err(persistence)?;
        Ok(())
    }
}

#[async_trait]
impl AlarmStore for PgStores {
    async fn insert(&self, alarm: &NewAlarm) -> StoreResult<AlarmEvent> {
        let row = AlarmRecordRepo::insert(&self.pool, alarm)
            .await
            .map_err(persistence)?;
        AlarmEvent::try_from(row)
    }

    async fn recent(&self, limit: i64) -> StoreResult<Vec<AlarmEvent>> {
        AlarmRecordRepo::list_recent(&self.pool, limit)
            .await
            .map_err(persistence)?
            .into_iter()
            .map(AlarmEvent::try_from)
            .collect()
    }
}

#[async_trait]
impl ConstructionStore for PgStores {
    async fn entity_exists(&self, borehole_id: DbId) -> StoreResult<bool> {
        ConstructionRepo::borehole_exists(&self.pool, borehole_id)
            .await
            .map_err(persistence)
    }

    async fn records_for(&self, borehole_id: DbId) -> StoreResult<Vec<ConstructionRecord>> {
        let rows = ConstructionRepo::list_for_borehole(&self.pool, borehole_id)
            .await
            .map_err(persistence)?;
        Ok(rows.into_iter().map(ConstructionRecord::from).collect())
    }
}
