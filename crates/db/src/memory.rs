//! Process-local implementation of every store port.
//!
//! Used by the API integration tests. Ids and timestamps are assigned at
//! insert time under the alarm lock, mirroring `BIGSERIAL` / `DEFAULT NOW()`.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use roofwatch_core::alarm::{AlarmEvent, AlarmStatus, NewAlarm};
use roofwatch_core::error::CoreError;
use roofwatch_core::evaluation::ConstructionRecord;
use roofwatch_core::metric::{MetricSample, MetricType};
use roofwatch_core::stores::{AlarmStore, ConfigStore, ConstructionStore, MetricStore, StoreResult};
use roofwatch_core::types::{DbId, Timestamp};
use tokio::sync::{Mutex, RwLock};

#[derive(Default)]
struct AlarmTable {
    next_id: DbId,
    rows: Vec<AlarmEvent>,
}

/// In-memory config, metric, alarm and construction store.
#[derive(Default)]
pub struct InMemoryStore {
    config: RwLock<HashMap<String, String>>,
    samples: RwLock<Vec<MetricSample>>,
    alarms: Mutex<AlarmTable>,
    boreholes: RwLock<BTreeMap<DbId, Vec<ConstructionRecord>>>,
    fail_alarm_inserts: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a borehole with no construction history.
    pub async fn add_borehole(&self, borehole_id: DbId) {
        self.boreholes.write().await.entry(borehole_id).or_default();
    }

    /// Append a construction record, registering its borehole if needed.
    pub async fn add_construction_record(&self, record: ConstructionRecord) {
        let mut boreholes = self.boreholes.write().await;
        let records = boreholes.entry(record.borehole_id).or_default();
        records.push(record);
        records.sort_by_key(|r| r.recorded_at);
    }

    /// Make every subsequent alarm insert fail (or succeed again).
    pub fn set_fail_alarm_inserts(&self, fail: bool) {
        self.fail_alarm_inserts.store(fail, Ordering::SeqCst);
    }

    /// Number of persisted alarms.
    pub async fn alarm_count(&self) -> usize {
        self.alarms.lock().await.rows.len()
    }

    fn in_range<'a>(
        samples: &'a [MetricSample],
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> impl Iterator<Item = &'a MetricSample> {
        samples.iter().filter(move |s| {
            s.metric_type == metric_type && s.recorded_at >= start && s.recorded_at <= end
        })
    }
}

#[async_trait]
impl ConfigStore for InMemoryStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.config.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.config
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[async_trait]
impl MetricStore for InMemoryStore {
    async fn query_range(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Vec<MetricSample>> {
        let samples = self.samples.read().await;
        let mut matching: Vec<MetricSample> = Self::in_range(&samples, metric_type, start, end)
            .cloned()
            .collect();
        matching.sort_by_key(|s| s.recorded_at);
        Ok(matching)
    }

    async fn average(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Option<f64>> {
        let samples = self.samples.read().await;
        let (sum, count) = Self::in_range(&samples, metric_type, start, end)
            .fold((0.0, 0usize), |(sum, count), s| (sum + s.value, count + 1));
        Ok((count > 0).then(|| sum / count as f64))
    }

    async fn latest(&self, metric_type: MetricType) -> StoreResult<Option<MetricSample>> {
        Ok(self
            .samples
            .read()
            .await
            .iter()
            .filter(|s| s.metric_type == metric_type)
            .max_by_key(|s| s.recorded_at)
            .cloned())
    }

    async fn append(&self, sample: &MetricSample) -> StoreResult<()> {
        self.samples.write().await.push(sample.clone());
        Ok(())
    }
}

#[async_trait]
impl AlarmStore for InMemoryStore {
    async fn insert(&self, alarm: &NewAlarm) -> StoreResult<AlarmEvent> {
        if self.fail_alarm_inserts.load(Ordering::SeqCst) {
            return Err(CoreError::Persistence(
                "alarm store rejected the insert".to_string(),
            ));
        }

        let mut table = self.alarms.lock().await;
        table.next_id += 1;
        let event = AlarmEvent {
            id: table.next_id,
            timestamp: Utc::now(),
            metric_type: alarm.metric_type,
            level: alarm.level,
            value: alarm.value,
            threshold_applied: alarm.threshold_applied,
            message: alarm.message.clone(),
            status: AlarmStatus::Pending,
        };
        table.rows.push(event.clone());
        Ok(event)
    }

    async fn recent(&self, limit: i64) -> StoreResult<Vec<AlarmEvent>> {
        let limit = usize::try_from(limit.max(0)).unwrap_or(usize::MAX);
        let table = self.alarms.lock().await;
        let mut rows = table.rows.clone();
        rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
        rows.truncate(limit);
        Ok(rows)
    }
}

#[async_trait]
impl ConstructionStore for InMemoryStore {
    async fn entity_exists(&self, borehole_id: DbId) -> StoreResult<bool> {
        Ok(self.boreholes.read().await.contains_key(&borehole_id))
    }

    async fn records_for(&self, borehole_id: DbId) -> StoreResult<Vec<ConstructionRecord>> {
        Ok(self
            .boreholes
            .read()
            .await
            .get(&borehole_id)
            .cloned()
            .unwrap_or_default())
    }
}
