//! Tests for `FusionEngine` over the in-memory metric store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use roofwatch_api::engine::FusionEngine;
use roofwatch_core::fusion::{RiskLevel, FALLBACK_DEFORMATION, FALLBACK_PRESSURE, FALLBACK_SEISMIC};
use roofwatch_core::metric::{MetricSample, MetricType};
use roofwatch_core::stores::MetricStore;
use roofwatch_core::types::Timestamp;
use roofwatch_db::InMemoryStore;

async fn sample(store: &InMemoryStore, metric_type: MetricType, value: f64, at: Timestamp) {
    store
        .append(&MetricSample {
            metric_type,
            value,
            recorded_at: at,
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_store_scores_fallback_readings() {
    let engine = FusionEngine::new(Arc::new(InMemoryStore::new()));

    let live = engine.latest_score().await.unwrap();

    assert_eq!(live.pressure.value, FALLBACK_PRESSURE);
    assert_eq!(live.seismic.value, FALLBACK_SEISMIC);
    assert_eq!(live.deformation.value, FALLBACK_DEFORMATION);
    assert!(live.pressure.recorded_at.is_none());
    // P: 100 - 7*5 = 65, S: 100 - log10(5000/1000)*20 = 86.02, D: 100 - 9.6 = 90.4
    assert_eq!(live.result.stability_score, 78.71);
    assert_eq!(live.result.risk_level, RiskLevel::Green);
}

#[tokio::test]
async fn newest_sample_of_each_metric_is_scored() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();
    sample(&store, MetricType::Pressure, 30.0, now - Duration::hours(3)).await;
    sample(&store, MetricType::Pressure, 45.0, now - Duration::minutes(5)).await;
    sample(&store, MetricType::Seismic, 100_000.0, now - Duration::minutes(10)).await;
    sample(&store, MetricType::Deformation, 2.0, now - Duration::days(1)).await;
    sample(&store, MetricType::Deformation, 6.0, now - Duration::hours(1)).await;
    let engine = FusionEngine::new(store);

    let live = engine.latest_score().await.unwrap();

    assert_eq!(live.pressure.value, 45.0);
    assert_eq!(live.pressure.recorded_at, Some(now - Duration::minutes(5)));
    assert_eq!(live.seismic.value, 100_000.0);
    assert_eq!(live.deformation.value, 6.0);
    // P: 0, S: 60, D: 52 -> 21 + 13
    assert_eq!(live.result.stability_score, 34.0);
    assert_eq!(live.result.risk_level, RiskLevel::Red);
}

#[tokio::test]
async fn missing_series_fall_back_individually() {
    let store = Arc::new(InMemoryStore::new());
    let now = Utc::now();
    sample(&store, MetricType::Seismic, 2_000_000.0, now).await;
    let engine = FusionEngine::new(store);

    let live = engine.latest_score().await.unwrap();

    assert_eq!(live.pressure.value, FALLBACK_PRESSURE);
    assert_eq!(live.seismic.value, 2_000_000.0);
    assert_eq!(live.seismic.recorded_at, Some(now));
    assert_eq!(live.deformation.value, FALLBACK_DEFORMATION);
}
