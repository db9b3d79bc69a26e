//! Tests for `EvaluationEngine` over the in-memory stores.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::{Duration, TimeZone, Utc};
use roofwatch_api::engine::EvaluationEngine;
use roofwatch_core::error::CoreError;
use roofwatch_core::evaluation::{simulated_result, ConstructionRecord, StabilityLevel};
use roofwatch_core::metric::{MetricSample, MetricType};
use roofwatch_core::stores::MetricStore;
use roofwatch_core::types::Timestamp;
use roofwatch_db::InMemoryStore;

fn engine(store: &Arc<InMemoryStore>) -> EvaluationEngine {
    EvaluationEngine::new(store.clone(), store.clone())
}

fn day(d: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 4, d, 12, 0, 0).unwrap()
}

fn record(id: i64, segment: i32, volume: f64, at: Timestamp) -> ConstructionRecord {
    ConstructionRecord {
        id,
        borehole_id: 1,
        segment_no: Some(segment),
        pressure: Some(22.0),
        flow_rate: Some(1.4),
        total_volume: Some(volume),
        recorded_at: at,
    }
}

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

/// Borehole 1 fractured on 10-12 April; pressure and deformation measured
/// in the week before and the week after.
async fn seeded_store() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store.add_construction_record(record(1, 1, 150.0, day(10))).await;
    store.add_construction_record(record(2, 1, 300.0, day(11))).await;
    store.add_construction_record(record(3, 2, 200.0, day(12))).await;

    for (value, at) in [(38.0, day(5)), (42.0, day(8))] {
        sample(&store, MetricType::Pressure, value, at).await;
    }
    for (value, at) in [(6.0, day(6)), (8.0, day(9))] {
        sample(&store, MetricType::Deformation, value, at).await;
    }
    for (value, at) in [(28.0, day(14)), (32.0, day(16))] {
        sample(&store, MetricType::Pressure, value, at).await;
    }
    for (value, at) in [(2.0, day(15)), (4.0, day(18))] {
        sample(&store, MetricType::Deformation, value, at).await;
    }
    store
}

// ---------------------------------------------------------------------------
// Test: indices computed from window averages and pumped volume
// ---------------------------------------------------------------------------

#[tokio::test]
async fn evaluates_from_windows() {
    let store = seeded_store().await;

    let result = engine(&store).evaluate(1).await.unwrap();

    // pre 40 / 7, post 30 / 3, volume 300 + 200 = 500
    assert!(!result.is_simulated);
    assert_eq!(result.pressure_reduction, 25.0);
    assert_eq!(result.deformation_control, 57.14);
    assert_eq!(result.efficiency, 41.07);
    assert_eq!(result.stability_index, 55.0);
    assert_eq!(result.level, StabilityLevel::Normal);
}

// ---------------------------------------------------------------------------
// Test: samples outside the seven-day margins are ignored
// ---------------------------------------------------------------------------

#[tokio::test]
async fn samples_outside_windows_are_ignored() {
    let store = seeded_store().await;
    sample(&store, MetricType::Pressure, 500.0, day(1)).await;
    sample(&store, MetricType::Pressure, 500.0, day(25)).await;

    let result = engine(&store).evaluate(1).await.unwrap();

    assert_eq!(result.pressure_reduction, 25.0);
}

// ---------------------------------------------------------------------------
// Test: empty windows fall back to the default averages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_windows_use_defaults() {
    let store = Arc::new(InMemoryStore::new());
    store.add_construction_record(record(1, 1, 500.0, day(10))).await;

    let result = engine(&store).evaluate(1).await.unwrap();

    // pre 35 / 5, post 30 / 2
    assert!(!result.is_simulated);
    assert_eq!(result.pressure_reduction, 14.29);
    assert_eq!(result.deformation_control, 60.0);
    assert_eq!(result.stability_index, 58.0);
}

// ---------------------------------------------------------------------------
// Test: no construction history yields a reproducible simulated result
// ---------------------------------------------------------------------------

#[tokio::test]
async fn borehole_without_records_is_simulated() {
    let store = Arc::new(InMemoryStore::new());
    store.add_borehole(7).await;
    let engine = engine(&store);

    let first = engine.evaluate(7).await.unwrap();
    let second = engine.evaluate(7).await.unwrap();

    assert!(first.is_simulated);
    assert_eq!(first, second);
    assert_eq!(first, simulated_result(7));
}

// ---------------------------------------------------------------------------
// Test: unknown borehole is NotFound for both operations
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_borehole_is_not_found() {
    let store = Arc::new(InMemoryStore::new());
    let engine = engine(&store);

    assert_matches!(
        engine.evaluate(404).await,
        Err(CoreError::NotFound { id: 404, .. })
    );
    assert_matches!(
        engine.compare(404, MetricType::Pressure).await,
        Err(CoreError::NotFound { id: 404, .. })
    );
}

// ---------------------------------------------------------------------------
// Test: compare summarises each window separately
// ---------------------------------------------------------------------------

#[tokio::test]
async fn compare_reports_pre_and_post_stats() {
    let store = seeded_store().await;

    let comparison = engine(&store).compare(1, MetricType::Pressure).await.unwrap();

    assert_eq!(comparison.window.pre_end, day(10));
    assert_eq!(comparison.window.post_start, day(12));
    let pre = comparison.pre.unwrap();
    let post = comparison.post.unwrap();
    assert_eq!((pre.count, pre.max, pre.avg), (2, 42.0, 40.0));
    assert_eq!((post.count, post.max, post.avg), (2, 32.0, 30.0));
    assert!(post.fluctuation > 0.0);
}

// ---------------------------------------------------------------------------
// Test: without records, compare looks at the last seven days
// ---------------------------------------------------------------------------

#[tokio::test]
async fn compare_without_records_is_anchored_at_now() {
    let store = Arc::new(InMemoryStore::new());
    store.add_borehole(3).await;
    let now = Utc::now();
    sample(&store, MetricType::Seismic, 2_000.0, now - Duration::days(2)).await;
    sample(&store, MetricType::Seismic, 4_000.0, now - Duration::days(1)).await;
    sample(&store, MetricType::Seismic, 9_000.0, now - Duration::days(30)).await;

    let comparison = engine(&store).compare(3, MetricType::Seismic).await.unwrap();

    let pre = comparison.pre.unwrap();
    assert_eq!(pre.count, 2);
    assert_eq!(pre.avg, 3_000.0);
    assert!(comparison.post.is_none());
}
