//! Bounded per-session alarm simulator.
//!
//! Gives a freshly connected dashboard something to show: a fixed number of
//! synthetic readings, each just above the current red threshold of a random
//! metric, run through the real alarm engine and pushed only to the owning
//! session. Iterations are strictly sequential.

use std::ops::Range;
use std::sync::Arc;

use rand::Rng;
use roofwatch_core::metric::MetricType;
use tokio_util::sync::CancellationToken;

use crate::config::SimulatorConfig;
use crate::engine::AlarmEngine;
use crate::notifications::DeliveryTarget;
use crate::ws::SessionTask;

/// Multiplier range applied to the red threshold.
const OVERSHOOT: Range<f64> = 1.1..1.3;

/// Spawn the simulator for one session and return its handle.
pub fn spawn(session_id: String, engine: Arc<AlarmEngine>, config: SimulatorConfig) -> SessionTask {
    let cancel = CancellationToken::new();
    let handle = tokio::spawn(run(session_id, engine, config, cancel.clone()));
    SessionTask { cancel, handle }
}

/// Run up to `config.iterations` synthetic checks, waiting `config.interval`
/// before each. Returns early once `cancel` fires.
pub async fn run(
    session_id: String,
    engine: Arc<AlarmEngine>,
    config: SimulatorConfig,
    cancel: CancellationToken,
) {
    tracing::debug!(
        session_id = %session_id,
        iterations = config.iterations,
        interval_secs = config.interval.as_secs(),
        "Alarm simulator started"
    );

    for iteration in 1..=config.iterations {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(session_id = %session_id, iteration, "Alarm simulator cancelled");
                return;
            }
            _ = tokio::time::sleep(config.interval) => {}
        }

        let (metric_type, factor) = {
            let mut rng = rand::rng();
            let metric_type = MetricType::ALL[rng.random_range(0..MetricType::ALL.len())];
            (metric_type, rng.random_range(OVERSHOOT))
        };
        let red = engine.thresholds_for(metric_type).await.red;
        let value = (red * factor * 100.0).round() / 100.0;

        let check = engine
            .check_threshold(
                metric_type,
                value,
                DeliveryTarget::Session(session_id.clone()),
            )
            .await;
        tracing::debug!(
            session_id = %session_id,
            iteration,
            metric_type = %metric_type,
            value,
            triggered = check.triggered,
            "Simulated reading checked"
        );
    }

    tracing::debug!(session_id = %session_id, "Alarm simulator finished");
}
