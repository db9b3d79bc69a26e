//! Live fusion score over the newest stored sample of each metric.

use std::sync::Arc;

use roofwatch_core::error::CoreError;
use roofwatch_core::fusion::{
    fuse, FusionResult, FALLBACK_DEFORMATION, FALLBACK_PRESSURE, FALLBACK_SEISMIC,
};
use roofwatch_core::metric::MetricType;
use roofwatch_core::stores::MetricStore;
use roofwatch_core::types::Timestamp;
use serde::Serialize;

/// The reading fed to the scorer for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FusionInput {
    pub value: f64,
    /// When the sample was recorded; `None` if the fallback value was used.
    pub recorded_at: Option<Timestamp>,
}

/// Fusion result together with the readings it was computed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveFusion {
    pub pressure: FusionInput,
    pub seismic: FusionInput,
    pub deformation: FusionInput,
    pub result: FusionResult,
}

pub struct FusionEngine {
    metrics: Arc<dyn MetricStore>,
}

impl FusionEngine {
    pub fn new(metrics: Arc<dyn MetricStore>) -> Self {
        Self { metrics }
    }

    /// Score the newest pressure, seismic and deformation samples.
    ///
    /// A series with no samples (or a non-finite latest value) contributes
    /// its fallback reading instead.
    pub async fn latest_score(&self) -> Result<LiveFusion, CoreError> {
        let pressure = self.input(MetricType::Pressure, FALLBACK_PRESSURE).await?;
        let seismic = self.input(MetricType::Seismic, FALLBACK_SEISMIC).await?;
        let deformation = self
            .input(MetricType::Deformation, FALLBACK_DEFORMATION)
            .await?;

        let result = fuse(pressure.value, seismic.value, deformation.value);
        tracing::debug!(
            pressure = pressure.value,
            seismic = seismic.value,
            deformation = deformation.value,
            stability_score = result.stability_score,
            "Live fusion computed"
        );

        Ok(LiveFusion {
            pressure,
            seismic,
            deformation,
            result,
        })
    }

    async fn input(&self, metric_type: MetricType, fallback: f64) -> Result<FusionInput, CoreError> {
        match self.metrics.latest(metric_type).await? {
            Some(sample) if sample.value.is_finite() => Ok(FusionInput {
                value: sample.value,
                recorded_at: Some(sample.recorded_at),
            }),
            _ => Ok(FusionInput {
                value: fallback,
                recorded_at: None,
            }),
        }
    }
}
