//! Before/after effectiveness evaluation of a borehole's fracturing work.

use std::sync::Arc;

use chrono::Utc;
use roofwatch_core::error::CoreError;
use roofwatch_core::evaluation::{
    compute_indices, simulated_result, summarize, total_construction_volume, EvaluationResult,
    EvaluationWindow, WindowAverages, WindowStats,
};
use roofwatch_core::metric::MetricType;
use roofwatch_core::stores::{ConstructionStore, MetricStore, StoreResult};
use roofwatch_core::types::{DbId, Timestamp};
use serde::Serialize;

const ENTITY: &str = "Borehole";

/// Pre/post statistics of one metric around a borehole's construction period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowComparison {
    pub metric_type: MetricType,
    pub window: EvaluationWindow,
    pub pre: Option<WindowStats>,
    pub post: Option<WindowStats>,
}

pub struct EvaluationEngine {
    constructions: Arc<dyn ConstructionStore>,
    metrics: Arc<dyn MetricStore>,
}

impl EvaluationEngine {
    pub fn new(constructions: Arc<dyn ConstructionStore>, metrics: Arc<dyn MetricStore>) -> Self {
        Self {
            constructions,
            metrics,
        }
    }

    /// Compute the effectiveness indices for a borehole.
    ///
    /// A borehole without construction records gets a deterministic
    /// simulated result flagged with `is_simulated`.
    pub async fn evaluate(&self, borehole_id: DbId) -> Result<EvaluationResult, CoreError> {
        self.ensure_exists(borehole_id).await?;

        let records = self.constructions.records_for(borehole_id).await?;
        let Some(window) = EvaluationWindow::from_records(&records) else {
            tracing::debug!(borehole_id, "No construction records, returning simulated evaluation");
            return Ok(simulated_result(borehole_id));
        };

        let averages = WindowAverages {
            pre_pressure: self
                .average(MetricType::Pressure, window.pre_start, window.pre_end)
                .await?,
            pre_deformation: self
                .average(MetricType::Deformation, window.pre_start, window.pre_end)
                .await?,
            post_pressure: self
                .average(MetricType::Pressure, window.post_start, window.post_end)
                .await?,
            post_deformation: self
                .average(MetricType::Deformation, window.post_start, window.post_end)
                .await?,
        };
        let total_volume = total_construction_volume(&records);

        let result = compute_indices(&averages, total_volume);
        tracing::debug!(
            borehole_id,
            records = records.len(),
            total_volume,
            stability_index = result.stability_index,
            "Evaluation computed"
        );
        Ok(result)
    }

    /// Compare one metric's statistics before and after construction.
    ///
    /// Without construction records the windows are anchored at the current
    /// time: the pre window covers the last seven days and the post window
    /// lies in the future, so it is empty.
    pub async fn compare(
        &self,
        borehole_id: DbId,
        metric_type: MetricType,
    ) -> Result<WindowComparison, CoreError> {
        self.ensure_exists(borehole_id).await?;

        let records = self.constructions.records_for(borehole_id).await?;
        let window = EvaluationWindow::from_records(&records).unwrap_or_else(|| {
            let now = Utc::now();
            EvaluationWindow::from_construction(now, now)
        });

        let pre = self
            .window_values(metric_type, window.pre_start, window.pre_end)
            .await?;
        let post = self
            .window_values(metric_type, window.post_start, window.post_end)
            .await?;

        Ok(WindowComparison {
            metric_type,
            window,
            pre: summarize(&pre),
            post: summarize(&post),
        })
    }

    async fn ensure_exists(&self, borehole_id: DbId) -> Result<(), CoreError> {
        if self.constructions.entity_exists(borehole_id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: ENTITY,
                id: borehole_id,
            })
        }
    }

    async fn average(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Option<f64>> {
        self.metrics.average(metric_type, start, end).await
    }

    async fn window_values(
        &self,
        metric_type: MetricType,
        start: Timestamp,
        end: Timestamp,
    ) -> StoreResult<Vec<f64>> {
        let samples = self.metrics.query_range(metric_type, start, end).await?;
        Ok(samples.into_iter().map(|s| s.value).collect())
    }
}
