//! Handlers for fracturing effectiveness evaluation.

use axum::extract::{Path, Query, State};
use axum::Json;
use roofwatch_core::evaluation::EvaluationResult;
use roofwatch_core::metric::MetricType;
use roofwatch_core::types::DbId;
use serde::Deserialize;

use crate::engine::WindowComparison;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Metric to compare (default: `pressure`).
    #[serde(rename = "type")]
    pub metric_type: Option<String>,
}

/// GET /evaluation/{borehole_id}
pub async fn evaluate(
    State(state): State<AppState>,
    Path(borehole_id): Path<DbId>,
) -> AppResult<Json<DataResponse<EvaluationResult>>> {
    let result = state.evaluation_engine.evaluate(borehole_id).await?;
    Ok(Json(DataResponse { data: result }))
}

/// GET /evaluation/{borehole_id}/compare?type=
pub async fn compare(
    State(state): State<AppState>,
    Path(borehole_id): Path<DbId>,
    Query(query): Query<CompareQuery>,
) -> AppResult<Json<DataResponse<WindowComparison>>> {
    let metric_type = match query.metric_type.as_deref() {
        Some(name) => MetricType::from_name(name)?,
        None => MetricType::Pressure,
    };
    let comparison = state
        .evaluation_engine
        .compare(borehole_id, metric_type)
        .await?;
    Ok(Json(DataResponse { data: comparison }))
}
