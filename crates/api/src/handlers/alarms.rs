//! Handlers for threshold alarms: ad-hoc checks, history and thresholds.

use axum::extract::{Query, State};
use axum::Json;
use roofwatch_core::alarm::AlarmEvent;
use roofwatch_core::metric::MetricType;
use roofwatch_core::thresholds::ThresholdConfig;
use serde::Deserialize;

use crate::engine::AlarmCheck;
use crate::error::{AppError, AppResult};
use crate::notifications::DeliveryTarget;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default number of alarms returned by the history endpoint.
const DEFAULT_HISTORY_LIMIT: i64 = 50;
/// Largest history page a client may request.
const MAX_HISTORY_LIMIT: i64 = 500;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct CheckRequest {
    pub metric_type: String,
    pub value: f64,
    /// Push only to this session; broadcast when absent.
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateThresholdRequest {
    /// e.g. `alarm.pressure.red`
    pub key: String,
    pub value: f64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /alarms/check
pub async fn check(
    State(state): State<AppState>,
    Json(input): Json<CheckRequest>,
) -> AppResult<Json<DataResponse<AlarmCheck>>> {
    let metric_type = MetricType::from_name(&input.metric_type)?;
    if !input.value.is_finite() {
        return Err(AppError::BadRequest("value must be a finite number".to_string()));
    }

    let target = match input.session_id {
        Some(id) => DeliveryTarget::Session(id),
        None => DeliveryTarget::Broadcast,
    };
    let result = state
        .alarm_engine
        .check_threshold(metric_type, input.value, target)
        .await;
    Ok(Json(DataResponse { data: result }))
}

/// GET /alarms/history?limit=
pub async fn history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> AppResult<Json<DataResponse<Vec<AlarmEvent>>>> {
    let limit = query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    if !(1..=MAX_HISTORY_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "limit must be between 1 and {MAX_HISTORY_LIMIT}"
        )));
    }
    let alarms = state.alarm_engine.alarm_history(limit).await?;
    Ok(Json(DataResponse { data: alarms }))
}

/// GET /alarms/config
pub async fn get_config(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ThresholdConfig>>> {
    let config = state.alarm_engine.threshold_config().await;
    Ok(Json(DataResponse { data: config }))
}

/// PUT /alarms/config
pub async fn update_config(
    State(state): State<AppState>,
    Json(input): Json<UpdateThresholdRequest>,
) -> AppResult<Json<DataResponse<ThresholdConfig>>> {
    let config = state
        .alarm_engine
        .set_threshold(&input.key, input.value)
        .await?;
    Ok(Json(DataResponse { data: config }))
}
