//! Handlers for raw-data processing: fusion scoring and series cleaning.

use axum::extract::State;
use axum::Json;
use roofwatch_core::fusion::{fuse, validate_reading, FusionResult};
use roofwatch_core::processing::{clean_series, CleanedSeries, FillStrategy, DEFAULT_OUTLIER_THRESHOLD};
use serde::Deserialize;

use crate::engine::LiveFusion;
use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// One reading per source, taken at the same instant.
#[derive(Debug, Deserialize)]
pub struct FuseRequest {
    /// Support pressure (MPa).
    pub pressure: f64,
    /// Microseismic energy (J).
    pub seismic: f64,
    /// Roadway deformation rate (mm/d).
    pub deformation: f64,
}

#[derive(Debug, Deserialize)]
pub struct CleanRequest {
    /// Raw series; `null` marks a missing reading.
    pub data: Vec<Option<f64>>,
    #[serde(default)]
    pub strategy: FillStrategy,
    /// z-score cut-off (default 3.0).
    pub threshold: Option<f64>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /processing/fuse
pub async fn fuse_readings(
    Json(input): Json<FuseRequest>,
) -> AppResult<Json<DataResponse<FusionResult>>> {
    validate_reading("pressure", input.pressure)?;
    validate_reading("seismic", input.seismic)?;
    validate_reading("deformation", input.deformation)?;

    let result = fuse(input.pressure, input.seismic, input.deformation);
    Ok(Json(DataResponse { data: result }))
}

/// GET /processing/fuse/latest
///
/// Score the newest stored sample of each metric.
pub async fn latest_fusion(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<LiveFusion>>> {
    let live = state.fusion_engine.latest_score().await?;
    Ok(Json(DataResponse { data: live }))
}

/// POST /processing/clean
///
/// Fill gaps, then drop outliers.
pub async fn clean(
    Json(input): Json<CleanRequest>,
) -> AppResult<Json<DataResponse<CleanedSeries>>> {
    let threshold = input.threshold.unwrap_or(DEFAULT_OUTLIER_THRESHOLD);
    let cleaned = clean_series(&input.data, input.strategy, threshold)?;
    Ok(Json(DataResponse { data: cleaned }))
}
