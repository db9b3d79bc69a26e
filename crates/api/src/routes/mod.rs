pub mod alarms;
pub mod evaluation;
pub mod health;
pub mod processing;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                   WebSocket push channel
///
/// /processing/fuse                      fusion score (POST)
/// /processing/clean                     gap fill + outlier removal (POST)
///
/// /evaluation/{borehole_id}             effectiveness indices (GET)
/// /evaluation/{borehole_id}/compare     pre/post window statistics (GET)
///
/// /alarms/check                         classify one reading (POST)
/// /alarms/history                       recent alarms (GET)
/// /alarms/config                        thresholds (GET, PUT)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/processing", processing::router())
        .nest("/evaluation", evaluation::router())
        .nest("/alarms", alarms::router())
}
