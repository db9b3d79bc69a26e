use axum::routing::{get, post};
use axum::Router;

use crate::handlers::alarms;
use crate::state::AppState;

/// Routes mounted at `/alarms`.
///
/// ```text
/// POST /check    -> check
/// GET  /history  -> history
/// GET  /config   -> get_config
/// PUT  /config   -> update_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/check", post(alarms::check))
        .route("/history", get(alarms::history))
        .route("/config", get(alarms::get_config).put(alarms::update_config))
}
