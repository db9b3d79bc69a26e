use axum::routing::{get, post};
use axum::Router;

use crate::handlers::processing;
use crate::state::AppState;

/// Routes mounted at `/processing`.
///
/// ```text
/// POST /fuse         -> fuse_readings
/// GET  /fuse/latest  -> latest_fusion
/// POST /clean        -> clean
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/fuse", post(processing::fuse_readings))
        .route("/fuse/latest", get(processing::latest_fusion))
        .route("/clean", post(processing::clean))
}
