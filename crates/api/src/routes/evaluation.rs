use axum::routing::get;
use axum::Router;

use crate::handlers::evaluation;
use crate::state::AppState;

/// Routes mounted at `/evaluation`.
///
/// ```text
/// GET /{borehole_id}          -> evaluate
/// GET /{borehole_id}/compare  -> compare
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{borehole_id}", get(evaluation::evaluate))
        .route("/{borehole_id}/compare", get(evaluation::compare))
}
