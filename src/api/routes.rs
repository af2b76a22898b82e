/*
 * Responsibility
 * - URL structure: /validate, /healthz, /metrics
 * - /validate accepts every method (405 is decided in the handler so it is counted)
 *   and carries the status-counting + panic layers
 */
use axum::{
    Router, middleware,
    routing::{any, get},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::api::handlers::{health::healthz, metrics::metrics, validate::validate};
use crate::middleware::status::{panic_response, record_status};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router {
    let validate_route = any(validate)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), record_status));

    Router::new()
        .route("/validate", validate_route)
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics))
        .with_state(state)
}
