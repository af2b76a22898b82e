//! Per-route layers for `/validate`.
//!
//! - `record_status`: counts every terminal status in `http_requests_total`
//!   and writes the per-request debug line.
//! - `panic_response`: turns a handler panic into an empty 500 (used with
//!   `CatchPanicLayer`, applied inside `record_status` so the 500 is counted).

use std::any::Any;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::state::AppState;

pub async fn record_status(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let uri = req.uri().clone();
    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let response = next.run(req).await;
    state.metrics.record_status(response.status());

    tracing::debug!(
        %uri,
        status = response.status().as_u16(),
        %method,
        user_agent = %user_agent,
        "handled validation request"
    );
    response
}

pub fn panic_response(_panic: Box<dyn Any + Send + 'static>) -> Response {
    // The panic itself is logged by the process panic hook.
    AppError::Internal.into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::any,
    };
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    use super::*;
    use crate::config::Config;
    use crate::services::auth::build_auth_service;
    use crate::services::metrics::Metrics;
    use crate::test_support::config_yaml;

    async fn boom() -> StatusCode {
        panic!("handler fault")
    }

    #[tokio::test]
    async fn handler_panic_becomes_counted_500() {
        let config = Config::from_yaml(&config_yaml("claimsSource: queryString\n")).unwrap();
        let state = AppState::new(
            build_auth_service(&config).unwrap(),
            Arc::new(Metrics::new().unwrap()),
        );

        let app = Router::new()
            .route(
                "/boom",
                any(boom)
                    .layer(CatchPanicLayer::custom(panic_response))
                    .layer(middleware::from_fn_with_state(state.clone(), record_status)),
            )
            .with_state(state.clone());

        let req = Request::builder().uri("/boom").body(Body::empty()).unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            state
                .metrics
                .render()
                .contains("http_requests_total{status=\"500\"} 1")
        );
    }
}
