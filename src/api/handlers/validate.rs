/*
 * Responsibility
 * - GET|HEAD /validate (reverse-proxy sub-request)
 * - 200 + projected claim headers on allow, 401 on deny, 405 on other methods
 * - Status counting and panic handling are applied as route layers (see routes.rs)
 */
use std::time::Instant;

use axum::{
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use tracing::{debug, info};

use crate::error::AppError;
use crate::services::auth::QueryParams;
use crate::state::AppState;

pub async fn validate(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if method != Method::GET && method != Method::HEAD {
        info!(%method, "invalid method");
        return Err(AppError::MethodNotAllowed);
    }

    let query = QueryParams::parse(uri.query());

    let started = Instant::now();
    let outcome = state.auth.authorize(&headers, &query);
    state.metrics.observe_validation(started.elapsed());

    let claims = outcome.map_err(|err| {
        debug!(error = %err, "request denied");
        AppError::Unauthorized(err)
    })?;

    let mut response = StatusCode::OK.into_response();
    state
        .auth
        .project_headers(&claims, &query, response.headers_mut());

    Ok(response)
}
