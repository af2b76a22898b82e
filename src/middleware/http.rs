//! Server-wide HTTP layers.
//!
//! Applied around every route (`/validate`, `/healthz`, `/metrics`). Nothing
//! here may answer on its own: every `/validate` status has to come from the
//! handler (or its panic layer) so that `record_status` sees it.
//! - Request-Id generation + propagation (`x-request-id`)
//! - Access logging (TraceLayer)
//!
//! No body limit (the handler never reads the body, and a POST must still get
//! 405) and no request timeout (deadlines belong to the proxy's sub-request).

use axum::Router;
use axum::http::header::HeaderName;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub fn apply(router: Router) -> Router {
    let request_id_header = HeaderName::from_static(REQUEST_ID_HEADER);

    let layers = ServiceBuilder::new()
        .layer(SetRequestIdLayer::new(
            request_id_header.clone(),
            MakeRequestUuid,
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(TraceLayer::new_for_http());

    router.layer(layers)
}
