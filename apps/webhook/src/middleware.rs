use axum::{
    body::{Body, to_bytes},
    extract::State,
    http::{HeaderValue, Request, StatusCode, header::HeaderName},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{Instrument, Level, debug, info, info_span};
use uuid::Uuid;

use crate::http::{ApiError, AppState, BODY_LIMIT};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Tags every request with a fresh UUID, exposed as `x-request-id` and on
/// the request span.
pub async fn with_request_id(req: Request<Body>, next: Next) -> Response {
    let rid = Uuid::new_v4().to_string();

    let span = info_span!(
        "request",
        request_id = %rid,
        method = %req.method(),
        path = %req.uri().path()
    );
    let mut res = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&rid) {
        res.headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    res
}

/// Logs method and path; headers and body at debug level, except on the
/// webhook path unless `DEBUG_WEBHOOKS` is on.
pub async fn log_requests(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    info!(method = %req.method(), path = %req.uri().path(), "request received");

    let verbose = req.uri().path() != "/webhook" || state.config.debug_webhooks;
    if !verbose || !tracing::enabled!(Level::DEBUG) {
        return next.run(req).await;
    }

    debug!(headers = ?req.headers(), "request headers");
    let (parts, body) = req.into_parts();
    match to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => {
            debug!(body = %String::from_utf8_lossy(&bytes), "request body");
            next.run(Request::from_parts(parts, Body::from(bytes))).await
        }
        Err(err) => {
            debug!(error = %err, "request body unreadable");
            ApiError::new(StatusCode::PAYLOAD_TOO_LARGE, err.to_string()).into_response()
        }
    }
}
