//! Access logging middleware.
//!
//! Logs every request with method, path, status, user id and latency,
//! and tags the response with an `x-request-id`. Runs innermost (after
//! auth has injected `AuthUser`).

use std::time::Instant;

use axum::http::{HeaderValue, Request};
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use uuid::Uuid;

use crate::api::types::AuthUser;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

pub async fn log_access(req: Request<axum::body::Body>, next: Next) -> Response {
    let method = req.method().to_string();
    let path = req.uri().path().to_string();
    let user_id = req.extensions().get::<AuthUser>().map(|u| u.user_id.0);
    let request_id = Uuid::new_v4();
    let started = Instant::now();

    let span = tracing::info_span!("request", %request_id);
    let mut response = next.run(req).instrument(span).await;

    let status = response.status().as_u16();
    let latency_ms = started.elapsed().as_millis() as u64;
    tracing::info!(%request_id, method, path, status, user_id, latency_ms, "API access");

    if let Ok(val) = HeaderValue::from_str(&request_id.to_string()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    response
}
