//! Token authentication middleware.
//!
//! Extracts `Authorization: Token <key>`, resolves it to an active user
//! and injects [`AuthUser`] into request extensions. Requests without a
//! usable token pass through unauthenticated; handlers that take an
//! `AuthUser` argument reject them with 401.

use axum::http::header::AUTHORIZATION;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::accounts;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};

const TOKEN_PREFIX: &str = "Token ";

/// Resolve the caller from the token header, if any.
///
/// Accesses `ApiContext` from request extensions (injected by Extension layer).
pub async fn resolve_user(req: Request<axum::body::Body>, next: Next) -> Response {
    match resolve_user_inner(req, next).await {
        Ok(resp) => resp,
        Err(err) => err.into_response(),
    }
}

async fn resolve_user_inner(
    mut req: Request<axum::body::Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(TOKEN_PREFIX))
        .map(|v| v.trim().to_string());

    if let Some(token) = token.filter(|t| !t.is_empty()) {
        let ctx: ApiContext = req
            .extensions()
            .get::<ApiContext>()
            .cloned()
            .ok_or_else(|| ApiError::Internal("missing API context".into()))?;

        // Connection dropped here, before the handler opens its own.
        let user = {
            let conn = ctx.core.open_db()?;
            accounts::authenticate(&conn, &token)?
        };

        match user {
            Some(user_id) => {
                req.extensions_mut().insert(AuthUser { user_id });
            }
            None => tracing::debug!("Unknown or inactive token presented"),
        }
    }

    Ok(next.run(req).await)
}
