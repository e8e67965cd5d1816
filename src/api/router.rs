//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//!
//! Middleware stack (outermost → innermost):
//! 1. Extension(ApiContext) → 2. Auth resolver → 3. Access logger
//!
//! CORS is applied by the server on top of this router.

use std::sync::Arc;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router.
///
/// Middleware uses `Extension<ApiContext>` (injected as the outermost layer).
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
/// Authentication is resolved for every route; handlers that take an
/// `AuthUser` argument are the protected ones.
pub fn api_router(core: Arc<CoreState>) -> Router {
    let ctx = ApiContext::new(core);

    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    Router::new()
        .route("/health", get(endpoints::health::check))
        // Accounts
        .route("/register/", post(endpoints::accounts::register))
        .route(
            "/users/activate/:uid64/:token/",
            get(endpoints::accounts::activate),
        )
        .route("/users/login/", post(endpoints::accounts::login))
        .route("/users/logout/", get(endpoints::accounts::logout))
        .route("/users/", get(endpoints::users::list))
        .route("/users/:id/", get(endpoints::users::detail))
        .route(
            "/profile/:user_id/",
            get(endpoints::profiles::detail).post(endpoints::profiles::save),
        )
        .route("/dashboard/", get(endpoints::dashboard::overview))
        // Donor directory
        .route(
            "/donors/",
            get(endpoints::donors::list).post(endpoints::donors::create),
        )
        .route(
            "/donors/:id/",
            get(endpoints::donors::detail)
                .put(endpoints::donors::update)
                .patch(endpoints::donors::partial_update)
                .delete(endpoints::donors::delete),
        )
        // Requests and donations
        .route(
            "/blood_requests/",
            get(endpoints::blood_requests::list).post(endpoints::blood_requests::create),
        )
        .route(
            "/blood_requests/:id/",
            get(endpoints::blood_requests::detail),
        )
        .route(
            "/blood_requests/accept/:request_id/",
            post(endpoints::blood_requests::accept),
        )
        .route("/donations/", get(endpoints::donations::list))
        .route("/donations/:id/", get(endpoints::donations::detail))
        .with_state(ctx.clone())
        // Middleware stack (innermost first, outermost last):
        .layer(axum::middleware::from_fn(middleware::audit::log_access))
        .layer(axum::middleware::from_fn(middleware::auth::resolve_user))
        // Extension must be outermost so middleware can extract ApiContext
        .layer(axum::Extension(ctx))
}

/// CORS policy for the configured browser origins.
///
/// Origins that are not valid header values are skipped with a warning.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}
