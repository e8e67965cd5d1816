//! Account endpoints.
//!
//! - `POST /register/` — create an inactive account, send activation link
//! - `GET /users/activate/:uid64/:token/` — activate, redirect to login
//! - `POST /users/login/` — exchange credentials for a token
//! - `GET /users/logout/` — revoke the caller's token

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Redirect;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::blocking_db;
use crate::accounts::{self, LoginOutcome, Registration};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};

pub const LOGIN_PATH: &str = "/users/login/";
pub const REGISTER_PATH: &str = "/register/";

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// `POST /register/`
pub async fn register(
    State(ctx): State<ApiContext>,
    body: Result<Json<Registration>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let Json(input) = body?;
    blocking_db(&ctx, move |core, conn| {
        accounts::register(
            conn,
            input,
            core.password_iterations,
            &core.public_url,
            core.notifier(),
        )
        .map_err(ApiError::from)
    })
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Check your email for confirmation.",
        }),
    ))
}

/// `GET /users/activate/:uid64/:token/` — always redirects.
pub async fn activate(
    State(ctx): State<ApiContext>,
    Path((uid64, token)): Path<(String, String)>,
) -> Redirect {
    let result = ctx
        .core
        .open_db()
        .map_err(ApiError::from)
        .and_then(|conn| accounts::activate(&conn, &uid64, &token).map_err(ApiError::from));

    match result {
        Ok(_) => Redirect::to(LOGIN_PATH),
        Err(ApiError::Internal(detail)) => {
            tracing::error!(detail, "Activation failed");
            Redirect::to(REGISTER_PATH)
        }
        Err(_) => Redirect::to(REGISTER_PATH),
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct LoginBody {
    pub username: String,
    pub password: String,
}

/// `POST /users/login/`
pub async fn login(
    State(ctx): State<ApiContext>,
    body: Result<Json<LoginBody>, JsonRejection>,
) -> Result<Json<LoginOutcome>, ApiError> {
    let Json(credentials) = body?;
    let outcome = blocking_db(&ctx, move |_, conn| {
        accounts::login(conn, &credentials.username, &credentials.password).map_err(ApiError::from)
    })
    .await?;
    Ok(Json(outcome))
}

/// `GET /users/logout/`
pub async fn logout(
    State(ctx): State<ApiContext>,
    user: AuthUser,
) -> Result<Redirect, ApiError> {
    let conn = ctx.core.open_db()?;
    accounts::logout(&conn, user.user_id)?;
    Ok(Redirect::to(LOGIN_PATH))
}
