//! User profile endpoints.
//!
//! - `GET /profile/:user_id/` — public
//! - `POST /profile/:user_id/` — create or replace, owner only

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use super::parse_id;
use crate::accounts::{self, ProfileInput};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::models::UserProfileView;

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(user_id): Path<String>,
) -> Result<Json<UserProfileView>, ApiError> {
    let user_id = parse_id(&user_id)
        .map_err(|_| ApiError::NotFound("UserProfile not found.".into()))?;
    let conn = ctx.core.open_db()?;
    Ok(Json(accounts::get_profile(&conn, user_id)?))
}

pub async fn save(
    State(ctx): State<ApiContext>,
    user: AuthUser,
    Path(user_id): Path<String>,
    body: Result<Json<ProfileInput>, JsonRejection>,
) -> Result<(StatusCode, Json<UserProfileView>), ApiError> {
    let target = parse_id(&user_id)?;
    let Json(input) = body?;
    let conn = ctx.core.open_db()?;
    let saved = accounts::save_profile(&conn, user.user_id, target, input)?;
    Ok((StatusCode::CREATED, Json(saved)))
}
