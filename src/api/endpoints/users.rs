//! `GET /users/` and `GET /users/:id/` — read-only account listing.

use axum::extract::{Path, State};
use axum::Json;

use super::parse_id;
use crate::accounts;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::models::User;

pub async fn list(
    State(ctx): State<ApiContext>,
    _user: AuthUser,
) -> Result<Json<Vec<User>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(accounts::list_users(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(accounts::get_user(&conn, id)?))
}
