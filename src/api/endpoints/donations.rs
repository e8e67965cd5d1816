//! `GET /donations/` and `GET /donations/:id/`. Donations are only
//! created by accepting a request.

use axum::extract::{Path, State};
use axum::Json;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::blood_requests;
use crate::models::Donation;

pub async fn list(
    State(ctx): State<ApiContext>,
    _user: AuthUser,
) -> Result<Json<Vec<Donation>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ctx.core.donations().list(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Donation>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(blood_requests::get_donation(&conn, ctx.core.donations(), id)?))
}
