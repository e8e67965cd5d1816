//! `GET /dashboard/` — the caller's requests and donations, plus
//! everyone else's requests.

use axum::extract::State;
use axum::Json;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::dashboard::{self, Dashboard};

pub async fn overview(
    State(ctx): State<ApiContext>,
    user: AuthUser,
) -> Result<Json<Dashboard>, ApiError> {
    let conn = ctx.core.open_db()?;
    let board = dashboard::load_dashboard(
        &conn,
        ctx.core.requests(),
        ctx.core.donations(),
        user.user_id,
    )?;
    Ok(Json(board))
}
