//! Blood request endpoints.
//!
//! - `GET /blood_requests/`, `GET /blood_requests/:id/`
//! - `POST /blood_requests/` — always stored as pending
//! - `POST /blood_requests/accept/:request_id/` — accept someone else's request

use axum::body::Bytes;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::{blocking_db, parse_id};
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::blood_requests::{self, AcceptOutcome, AcceptRequest};
use crate::models::{BloodRequest, NewBloodRequest};

pub async fn list(
    State(ctx): State<ApiContext>,
    _user: AuthUser,
) -> Result<Json<Vec<BloodRequest>>, ApiError> {
    let conn = ctx.core.open_db()?;
    Ok(Json(ctx.core.requests().list(&conn)?))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BloodRequest>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(blood_requests::get_request(&conn, ctx.core.requests(), id)?))
}

/// Any client-sent `status` is ignored.
#[derive(Deserialize)]
pub struct CreateRequestBody {
    #[serde(default)]
    pub blood_group: String,
    pub request_date: NaiveDate,
    #[serde(default)]
    pub details: Option<String>,
}

pub async fn create(
    State(ctx): State<ApiContext>,
    user: AuthUser,
    body: Result<Json<CreateRequestBody>, JsonRejection>,
) -> Result<(StatusCode, Json<BloodRequest>), ApiError> {
    let Json(body) = body?;
    let conn = ctx.core.open_db()?;
    let created = blood_requests::create_request(
        &conn,
        ctx.core.requests(),
        NewBloodRequest {
            requester: user.user_id,
            blood_group: body.blood_group.trim().to_string(),
            request_date: body.request_date,
            details: body.details,
        },
    )?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Deserialize, Default)]
#[serde(default)]
pub struct AcceptBody {
    pub donation_date: Option<NaiveDate>,
    pub details: Option<String>,
}

/// `POST /blood_requests/accept/:request_id/`
///
/// The body is optional so that a missing request or a self-acceptance
/// is reported before anything about the donation fields.
pub async fn accept(
    State(ctx): State<ApiContext>,
    user: AuthUser,
    Path(request_id): Path<String>,
    body: Bytes,
) -> Result<Json<AcceptOutcome>, ApiError> {
    let request_id = parse_id(&request_id)?;
    let body: AcceptBody = if body.iter().all(u8::is_ascii_whitespace) {
        AcceptBody::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| ApiError::BadRequest(e.to_string()))?
    };

    let outcome = blocking_db(&ctx, move |core, conn| {
        blood_requests::accept_request(
            conn,
            core.requests(),
            core.donations(),
            request_id,
            user.user_id,
            AcceptRequest {
                donation_date: body.donation_date,
                details: body.details,
            },
        )
        .map_err(ApiError::from)
    })
    .await?;
    Ok(Json(outcome))
}
