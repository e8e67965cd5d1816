//! Donor directory endpoints.
//!
//! - `GET /donors/` — public list with filters and `search`
//! - `POST /donors/` — create the caller's donor profile
//! - `GET /donors/:id/` — public detail
//! - `PUT|PATCH|DELETE /donors/:id/` — owner only

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;

use super::parse_id;
use crate::api::error::ApiError;
use crate::api::types::{ApiContext, AuthUser};
use crate::donors::{self, DonorInput};
use crate::models::{DonorFilter, DonorProfileView};

#[derive(Deserialize, Default)]
pub struct DonorQuery {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub date_of_donation: Option<String>,
    pub donor_type: Option<String>,
    pub search: Option<String>,
}

impl DonorQuery {
    /// Empty parameters are ignored, as if absent.
    fn into_filter(self) -> Result<DonorFilter, ApiError> {
        let non_empty = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());

        let date_of_donation = match non_empty(self.date_of_donation) {
            Some(raw) => Some(NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                ApiError::Validation {
                    field: "date_of_donation",
                    message: "Enter a valid date.".into(),
                }
            })?),
            None => None,
        };

        Ok(DonorFilter {
            blood_group: non_empty(self.blood_group),
            district: non_empty(self.district),
            date_of_donation,
            donor_type: non_empty(self.donor_type),
            search: non_empty(self.search),
        })
    }
}

pub async fn list(
    State(ctx): State<ApiContext>,
    query: Result<Query<DonorQuery>, QueryRejection>,
) -> Result<Json<Vec<DonorProfileView>>, ApiError> {
    let Query(query) = query?;
    let filter = query.into_filter()?;
    let conn = ctx.core.open_db()?;
    Ok(Json(donors::list_donors(&conn, &filter)?))
}

pub async fn create(
    State(ctx): State<ApiContext>,
    user: AuthUser,
    body: Result<Json<DonorInput>, JsonRejection>,
) -> Result<(StatusCode, Json<DonorProfileView>), ApiError> {
    let Json(input) = body?;
    let conn = ctx.core.open_db()?;
    let created = donors::create_donor(&conn, user.user_id, input)?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<DonorProfileView>, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    Ok(Json(donors::get_donor(&conn, id)?))
}

/// `PUT /donors/:id/`
pub async fn update(
    State(ctx): State<ApiContext>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<DonorInput>, JsonRejection>,
) -> Result<Json<DonorProfileView>, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let conn = ctx.core.open_db()?;
    Ok(Json(donors::update_donor(&conn, id, user.user_id, input)?))
}

/// `PATCH /donors/:id/`
pub async fn partial_update(
    State(ctx): State<ApiContext>,
    user: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<DonorInput>, JsonRejection>,
) -> Result<Json<DonorProfileView>, ApiError> {
    let id = parse_id(&id)?;
    let Json(input) = body?;
    let conn = ctx.core.open_db()?;
    Ok(Json(donors::partial_update_donor(&conn, id, user.user_id, input)?))
}

pub async fn delete(
    State(ctx): State<ApiContext>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_id(&id)?;
    let conn = ctx.core.open_db()?;
    donors::delete_donor(&conn, id, user.user_id)?;
    Ok(StatusCode::NO_CONTENT)
}
