//! Donor directory: one public donor profile per user, searchable by
//! blood group, district, donor type and last donation date.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Deserialize;
use thiserror::Error;

use crate::db::{repository, DatabaseError};
use crate::models::enums::BloodGroup;
use crate::models::{DonorFilter, DonorProfileFields, DonorProfileView, UserId};

pub const MAX_DISTRICT_LEN: usize = 100;
pub const MAX_DONOR_TYPE_LEN: usize = 50;

#[derive(Error, Debug)]
pub enum DonorError {
    #[error("Donor profile {0} not found")]
    NotFound(i64),

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("A donor profile already exists for this user.")]
    AlreadyExists,

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// Client-supplied donor fields. On a partial update absent fields keep
/// their stored value; otherwise they are required (or default).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DonorInput {
    pub blood_group: Option<String>,
    pub district: Option<String>,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: Option<String>,
    pub is_available: Option<bool>,
}

pub fn create_donor(
    conn: &Connection,
    user: UserId,
    input: DonorInput,
) -> Result<DonorProfileView, DonorError> {
    let fields = resolve_fields(input, None)?;

    if repository::donor_profile_exists_for_user(conn, user)? {
        return Err(DonorError::AlreadyExists);
    }
    let created = repository::insert_donor_profile(conn, user, &fields).map_err(|err| {
        if err.is_unique_violation() {
            DonorError::AlreadyExists
        } else {
            DonorError::Database(err)
        }
    })?;

    tracing::info!(donor_id = created.id, user_id = %user, "Donor profile created");
    get_donor(conn, created.id)
}

pub fn get_donor(conn: &Connection, id: i64) -> Result<DonorProfileView, DonorError> {
    repository::get_donor_profile(conn, id)?.ok_or(DonorError::NotFound(id))
}

pub fn list_donors(conn: &Connection, filter: &DonorFilter) -> Result<Vec<DonorProfileView>, DonorError> {
    Ok(repository::list_donor_profiles(conn, filter)?)
}

/// Replace every writable field.
pub fn update_donor(
    conn: &Connection,
    id: i64,
    user: UserId,
    input: DonorInput,
) -> Result<DonorProfileView, DonorError> {
    owned_profile(conn, id, user)?;
    let fields = resolve_fields(input, None)?;
    repository::update_donor_profile(conn, id, &fields)?;
    tracing::info!(donor_id = id, user_id = %user, "Donor profile updated");
    get_donor(conn, id)
}

/// Change only the fields present in `input`.
pub fn partial_update_donor(
    conn: &Connection,
    id: i64,
    user: UserId,
    input: DonorInput,
) -> Result<DonorProfileView, DonorError> {
    let current = owned_profile(conn, id, user)?;
    let fields = resolve_fields(input, Some(&current))?;
    repository::update_donor_profile(conn, id, &fields)?;
    tracing::info!(donor_id = id, user_id = %user, "Donor profile updated");
    get_donor(conn, id)
}

pub fn delete_donor(conn: &Connection, id: i64, user: UserId) -> Result<(), DonorError> {
    owned_profile(conn, id, user)?;
    if !repository::delete_donor_profile(conn, id)? {
        return Err(DonorError::NotFound(id));
    }
    tracing::info!(donor_id = id, user_id = %user, "Donor profile deleted");
    Ok(())
}

fn owned_profile(conn: &Connection, id: i64, user: UserId) -> Result<DonorProfileView, DonorError> {
    let profile = get_donor(conn, id)?;
    if !profile.user_id.is_same_user(&user) {
        tracing::debug!(donor_id = id, user_id = %user, "Donor profile owned by another user");
        return Err(DonorError::Forbidden);
    }
    Ok(profile)
}

fn resolve_fields(
    input: DonorInput,
    current: Option<&DonorProfileView>,
) -> Result<DonorProfileFields, DonorError> {
    let blood_group = match input.blood_group {
        Some(raw) => raw.trim().parse::<BloodGroup>().map_err(|_| DonorError::Validation {
            field: "blood_group",
            message: format!("\"{raw}\" is not a valid choice."),
        })?,
        None => current.map(|c| c.blood_group).ok_or_else(|| required("blood_group"))?,
    };

    let district = text_field(
        "district",
        input.district,
        current.map(|c| c.district.as_str()),
        MAX_DISTRICT_LEN,
    )?;
    let donor_type = text_field(
        "donor_type",
        input.donor_type,
        current.map(|c| c.donor_type.as_str()),
        MAX_DONOR_TYPE_LEN,
    )?;

    let date_of_donation = input
        .date_of_donation
        .or_else(|| current.and_then(|c| c.date_of_donation));
    let is_available = input
        .is_available
        .or_else(|| current.map(|c| c.is_available))
        .unwrap_or(true);

    Ok(DonorProfileFields {
        blood_group,
        district,
        date_of_donation,
        donor_type,
        is_available,
    })
}

fn text_field(
    field: &'static str,
    value: Option<String>,
    current: Option<&str>,
    max: usize,
) -> Result<String, DonorError> {
    let Some(value) = value else {
        return current.map(str::to_string).ok_or_else(|| required(field));
    };
    let value = value.trim();
    if value.is_empty() {
        return Err(DonorError::Validation {
            field,
            message: "This field may not be blank.".into(),
        });
    }
    if value.chars().count() > max {
        return Err(DonorError::Validation {
            field,
            message: format!("Ensure this field has no more than {max} characters."),
        });
    }
    Ok(value.to_string())
}

fn required(field: &'static str) -> DonorError {
    DonorError::Validation {
        field,
        message: "This field is required.".into(),
    }
}
