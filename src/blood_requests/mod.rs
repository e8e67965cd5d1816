//! Blood requests and donations.
//!
//! Requests are created by their requester and closed by someone else
//! through [`accept_request`]. Donations only ever come out of an accept.

pub mod accept;
pub mod error;
pub mod store;
pub mod traits;

pub use accept::{accept_request, AcceptOutcome, AcceptRequest, ACCEPTED_MESSAGE};
pub use error::BloodRequestError;
pub use store::{SqliteDonationStore, SqliteRequestStore};
pub use traits::{DonationStore, RequestStore};

use rusqlite::Connection;

use crate::models::{BloodRequest, Donation, NewBloodRequest};

/// Upper bound on the free-form blood group code.
pub const MAX_BLOOD_GROUP_LEN: usize = 4;

/// Validate and store a new request. The stored status is always `pending`.
pub fn create_request<R: RequestStore + ?Sized>(
    conn: &Connection,
    store: &R,
    request: NewBloodRequest,
) -> Result<BloodRequest, BloodRequestError> {
    let len = request.blood_group.chars().count();
    if len == 0 {
        return Err(BloodRequestError::Validation {
            field: "blood_group",
            message: "This field may not be blank.".into(),
        });
    }
    if len > MAX_BLOOD_GROUP_LEN {
        return Err(BloodRequestError::Validation {
            field: "blood_group",
            message: format!("Ensure this field has no more than {MAX_BLOOD_GROUP_LEN} characters."),
        });
    }

    let created = store.create(conn, &request)?;
    tracing::info!(
        request_id = created.id,
        requester = %created.requester,
        blood_group = %created.blood_group,
        "Blood request created"
    );
    Ok(created)
}

pub fn get_request<R: RequestStore + ?Sized>(
    conn: &Connection,
    store: &R,
    id: i64,
) -> Result<BloodRequest, BloodRequestError> {
    store
        .get(conn, id)?
        .ok_or(BloodRequestError::NotFound(id))
}

pub fn get_donation<D: DonationStore + ?Sized>(
    conn: &Connection,
    store: &D,
    id: i64,
) -> Result<Donation, BloodRequestError> {
    store
        .get(conn, id)?
        .ok_or(BloodRequestError::DonationNotFound(id))
}
