//! Accepting a blood request.
//!
//! The only state transition in the system: `pending → fulfilled`,
//! paired with the donation it produces. Both writes share one
//! `BEGIN IMMEDIATE` transaction and the status change is a conditional
//! update, so concurrent accepts of the same request serialize and only
//! one of them can ever see a row change.

use chrono::NaiveDate;
use rusqlite::{Connection, Transaction, TransactionBehavior};
use serde::Serialize;

use super::error::BloodRequestError;
use super::traits::{DonationStore, RequestStore};
use crate::models::enums::RequestStatus;
use crate::models::{Donation, NewDonation, UserId};

/// Confirmation returned to the acceptor.
pub const ACCEPTED_MESSAGE: &str = "Request accepted and donation recorded";

/// Caller-supplied donation details.
#[derive(Debug, Clone, Default)]
pub struct AcceptRequest {
    pub donation_date: Option<NaiveDate>,
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AcceptOutcome {
    pub request_id: i64,
    pub donation: Donation,
    pub message: &'static str,
}

/// Accept `request_id` on behalf of `acting_user`.
///
/// Guards run in a fixed order: the request must exist and be pending
/// (`NotFound`), must belong to someone else (`SelfAcceptance`), and the
/// donation date must be present (`Validation`). Nothing is written
/// unless all three pass.
pub fn accept_request<R, D>(
    conn: &Connection,
    requests: &R,
    donations: &D,
    request_id: i64,
    acting_user: UserId,
    input: AcceptRequest,
) -> Result<AcceptOutcome, BloodRequestError>
where
    R: RequestStore + ?Sized,
    D: DonationStore + ?Sized,
{
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;

    let request = requests
        .find_pending(&tx, request_id)?
        .ok_or(BloodRequestError::NotFound(request_id))?;

    if request.requester.is_same_user(&acting_user) {
        tracing::debug!(request_id, user = %acting_user, "Rejected self-acceptance");
        return Err(BloodRequestError::SelfAcceptance);
    }

    let donation_date = input
        .donation_date
        .ok_or_else(|| BloodRequestError::Validation {
            field: "donation_date",
            message: "This field is required.".into(),
        })?;

    if !requests.transition_status(
        &tx,
        request_id,
        RequestStatus::Pending,
        RequestStatus::Fulfilled,
    )? {
        return Err(BloodRequestError::NotFound(request_id));
    }

    let donation = donations.create(
        &tx,
        &NewDonation {
            donor: acting_user,
            blood_group: request.blood_group,
            donation_date,
            details: input.details,
        },
    )?;

    tx.commit()?;

    tracing::info!(
        request_id,
        donor = %acting_user,
        donation_id = donation.id,
        "Blood request accepted"
    );

    Ok(AcceptOutcome {
        request_id,
        donation,
        message: ACCEPTED_MESSAGE,
    })
}
