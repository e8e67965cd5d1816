//! Store boundaries for the request workflow.
//!
//! Every method takes the connection explicitly so callers can run
//! several store calls inside one transaction (`&Transaction` derefs
//! to `&Connection`).

use rusqlite::Connection;

use crate::db::DatabaseError;
use crate::models::enums::RequestStatus;
use crate::models::{BloodRequest, Donation, NewBloodRequest, NewDonation, UserId};

/// Blood request persistence.
pub trait RequestStore: Send + Sync {
    /// Insert a new request. Status always starts as `pending`.
    fn create(
        &self,
        conn: &Connection,
        request: &NewBloodRequest,
    ) -> Result<BloodRequest, DatabaseError>;

    fn get(&self, conn: &Connection, id: i64) -> Result<Option<BloodRequest>, DatabaseError>;

    fn list(&self, conn: &Connection) -> Result<Vec<BloodRequest>, DatabaseError>;

    /// Requests owned by `requester`.
    fn by_requester(
        &self,
        conn: &Connection,
        requester: UserId,
    ) -> Result<Vec<BloodRequest>, DatabaseError>;

    /// Requests owned by anyone but `requester`.
    fn excluding_requester(
        &self,
        conn: &Connection,
        requester: UserId,
    ) -> Result<Vec<BloodRequest>, DatabaseError>;

    /// The request with this id, only if it is still pending.
    fn find_pending(
        &self,
        conn: &Connection,
        id: i64,
    ) -> Result<Option<BloodRequest>, DatabaseError>;

    /// Conditional update: move `id` from `from` to `to`.
    /// Returns `true` only when exactly one row changed.
    fn transition_status(
        &self,
        conn: &Connection,
        id: i64,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<bool, DatabaseError>;
}

/// Donation persistence. Donations are append-only.
pub trait DonationStore: Send + Sync {
    fn create(&self, conn: &Connection, donation: &NewDonation) -> Result<Donation, DatabaseError>;

    fn get(&self, conn: &Connection, id: i64) -> Result<Option<Donation>, DatabaseError>;

    fn list(&self, conn: &Connection) -> Result<Vec<Donation>, DatabaseError>;

    fn by_donor(&self, conn: &Connection, donor: UserId) -> Result<Vec<Donation>, DatabaseError>;
}
