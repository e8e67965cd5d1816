//! SQLite-backed request and donation stores.

use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Params, Row};

use super::traits::{DonationStore, RequestStore};
use crate::db::DatabaseError;
use crate::models::enums::RequestStatus;
use crate::models::{BloodRequest, Donation, NewBloodRequest, NewDonation, UserId};

const REQUEST_COLUMNS: &str = "id, requester_id, blood_group, request_date, status, details";
const DONATION_COLUMNS: &str = "id, donor_id, blood_group, donation_date, details";

/// SQLite blood request store.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteRequestStore;

impl SqliteRequestStore {
    pub fn new() -> Self {
        Self
    }

    fn query(
        &self,
        conn: &Connection,
        filter: &str,
        params: impl Params,
    ) -> Result<Vec<BloodRequest>, DatabaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {REQUEST_COLUMNS} FROM blood_requests {filter} ORDER BY id"
        ))?;

        let rows = stmt.query_map(params, request_row_from_rusqlite)?;

        let mut requests = Vec::new();
        for row in rows {
            requests.push(request_from_row(row?)?);
        }
        Ok(requests)
    }

    fn query_one(
        &self,
        conn: &Connection,
        filter: &str,
        params: impl Params,
    ) -> Result<Option<BloodRequest>, DatabaseError> {
        let row = conn
            .query_row(
                &format!("SELECT {REQUEST_COLUMNS} FROM blood_requests {filter}"),
                params,
                request_row_from_rusqlite,
            )
            .optional()?;
        row.map(request_from_row).transpose()
    }
}

impl RequestStore for SqliteRequestStore {
    fn create(
        &self,
        conn: &Connection,
        request: &NewBloodRequest,
    ) -> Result<BloodRequest, DatabaseError> {
        conn.execute(
            "INSERT INTO blood_requests (requester_id, blood_group, request_date, status, details)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                request.requester.0,
                request.blood_group,
                request.request_date,
                RequestStatus::Pending.as_str(),
                request.details,
            ],
        )?;

        Ok(BloodRequest {
            id: conn.last_insert_rowid(),
            requester: request.requester,
            blood_group: request.blood_group.clone(),
            request_date: request.request_date,
            status: RequestStatus::Pending,
            details: request.details.clone(),
        })
    }

    fn get(&self, conn: &Connection, id: i64) -> Result<Option<BloodRequest>, DatabaseError> {
        self.query_one(conn, "WHERE id = ?1", params![id])
    }

    fn list(&self, conn: &Connection) -> Result<Vec<BloodRequest>, DatabaseError> {
        self.query(conn, "", [])
    }

    fn by_requester(
        &self,
        conn: &Connection,
        requester: UserId,
    ) -> Result<Vec<BloodRequest>, DatabaseError> {
        self.query(conn, "WHERE requester_id = ?1", params![requester.0])
    }

    fn excluding_requester(
        &self,
        conn: &Connection,
        requester: UserId,
    ) -> Result<Vec<BloodRequest>, DatabaseError> {
        self.query(conn, "WHERE requester_id != ?1", params![requester.0])
    }

    fn find_pending(
        &self,
        conn: &Connection,
        id: i64,
    ) -> Result<Option<BloodRequest>, DatabaseError> {
        self.query_one(
            conn,
            "WHERE id = ?1 AND status = ?2",
            params![id, RequestStatus::Pending.as_str()],
        )
    }

    fn transition_status(
        &self,
        conn: &Connection,
        id: i64,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<bool, DatabaseError> {
        let changed = conn.execute(
            "UPDATE blood_requests SET status = ?3 WHERE id = ?1 AND status = ?2",
            params![id, from.as_str(), to.as_str()],
        )?;
        Ok(changed == 1)
    }
}

/// SQLite donation store.
#[derive(Debug, Default, Clone, Copy)]
pub struct SqliteDonationStore;

impl SqliteDonationStore {
    pub fn new() -> Self {
        Self
    }

    fn query(
        &self,
        conn: &Connection,
        filter: &str,
        params: impl Params,
    ) -> Result<Vec<Donation>, DatabaseError> {
        let mut stmt = conn.prepare(&format!(
            "SELECT {DONATION_COLUMNS} FROM donations {filter} ORDER BY id"
        ))?;
        let rows = stmt.query_map(params, donation_from_rusqlite)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl DonationStore for SqliteDonationStore {
    fn create(&self, conn: &Connection, donation: &NewDonation) -> Result<Donation, DatabaseError> {
        conn.execute(
            "INSERT INTO donations (donor_id, blood_group, donation_date, details)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                donation.donor.0,
                donation.blood_group,
                donation.donation_date,
                donation.details,
            ],
        )?;

        Ok(Donation {
            id: conn.last_insert_rowid(),
            donor: donation.donor,
            blood_group: donation.blood_group.clone(),
            donation_date: donation.donation_date,
            details: donation.details.clone(),
        })
    }

    fn get(&self, conn: &Connection, id: i64) -> Result<Option<Donation>, DatabaseError> {
        let donation = conn
            .query_row(
                &format!("SELECT {DONATION_COLUMNS} FROM donations WHERE id = ?1"),
                params![id],
                donation_from_rusqlite,
            )
            .optional()?;
        Ok(donation)
    }

    fn list(&self, conn: &Connection) -> Result<Vec<Donation>, DatabaseError> {
        self.query(conn, "", [])
    }

    fn by_donor(&self, conn: &Connection, donor: UserId) -> Result<Vec<Donation>, DatabaseError> {
        self.query(conn, "WHERE donor_id = ?1", params![donor.0])
    }
}

// ═══════════════════════════════════════════
// Row mapping
// ═══════════════════════════════════════════

struct RequestRow {
    id: i64,
    requester_id: i64,
    blood_group: String,
    request_date: NaiveDate,
    status: String,
    details: Option<String>,
}

fn request_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<RequestRow> {
    Ok(RequestRow {
        id: row.get(0)?,
        requester_id: row.get(1)?,
        blood_group: row.get(2)?,
        request_date: row.get(3)?,
        status: row.get(4)?,
        details: row.get(5)?,
    })
}

fn request_from_row(row: RequestRow) -> Result<BloodRequest, DatabaseError> {
    Ok(BloodRequest {
        id: row.id,
        requester: UserId(row.requester_id),
        blood_group: row.blood_group,
        request_date: row.request_date,
        status: RequestStatus::from_str(&row.status)?,
        details: row.details,
    })
}

fn donation_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<Donation> {
    Ok(Donation {
        id: row.get(0)?,
        donor: UserId(row.get(1)?),
        blood_group: row.get(2)?,
        donation_date: row.get(3)?,
        details: row.get(4)?,
    })
}
