//! Per-user overview: own requests, own donations, and everyone
//! else's requests.

use rusqlite::Connection;
use serde::Serialize;

use crate::blood_requests::{BloodRequestError, DonationStore, RequestStore};
use crate::models::{BloodRequest, Donation, UserId};

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub my_requests: Vec<BloodRequest>,
    pub my_donations: Vec<Donation>,
    /// Every request not made by the user, whatever its status.
    pub pending_requests: Vec<BloodRequest>,
}

pub fn load_dashboard<R, D>(
    conn: &Connection,
    requests: &R,
    donations: &D,
    user: UserId,
) -> Result<Dashboard, BloodRequestError>
where
    R: RequestStore + ?Sized,
    D: DonationStore + ?Sized,
{
    Ok(Dashboard {
        my_requests: requests.by_requester(conn, user)?,
        my_donations: donations.by_donor(conn, user)?,
        pending_requests: requests.excluding_requester(conn, user)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::blood_requests::{accept_request, AcceptRequest, SqliteDonationStore, SqliteRequestStore};
    use crate::db::repository::insert_user;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::RequestStatus;
    use crate::models::{NewBloodRequest, NewUser};

    fn user(conn: &Connection, name: &str) -> UserId {
        insert_user(
            conn,
            &NewUser {
                username: name.into(),
                first_name: String::new(),
                last_name: String::new(),
                email: format!("{name}@example.org"),
                password_hash: "x".into(),
            },
        )
        .unwrap()
    }

    fn request(conn: &Connection, store: &SqliteRequestStore, requester: UserId, group: &str) -> i64 {
        store
            .create(
                conn,
                &NewBloodRequest {
                    requester,
                    blood_group: group.into(),
                    request_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                    details: None,
                },
            )
            .unwrap()
            .id
    }

    #[test]
    fn splits_requests_by_owner_and_keeps_fulfilled_ones() {
        let conn = open_memory_database().unwrap();
        let requests = SqliteRequestStore::new();
        let donations = SqliteDonationStore::new();
        let alice = user(&conn, "alice");
        let bob = user(&conn, "bob");

        let alice_req = request(&conn, &requests, alice, "O+");
        let bob_req = request(&conn, &requests, bob, "A-");
        accept_request(
            &conn,
            &requests,
            &donations,
            alice_req,
            bob,
            AcceptRequest {
                donation_date: NaiveDate::from_ymd_opt(2024, 3, 2),
                details: None,
            },
        )
        .unwrap();

        let board = load_dashboard(&conn, &requests, &donations, bob).unwrap();
        assert_eq!(board.my_requests.len(), 1);
        assert_eq!(board.my_requests[0].id, bob_req);
        assert_eq!(board.my_donations.len(), 1);
        assert_eq!(board.my_donations[0].blood_group, "O+");
        assert_eq!(board.pending_requests.len(), 1);
        assert_eq!(board.pending_requests[0].id, alice_req);
        assert_eq!(board.pending_requests[0].status, RequestStatus::Fulfilled);

        let board = load_dashboard(&conn, &requests, &donations, alice).unwrap();
        assert!(board.my_donations.is_empty());
        assert_eq!(board.pending_requests[0].id, bob_req);
    }
}
