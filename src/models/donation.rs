use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: i64,
    pub donor: UserId,
    pub blood_group: String,
    pub donation_date: NaiveDate,
    pub details: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewDonation {
    pub donor: UserId,
    pub blood_group: String,
    pub donation_date: NaiveDate,
    pub details: Option<String>,
}
