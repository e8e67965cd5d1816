use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::RequestStatus;
use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub id: i64,
    pub requester: UserId,
    pub blood_group: String,
    pub request_date: NaiveDate,
    pub status: RequestStatus,
    pub details: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewBloodRequest {
    pub requester: UserId,
    pub blood_group: String,
    pub request_date: NaiveDate,
    pub details: Option<String>,
}
