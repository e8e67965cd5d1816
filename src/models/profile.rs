use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::{BloodGroup, Gender};
use super::user::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub mobile_number: String,
    pub blood_group: BloodGroup,
    pub gender: Option<Gender>,
}

/// User profile as shown to clients: `user` is the owner's username.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfileView {
    pub user: String,
    pub mobile_number: String,
    pub gender: Option<Gender>,
    pub blood_group: BloodGroup,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DonorProfile {
    pub id: i64,
    pub user_id: UserId,
    pub blood_group: BloodGroup,
    pub district: String,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: String,
    pub is_available: bool,
}

/// Donor profile joined with its owner's username and email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonorProfileView {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub blood_group: BloodGroup,
    pub district: String,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: String,
    pub is_available: bool,
    #[serde(skip)]
    pub user_id: UserId,
}

/// Writable donor profile fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DonorProfileFields {
    pub blood_group: BloodGroup,
    pub district: String,
    pub date_of_donation: Option<NaiveDate>,
    pub donor_type: String,
    pub is_available: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn donor_view_hides_owner_id() {
        let view = DonorProfileView {
            id: 4,
            username: "rahim".into(),
            email: "rahim@example.org".into(),
            blood_group: BloodGroup::OPositive,
            district: "Dhaka".into(),
            date_of_donation: NaiveDate::from_ymd_opt(2024, 3, 1),
            donor_type: "regular".into(),
            is_available: true,
            user_id: UserId(9),
        };
        let json = serde_json::to_value(&view).unwrap();
        assert!(json.get("user_id").is_none());
        assert_eq!(json["username"], "rahim");
        assert_eq!(json["blood_group"], "O+");
        assert_eq!(json["date_of_donation"], "2024-03-01");
    }
}
