//! Repository layer — entity-scoped database operations for accounts,
//! tokens and profiles. Blood requests and donations live behind the
//! store traits in `crate::blood_requests`.

mod donor_profile;
mod token;
mod user;
mod user_profile;

pub use donor_profile::*;
pub use token::*;
pub use user::*;
pub use user_profile::*;

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use rusqlite::Connection;

    use super::*;
    use crate::db::sqlite::open_memory_database;
    use crate::models::enums::*;
    use crate::models::*;

    fn test_db() -> Connection {
        open_memory_database().unwrap()
    }

    fn make_user(conn: &Connection, username: &str) -> UserId {
        insert_user(
            conn,
            &NewUser {
                username: username.into(),
                first_name: "Test".into(),
                last_name: "User".into(),
                email: format!("{username}@example.org"),
                password_hash: "pbkdf2_sha256$1$AA==$AA==".into(),
            },
        )
        .unwrap()
    }

    fn donor_fields(group: BloodGroup, district: &str, donor_type: &str) -> DonorProfileFields {
        DonorProfileFields {
            blood_group: group,
            district: district.into(),
            date_of_donation: None,
            donor_type: donor_type.into(),
            is_available: true,
        }
    }

    // ── Users ────────────────────────────────────────────

    #[test]
    fn new_users_start_inactive() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        let user = get_user(&conn, id).unwrap().unwrap();
        assert_eq!(user.username, "rahim");
        assert!(!user.is_active);

        activate_user(&conn, id).unwrap();
        assert!(get_user(&conn, id).unwrap().unwrap().is_active);
    }

    #[test]
    fn activate_unknown_user_is_not_found() {
        let conn = test_db();
        let err = activate_user(&conn, UserId(77)).unwrap_err();
        assert!(matches!(err, crate::db::DatabaseError::NotFound { .. }));
    }

    #[test]
    fn username_is_unique() {
        let conn = test_db();
        make_user(&conn, "rahim");
        let err = insert_user(
            &conn,
            &NewUser {
                username: "rahim".into(),
                first_name: String::new(),
                last_name: String::new(),
                email: "other@example.org".into(),
                password_hash: "h".into(),
            },
        )
        .unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(err.unique_constraint(), Some("users.username"));
        assert!(username_exists(&conn, "rahim").unwrap());
        assert!(!username_exists(&conn, "karim").unwrap());
    }

    #[test]
    fn email_lookup_ignores_case() {
        let conn = test_db();
        make_user(&conn, "rahim");
        assert!(email_exists(&conn, "RAHIM@example.org").unwrap());
        assert!(!email_exists(&conn, "karim@example.org").unwrap());
    }

    #[test]
    fn email_is_unique_ignoring_case() {
        let conn = test_db();
        make_user(&conn, "rahim");
        let err = insert_user(
            &conn,
            &NewUser {
                username: "karim".into(),
                first_name: String::new(),
                last_name: String::new(),
                email: "Rahim@Example.org".into(),
                password_hash: "h".into(),
            },
        )
        .unwrap_err();
        assert!(err.is_unique_violation());
        assert_eq!(err.unique_constraint(), Some("idx_users_email"));
        assert_eq!(list_users(&conn).unwrap().len(), 1);
    }

    #[test]
    fn credentials_lookup_by_username() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        let creds = get_credentials(&conn, "rahim").unwrap().unwrap();
        assert_eq!(creds.id, id);
        assert!(!creds.is_active);
        assert!(get_credentials(&conn, "nobody").unwrap().is_none());
    }

    #[test]
    fn list_users_in_id_order() {
        let conn = test_db();
        make_user(&conn, "b");
        make_user(&conn, "a");
        let names: Vec<_> = list_users(&conn)
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    // ── Tokens ───────────────────────────────────────────

    #[test]
    fn auth_token_resolves_only_for_active_users() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        let hash = [7u8; 32];
        replace_auth_token(&conn, id, &hash).unwrap();
        assert_eq!(user_for_auth_token(&conn, &hash).unwrap(), None);

        activate_user(&conn, id).unwrap();
        assert_eq!(user_for_auth_token(&conn, &hash).unwrap(), Some(id));
    }

    #[test]
    fn replacing_auth_token_invalidates_previous() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        activate_user(&conn, id).unwrap();

        replace_auth_token(&conn, id, &[1u8; 32]).unwrap();
        replace_auth_token(&conn, id, &[2u8; 32]).unwrap();

        assert_eq!(user_for_auth_token(&conn, &[1u8; 32]).unwrap(), None);
        assert_eq!(user_for_auth_token(&conn, &[2u8; 32]).unwrap(), Some(id));

        assert!(delete_auth_token(&conn, id).unwrap());
        assert!(!delete_auth_token(&conn, id).unwrap());
        assert_eq!(user_for_auth_token(&conn, &[2u8; 32]).unwrap(), None);
    }

    #[test]
    fn activation_token_is_single_use() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        insert_activation_token(&conn, id, &[9u8; 32]).unwrap();

        assert!(!take_activation_token(&conn, id, &[8u8; 32]).unwrap());
        assert!(take_activation_token(&conn, id, &[9u8; 32]).unwrap());
        assert!(!take_activation_token(&conn, id, &[9u8; 32]).unwrap());
    }

    // ── User profiles ────────────────────────────────────

    #[test]
    fn user_profile_upsert_overwrites() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        assert!(get_user_profile(&conn, id).unwrap().is_none());

        upsert_user_profile(
            &conn,
            &UserProfile {
                user_id: id,
                mobile_number: "01711000000".into(),
                blood_group: BloodGroup::BPositive,
                gender: None,
            },
        )
        .unwrap();
        upsert_user_profile(
            &conn,
            &UserProfile {
                user_id: id,
                mobile_number: "01911000000".into(),
                blood_group: BloodGroup::BPositive,
                gender: Some(Gender::Male),
            },
        )
        .unwrap();

        let view = get_user_profile(&conn, id).unwrap().unwrap();
        assert_eq!(view.user, "rahim");
        assert_eq!(view.mobile_number, "01911000000");
        assert_eq!(view.gender, Some(Gender::Male));
    }

    // ── Donor profiles ───────────────────────────────────

    #[test]
    fn donor_profile_crud() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        let created =
            insert_donor_profile(&conn, id, &donor_fields(BloodGroup::OPositive, "Dhaka", "regular"))
                .unwrap();
        assert!(donor_profile_exists_for_user(&conn, id).unwrap());

        let mut fields = donor_fields(BloodGroup::OPositive, "Khulna", "emergency");
        fields.date_of_donation = NaiveDate::from_ymd_opt(2024, 2, 14);
        update_donor_profile(&conn, created.id, &fields).unwrap();

        let view = get_donor_profile(&conn, created.id).unwrap().unwrap();
        assert_eq!(view.username, "rahim");
        assert_eq!(view.email, "rahim@example.org");
        assert_eq!(view.district, "Khulna");
        assert_eq!(view.date_of_donation, NaiveDate::from_ymd_opt(2024, 2, 14));
        assert_eq!(view.user_id, id);

        assert!(delete_donor_profile(&conn, created.id).unwrap());
        assert!(get_donor_profile(&conn, created.id).unwrap().is_none());
        assert!(!delete_donor_profile(&conn, created.id).unwrap());
    }

    #[test]
    fn one_donor_profile_per_user() {
        let conn = test_db();
        let id = make_user(&conn, "rahim");
        insert_donor_profile(&conn, id, &donor_fields(BloodGroup::APositive, "Dhaka", "regular"))
            .unwrap();
        let err =
            insert_donor_profile(&conn, id, &donor_fields(BloodGroup::APositive, "Sylhet", "regular"))
                .unwrap_err();
        assert!(err.is_unique_violation());
    }

    #[test]
    fn donor_filters_are_case_insensitive_exact() {
        let conn = test_db();
        let a = make_user(&conn, "a");
        let b = make_user(&conn, "b");
        let c = make_user(&conn, "c");
        insert_donor_profile(&conn, a, &donor_fields(BloodGroup::OPositive, "Dhaka", "regular")).unwrap();
        insert_donor_profile(&conn, b, &donor_fields(BloodGroup::ONegative, "Dhaka North", "regular")).unwrap();
        insert_donor_profile(&conn, c, &donor_fields(BloodGroup::OPositive, "Chittagong", "Emergency")).unwrap();

        let filter = DonorFilter {
            district: Some("dhaka".into()),
            ..Default::default()
        };
        let hits = list_donor_profiles(&conn, &filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "a");

        let filter = DonorFilter {
            blood_group: Some("o+".into()),
            donor_type: Some("emergency".into()),
            ..Default::default()
        };
        let hits = list_donor_profiles(&conn, &filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "c");

        assert_eq!(list_donor_profiles(&conn, &DonorFilter::default()).unwrap().len(), 3);
    }

    #[test]
    fn donor_date_filter_is_exact() {
        let conn = test_db();
        let a = make_user(&conn, "a");
        let b = make_user(&conn, "b");
        let mut fields = donor_fields(BloodGroup::BNegative, "Rajshahi", "regular");
        fields.date_of_donation = NaiveDate::from_ymd_opt(2024, 5, 1);
        insert_donor_profile(&conn, a, &fields).unwrap();
        insert_donor_profile(&conn, b, &donor_fields(BloodGroup::BNegative, "Rajshahi", "regular")).unwrap();

        let filter = DonorFilter {
            date_of_donation: NaiveDate::from_ymd_opt(2024, 5, 1),
            ..Default::default()
        };
        let hits = list_donor_profiles(&conn, &filter).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].username, "a");
    }

    #[test]
    fn donor_search_requires_every_term() {
        let conn = test_db();
        let a = make_user(&conn, "a");
        let b = make_user(&conn, "b");
        insert_donor_profile(&conn, a, &donor_fields(BloodGroup::AbPositive, "Dhaka", "regular")).unwrap();
        insert_donor_profile(&conn, b, &donor_fields(BloodGroup::AbPositive, "Sylhet", "emergency")).unwrap();

        let search = |q: &str| {
            list_donor_profiles(
                &conn,
                &DonorFilter {
                    search: Some(q.into()),
                    ..Default::default()
                },
            )
            .unwrap()
            .into_iter()
            .map(|d| d.username)
            .collect::<Vec<_>>()
        };

        assert_eq!(search("AB+"), vec!["a", "b"]);
        assert_eq!(search("ab+ dhak"), vec!["a"]);
        assert_eq!(search("EMERG"), vec!["b"]);
        assert!(search("dhaka emergency").is_empty());
        // LIKE wildcards in the query are literal.
        assert!(search("%").is_empty());
    }
}
