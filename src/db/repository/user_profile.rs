use std::str::FromStr;

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::*;

/// Insert or overwrite the profile for `profile.user_id`.
pub fn upsert_user_profile(conn: &Connection, profile: &UserProfile) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO user_profiles (user_id, mobile_number, blood_group, gender)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET mobile_number = excluded.mobile_number,
                                            blood_group = excluded.blood_group,
                                            gender = excluded.gender",
        params![
            profile.user_id.0,
            profile.mobile_number,
            profile.blood_group.as_str(),
            profile.gender.map(|g| g.as_str()),
        ],
    )?;
    Ok(())
}

pub fn get_user_profile(
    conn: &Connection,
    user: UserId,
) -> Result<Option<UserProfileView>, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT u.username, p.mobile_number, p.gender, p.blood_group
             FROM user_profiles p JOIN users u ON u.id = p.user_id
             WHERE p.user_id = ?1",
            params![user.0],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                ))
            },
        )
        .optional()?;

    let Some((username, mobile_number, gender, blood_group)) = row else {
        return Ok(None);
    };

    Ok(Some(UserProfileView {
        user: username,
        mobile_number,
        gender: gender.as_deref().map(Gender::from_str).transpose()?,
        blood_group: BloodGroup::from_str(&blood_group)?,
    }))
}
