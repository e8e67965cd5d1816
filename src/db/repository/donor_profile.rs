use std::str::FromStr;

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::enums::*;
use crate::models::*;

const VIEW_SELECT: &str = "SELECT d.id, d.user_id, u.username, u.email, d.blood_group, d.district,
        d.date_of_donation, d.donor_type, d.is_available
     FROM donor_profiles d JOIN users u ON u.id = d.user_id";

pub fn insert_donor_profile(
    conn: &Connection,
    user: UserId,
    fields: &DonorProfileFields,
) -> Result<DonorProfile, DatabaseError> {
    conn.execute(
        "INSERT INTO donor_profiles (user_id, blood_group, district, date_of_donation,
         donor_type, is_available)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.0,
            fields.blood_group.as_str(),
            fields.district,
            fields.date_of_donation,
            fields.donor_type,
            fields.is_available,
        ],
    )?;

    Ok(DonorProfile {
        id: conn.last_insert_rowid(),
        user_id: user,
        blood_group: fields.blood_group,
        district: fields.district.clone(),
        date_of_donation: fields.date_of_donation,
        donor_type: fields.donor_type.clone(),
        is_available: fields.is_available,
    })
}

pub fn get_donor_profile(
    conn: &Connection,
    id: i64,
) -> Result<Option<DonorProfileView>, DatabaseError> {
    let row = conn
        .query_row(
            &format!("{VIEW_SELECT} WHERE d.id = ?1"),
            params![id],
            donor_row_from_rusqlite,
        )
        .optional()?;
    row.map(donor_view_from_row).transpose()
}

pub fn donor_profile_exists_for_user(conn: &Connection, user: UserId) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM donor_profiles WHERE user_id = ?1)",
        params![user.0],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn update_donor_profile(
    conn: &Connection,
    id: i64,
    fields: &DonorProfileFields,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE donor_profiles SET blood_group = ?2, district = ?3, date_of_donation = ?4,
         donor_type = ?5, is_available = ?6
         WHERE id = ?1",
        params![
            id,
            fields.blood_group.as_str(),
            fields.district,
            fields.date_of_donation,
            fields.donor_type,
            fields.is_available,
        ],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "DonorProfile".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

pub fn delete_donor_profile(conn: &Connection, id: i64) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM donor_profiles WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn list_donor_profiles(
    conn: &Connection,
    filter: &DonorFilter,
) -> Result<Vec<DonorProfileView>, DatabaseError> {
    let mut sql = format!("{VIEW_SELECT} WHERE 1=1");

    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = Vec::new();
    let mut param_idx = 1;

    for (column, value) in [
        ("d.blood_group", &filter.blood_group),
        ("d.district", &filter.district),
        ("d.donor_type", &filter.donor_type),
    ] {
        if let Some(value) = value {
            sql.push_str(&format!(" AND {column} = ?{param_idx} COLLATE NOCASE"));
            params_vec.push(Box::new(value.clone()));
            param_idx += 1;
        }
    }

    if let Some(date) = filter.date_of_donation {
        sql.push_str(&format!(" AND d.date_of_donation = ?{param_idx}"));
        params_vec.push(Box::new(date));
        param_idx += 1;
    }

    if let Some(search) = &filter.search {
        for term in search.split_whitespace() {
            let pattern = format!("%{}%", escape_like(term));
            sql.push_str(&format!(
                " AND (d.blood_group LIKE ?{p} ESCAPE '\\'
                   OR d.district LIKE ?{p} ESCAPE '\\'
                   OR COALESCE(d.date_of_donation, '') LIKE ?{p} ESCAPE '\\'
                   OR d.donor_type LIKE ?{p} ESCAPE '\\')",
                p = param_idx
            ));
            params_vec.push(Box::new(pattern));
            param_idx += 1;
        }
    }

    sql.push_str(" ORDER BY d.id");

    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_refs.as_slice(), donor_row_from_rusqlite)?;

    let mut donors = Vec::new();
    for row in rows {
        donors.push(donor_view_from_row(row?)?);
    }
    Ok(donors)
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

struct DonorRow {
    id: i64,
    user_id: i64,
    username: String,
    email: String,
    blood_group: String,
    district: String,
    date_of_donation: Option<NaiveDate>,
    donor_type: String,
    is_available: bool,
}

fn donor_row_from_rusqlite(row: &Row<'_>) -> rusqlite::Result<DonorRow> {
    Ok(DonorRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        username: row.get(2)?,
        email: row.get(3)?,
        blood_group: row.get(4)?,
        district: row.get(5)?,
        date_of_donation: row.get(6)?,
        donor_type: row.get(7)?,
        is_available: row.get(8)?,
    })
}

fn donor_view_from_row(row: DonorRow) -> Result<DonorProfileView, DatabaseError> {
    Ok(DonorProfileView {
        id: row.id,
        username: row.username,
        email: row.email,
        blood_group: BloodGroup::from_str(&row.blood_group)?,
        district: row.district,
        date_of_donation: row.date_of_donation,
        donor_type: row.donor_type,
        is_available: row.is_available,
        user_id: UserId(row.user_id),
    })
}
