use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::DatabaseError;
use crate::models::*;

const USER_COLUMNS: &str = "id, username, first_name, last_name, email, is_active, date_joined";

pub fn insert_user(conn: &Connection, user: &NewUser) -> Result<UserId, DatabaseError> {
    conn.execute(
        "INSERT INTO users (username, first_name, last_name, email, password_hash, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, 0)",
        params![
            user.username,
            user.first_name,
            user.last_name,
            user.email,
            user.password_hash,
        ],
    )
    .map_err(|err| DatabaseError::from(err).into_constraint_violation())?;
    Ok(UserId(conn.last_insert_rowid()))
}

pub fn get_user(conn: &Connection, id: UserId) -> Result<Option<User>, DatabaseError> {
    let user = conn
        .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.0],
            user_from_row,
        )
        .optional()?;
    Ok(user)
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))?;
    let rows = stmt.query_map([], user_from_row)?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn username_exists(conn: &Connection, username: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE username = ?1)",
        params![username],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn email_exists(conn: &Connection, email: &str) -> Result<bool, DatabaseError> {
    let exists = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM users WHERE LOWER(email) = LOWER(?1))",
        params![email],
        |row| row.get::<_, bool>(0),
    )?;
    Ok(exists)
}

pub fn get_credentials(
    conn: &Connection,
    username: &str,
) -> Result<Option<UserCredentials>, DatabaseError> {
    let creds = conn
        .query_row(
            "SELECT id, password_hash, is_active FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok(UserCredentials {
                    id: UserId(row.get(0)?),
                    password_hash: row.get(1)?,
                    is_active: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(creds)
}

pub fn activate_user(conn: &Connection, id: UserId) -> Result<(), DatabaseError> {
    let changed = conn.execute("UPDATE users SET is_active = 1 WHERE id = ?1", params![id.0])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "User".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: UserId(row.get(0)?),
        username: row.get(1)?,
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        email: row.get(4)?,
        is_active: row.get(5)?,
        date_joined: row.get(6)?,
    })
}
