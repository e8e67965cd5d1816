use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DatabaseError;
use crate::models::UserId;

/// Store the bearer token digest for `user`, replacing any earlier one.
pub fn replace_auth_token(
    conn: &Connection,
    user: UserId,
    token_hash: &[u8; 32],
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO auth_tokens (user_id, token_hash) VALUES (?1, ?2)
         ON CONFLICT(user_id) DO UPDATE SET token_hash = excluded.token_hash,
                                            created_at = datetime('now')",
        params![user.0, token_hash.as_slice()],
    )?;
    Ok(())
}

/// Resolve a bearer token digest to its (active) owner.
pub fn user_for_auth_token(
    conn: &Connection,
    token_hash: &[u8; 32],
) -> Result<Option<UserId>, DatabaseError> {
    let user = conn
        .query_row(
            "SELECT t.user_id FROM auth_tokens t
             JOIN users u ON u.id = t.user_id
             WHERE t.token_hash = ?1 AND u.is_active = 1",
            params![token_hash.as_slice()],
            |row| row.get::<_, i64>(0),
        )
        .optional()?;
    Ok(user.map(UserId))
}

/// Returns whether a token existed.
pub fn delete_auth_token(conn: &Connection, user: UserId) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM auth_tokens WHERE user_id = ?1", params![user.0])?;
    Ok(deleted > 0)
}

pub fn insert_activation_token(
    conn: &Connection,
    user: UserId,
    token_hash: &[u8; 32],
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT OR REPLACE INTO activation_tokens (user_id, token_hash) VALUES (?1, ?2)",
        params![user.0, token_hash.as_slice()],
    )?;
    Ok(())
}

/// Consume the activation token for `user` if it matches. One-shot.
pub fn take_activation_token(
    conn: &Connection,
    user: UserId,
    token_hash: &[u8; 32],
) -> Result<bool, DatabaseError> {
    let deleted = conn.execute(
        "DELETE FROM activation_tokens WHERE user_id = ?1 AND token_hash = ?2",
        params![user.0, token_hash.as_slice()],
    )?;
    Ok(deleted == 1)
}
