pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

impl DatabaseError {
    /// True when the underlying SQLite error is a UNIQUE/PK constraint hit.
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, DatabaseError::ConstraintViolation(_))
            || matches!(
                self,
                DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(err, _))
                    if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                        || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
            )
    }

    /// The UNIQUE constraint SQLite reported: `users.username` for a column
    /// constraint, `idx_users_email` for an expression index.
    pub fn unique_constraint(&self) -> Option<&str> {
        match self {
            DatabaseError::ConstraintViolation(name) => Some(name.as_str()),
            DatabaseError::Sqlite(rusqlite::Error::SqliteFailure(_, Some(message)))
                if self.is_unique_violation() =>
            {
                message
                    .strip_prefix("UNIQUE constraint failed: ")
                    .map(|target| target.trim_start_matches("index ").trim_matches('\''))
            }
            _ => None,
        }
    }

    /// Fold a UNIQUE failure into [`DatabaseError::ConstraintViolation`]
    /// naming the constraint; other errors pass through.
    pub fn into_constraint_violation(self) -> Self {
        match self.unique_constraint().map(str::to_string) {
            Some(name) => DatabaseError::ConstraintViolation(name),
            None => self,
        }
    }
}
