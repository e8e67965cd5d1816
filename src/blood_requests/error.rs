use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum BloodRequestError {
    /// Absent, or no longer pending.
    #[error("Blood request {0} not found")]
    NotFound(i64),

    #[error("Donation {0} not found")]
    DonationNotFound(i64),

    #[error("You cannot accept your own request.")]
    SelfAcceptance,

    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl From<rusqlite::Error> for BloodRequestError {
    fn from(err: rusqlite::Error) -> Self {
        BloodRequestError::Database(DatabaseError::Sqlite(err))
    }
}
