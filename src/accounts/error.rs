use thiserror::Error;

use crate::db::DatabaseError;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Invalid {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error("Invalid Credentials")]
    InvalidCredentials,

    #[error("Activation link is invalid")]
    InvalidActivation,

    #[error("{entity} not found.")]
    NotFound { entity: &'static str, id: i64 },

    #[error("You do not have permission to perform this action.")]
    Forbidden,

    #[error("Failed to send confirmation email.")]
    NotificationFailed(String),

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl AccountError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        AccountError::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<rusqlite::Error> for AccountError {
    fn from(err: rusqlite::Error) -> Self {
        AccountError::Database(DatabaseError::Sqlite(err))
    }
}
