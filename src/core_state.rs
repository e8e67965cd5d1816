//! Shared application state for the HTTP layer.
//!
//! `CoreState` is built once at startup and wrapped in `Arc`. It holds no
//! open connection: every request opens its own SQLite handle through
//! [`CoreState::open_db`], so concurrent handlers contend on the
//! database file (WAL + busy timeout) rather than on an in-process lock.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rusqlite::Connection;

use crate::accounts::{ActivationNotifier, LogActivationNotifier};
use crate::blood_requests::{DonationStore, RequestStore, SqliteDonationStore, SqliteRequestStore};
use crate::config::ServerConfig;
use crate::db;

pub struct CoreState {
    db_path: PathBuf,
    /// PBKDF2 iterations for newly hashed passwords.
    pub password_iterations: u32,
    /// Base URL prefixed to activation links.
    pub public_url: String,
    notifier: Arc<dyn ActivationNotifier>,
    requests: Box<dyn RequestStore>,
    donations: Box<dyn DonationStore>,
}

impl CoreState {
    pub fn new(db_path: PathBuf, password_iterations: u32, public_url: String) -> Self {
        Self {
            db_path,
            password_iterations,
            public_url,
            notifier: Arc::new(LogActivationNotifier),
            requests: Box::new(SqliteRequestStore::new()),
            donations: Box::new(SqliteDonationStore::new()),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.database.clone(),
            config.password_iterations,
            config.public_url.clone(),
        )
    }

    /// Replace the activation notifier (the default only logs links).
    pub fn with_notifier(mut self, notifier: Arc<dyn ActivationNotifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Create the data directory and bring the schema up to date.
    pub fn initialize(&self) -> Result<(), CoreError> {
        if let Some(parent) = self.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = db::open_database(&self.db_path)?;
        let tables = db::count_tables(&conn)?;
        tracing::info!(path = %self.db_path.display(), tables, "Database ready");
        Ok(())
    }

    /// Open a database connection for one request.
    pub fn open_db(&self) -> Result<Connection, CoreError> {
        db::open_database(&self.db_path).map_err(CoreError::Database)
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn notifier(&self) -> &dyn ActivationNotifier {
        self.notifier.as_ref()
    }

    pub fn requests(&self) -> &dyn RequestStore {
        self.requests.as_ref()
    }

    pub fn donations(&self) -> &dyn DonationStore {
        self.donations.as_ref()
    }
}

/// Errors from CoreState operations.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Database error: {0}")]
    Database(#[from] db::DatabaseError),
    #[error("Data directory error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_creates_directory_and_schema() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("app.db");
        let core = CoreState::new(path.clone(), 1_000, "http://localhost".into());

        core.initialize().unwrap();
        assert!(path.exists());

        let conn = core.open_db().unwrap();
        assert_eq!(db::count_tables(&conn).unwrap(), 8);
    }

    #[test]
    fn each_open_is_a_separate_connection() {
        let tmp = tempfile::tempdir().unwrap();
        let core = CoreState::new(tmp.path().join("app.db"), 1_000, "http://localhost".into());
        core.initialize().unwrap();

        let a = core.open_db().unwrap();
        a.execute(
            "INSERT INTO users (username, email, password_hash) VALUES ('x', 'x@y.z', 'h')",
            [],
        )
        .unwrap();

        let b = core.open_db().unwrap();
        let count: i64 = b.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0)).unwrap();
        assert_eq!(count, 1);
    }
}
