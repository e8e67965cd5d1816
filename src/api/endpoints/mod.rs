//! API endpoint handlers.
//!
//! Each module corresponds to one resource. Handlers open a connection
//! per request and delegate to the domain modules.

pub mod accounts;
pub mod blood_requests;
pub mod dashboard;
pub mod donations;
pub mod donors;
pub mod health;
pub mod profiles;
pub mod users;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Parse a numeric path id. Anything else cannot name a resource.
pub(crate) fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::NotFound("Not found.".into()))
}

/// Run `work` on the blocking pool with its own connection.
///
/// For handlers that hash passwords or take SQLite write locks, which can
/// wait out the busy timeout.
pub(crate) async fn blocking_db<T, F>(ctx: &ApiContext, work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&CoreState, &Connection) -> Result<T, ApiError> + Send + 'static,
{
    let core = ctx.core.clone();
    tokio::task::spawn_blocking(move || {
        let conn = core.open_db()?;
        work(core.as_ref(), &conn)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Blocking task failed: {e}")))?
}
