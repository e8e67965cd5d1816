//! HTTP API.
//!
//! Exposes the domain modules as JSON endpoints. The router is
//! composable: `api_router()` returns a `Router` that can be mounted on
//! any axum server instance; `server` owns binding and shutdown.

pub mod endpoints;
pub mod error;
pub mod middleware;
pub mod router;
pub mod server;
pub mod types;

pub use router::{api_router, cors_layer};
pub use server::{serve, start_api_server, ApiServer, ServerError};
pub use types::{ApiContext, AuthUser};
