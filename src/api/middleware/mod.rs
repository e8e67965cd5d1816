//! API middleware stack.
//!
//! Execution order (outermost → innermost):
//! 1. Auth resolver — maps `Authorization: Token <key>` to a user
//! 2. Access logger — logs after auth, has the user id

pub mod audit;
pub mod auth;
