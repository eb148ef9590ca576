//! HTTP handlers for the marketplace API.
//!
//! Handlers follow the same pipeline:
//!
//! ```text
//! Request → Extract identity → Transform DTO → Run workflow → Transform → Response
//! ```
//!
//! Workflow errors convert into [`ApiErrorResponse`] through `?`.
//!
//! [`ApiErrorResponse`]: crate::api::middleware::ApiErrorResponse

pub mod admin;
pub mod auth;
pub mod task;
pub mod users;
pub mod wallet;
