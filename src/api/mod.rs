//! API layer for the task-reward marketplace.
//!
//! This module provides HTTP endpoints using Axum 0.8.
//!
//! # Architecture
//!
//! ```text
//! HTTP Request
//!     │
//!     ▼
//! ┌───────────────┐
//! │  Extractors   │ ── Verify init data, resolve the caller
//! └───────────────┘
//!     │
//!     ▼
//! ┌───────────────┐
//! │   Handlers    │ ── Extract request, call workflow or query
//! └───────────────┘
//!     │
//!     ▼
//! ┌───────────────┐
//! │  Transformers │ ── DTO ↔ Domain conversion (pure functions)
//! └───────────────┘
//!     │
//!     ▼
//! HTTP Response
//! ```
//!
//! # Modules
//!
//! - [`dto`]: Data Transfer Objects for requests and responses
//! - [`extractors`]: Authenticated-caller extractors
//! - [`handlers`]: Axum handlers for HTTP endpoints
//! - [`identity`]: Signed init-data verification
//! - [`middleware`]: Error handling
//! - [`routes`]: Route configuration

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod identity;
pub mod middleware;
pub mod routes;

pub use routes::create_router;
