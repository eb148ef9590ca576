//! Middleware for the API layer.
//!
//! This module provides error handling for HTTP responses.

pub mod error_handler;

pub use error_handler::{ApiError, ApiErrorResponse, market_error_to_api_error};
