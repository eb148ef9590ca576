//! Common test utilities for marketplace integration tests.

pub mod client;

pub use assertions::*;
pub use client::*;
pub use fixtures::*;
