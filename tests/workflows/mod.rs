//! Workflow integration tests against the in-memory store.

pub mod claim_tests;
pub mod login_tests;
pub mod property_tests;
pub mod scenario_tests;
pub mod wallet_tests;
