//! Router-level tests driven through `TestApp`.

mod admin_tests;
mod auth_tests;
mod task_tests;
mod user_tests;
mod wallet_tests;
