//! Read-side operations.
//!
//! Queries read through [`MarketStore`](crate::application::ports::MarketStore)
//! without opening a transaction and take no locks.
//!
//! # Available Queries
//!
//! - [`active_tasks()`] / [`archived_tasks()`] - a creator's own tasks
//! - [`claimable_tasks()`] - the discovery feed
//! - [`task_types()`] - the task type lookup table
//! - [`current_user()`] - identity resolution for authenticated requests
//! - [`referred_users()`] / [`wallet_transactions()`] - per-user history
//! - [`market_statistics()`] - the admin snapshot

pub mod statistics;
mod tasks;
mod users;

pub use statistics::{
    LanguageCount, MarketStatistics, StatisticsSnapshot, TaskStatistics, TaskTypeCount,
    UserStatistics, WalletStatistics, market_statistics,
};
pub use tasks::{active_tasks, archived_tasks, claimable_tasks, task_types};
pub use users::{current_user, referred_users, wallet_transactions};
