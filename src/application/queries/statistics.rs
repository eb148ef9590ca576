//! Platform statistics for administrators.
//!
//! A read-only snapshot assembled from unlocked counters. It is what the
//! reporting side consumes; nothing here participates in a transaction.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::application::errors::MarketError;
use crate::application::ports::MarketStore;
use crate::domain::TaskType;

/// Window covered by the "recent" counters.
pub const RECENT_WINDOW_HOURS: i64 = 24;

/// User counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStatistics {
    /// Registered users.
    pub total: i64,
    /// Users registered within the recent window.
    pub joined_recently: i64,
    /// Users with a premium subscription.
    pub premium: i64,
    /// Users who registered with a referral code.
    pub referred: i64,
    /// Users per reported language, most common first.
    pub by_language: Vec<LanguageCount>,
}

/// Number of users reporting one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageCount {
    /// Language tag, `None` if unreported.
    pub language_code: Option<String>,
    /// Number of users.
    pub users: i64,
}

/// Task counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskStatistics {
    /// Tasks ever created.
    pub total: i64,
    /// Tasks currently active.
    pub active: i64,
    /// Archived tasks.
    pub archived: i64,
    /// Finished tasks.
    pub finished: i64,
    /// Paid clicks across all tasks.
    pub completed_clicks: i64,
    /// Tasks per type, in type order.
    pub by_type: Vec<TaskTypeCount>,
}

/// Number of tasks of one type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskTypeCount {
    /// The type.
    pub task_type: TaskType,
    /// Number of tasks.
    pub tasks: i64,
}

/// Wallet counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletStatistics {
    /// Recorded transactions.
    pub total: i64,
    /// Transactions recorded within the recent window.
    pub created_recently: i64,
    /// Transactions awaiting settlement.
    pub pending: i64,
    /// Completed deposits.
    pub completed: i64,
    /// Completed deposits recorded within the recent window.
    pub completed_recently: i64,
}

/// Counters as returned by a store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticsSnapshot {
    /// User counters.
    pub users: UserStatistics,
    /// Task counters.
    pub tasks: TaskStatistics,
    /// Wallet counters.
    pub wallet: WalletStatistics,
}

/// A timestamped statistics report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketStatistics {
    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
    /// Start of the recent window.
    pub recent_since: DateTime<Utc>,
    /// The counters.
    #[serde(flatten)]
    pub snapshot: StatisticsSnapshot,
}

/// Takes a statistics snapshot as of `now`.
///
/// # Errors
///
/// Returns `Storage` on backend failure.
pub async fn market_statistics(
    store: &dyn MarketStore,
    now: DateTime<Utc>,
) -> Result<MarketStatistics, MarketError> {
    let recent_since = now - Duration::hours(RECENT_WINDOW_HOURS);
    let snapshot = store.statistics(recent_since).await?;

    Ok(MarketStatistics {
        generated_at: now,
        recent_since,
        snapshot,
    })
}
