//! Claim records.
//!
//! A claim proves that a user completed a task. The pair `(task, user)` is
//! unique for all time; the storage layer enforces it with a uniqueness
//! constraint so that two concurrent claims cannot both be recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{TaskId, UserId};

/// A completed click on a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    /// Claimed task.
    pub task: TaskId,
    /// Completing user.
    pub user: UserId,
    /// Claim time.
    pub claimed_at: DateTime<Utc>,
}
