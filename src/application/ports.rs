//! Storage and generator ports.
//!
//! Workflows never talk to a database directly. They open a
//! [`MarketTransaction`] through [`MarketStore::begin`], perform every read
//! and write of one logical operation on it, and call
//! [`MarketTransaction::commit`] at the end. A transaction dropped without a
//! commit is rolled back, so an early `?` return never leaves a partial
//! change behind.
//!
//! Reads for display (listings, statistics) go through [`MarketStore`]
//! directly, take no locks and may be slightly stale.
//!
//! # Implementations
//!
//! - [`crate::infrastructure::PostgresMarketStore`] - sqlx over PostgreSQL
//! - [`crate::infrastructure::InMemoryMarketStore`] - a single mutex-guarded
//!   state, used by tests and local runs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::application::queries::statistics::StatisticsSnapshot;
use crate::domain::{
    Claim, ExternalId, NewTask, NewUser, NewWalletTransaction, Points, ReferralCode, Referral,
    ReferredUser, Task, TaskId, TaskStatus, TaskType, TaskTypeId, User, UserId, WalletTransaction,
    WalletTransactionId,
};

/// Uniqueness constraint on `(task_id, user_id)` claims.
pub const CLAIM_UNIQUE_CONSTRAINT: &str = "task_claims_task_id_user_id_key";

/// Uniqueness constraint on users' external ids.
pub const USER_EXTERNAL_ID_CONSTRAINT: &str = "users_external_id_key";

/// Uniqueness constraint on users' referral codes.
pub const USER_REFERRAL_CODE_CONSTRAINT: &str = "users_referral_code_key";

/// Uniqueness constraint on the referred side of a referral.
pub const REFERRAL_REFERRED_CONSTRAINT: &str = "referrals_referred_id_key";

/// Errors raised by storage adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected a write.
    #[error("unique constraint violated: {constraint}")]
    UniqueViolation {
        /// Name of the violated constraint.
        constraint: String,
    },

    /// The backend failed.
    #[error("database error: {0}")]
    Database(String),

    /// A stored row could not be mapped onto a domain value.
    #[error("corrupted row: {0}")]
    Corrupted(String),

    /// The transaction was used after commit.
    #[error("transaction already closed")]
    TransactionClosed,

    /// A retry loop gave up.
    #[error("gave up after {attempts} attempts: {operation}")]
    RetriesExhausted {
        /// What was being retried.
        operation: String,
        /// Number of attempts made.
        attempts: u32,
    },
}

impl StoreError {
    /// Returns `true` if this is a violation of `constraint`.
    #[must_use]
    pub fn violates(&self, constraint: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint: violated } if violated == constraint)
    }
}

/// Entry point to the market's persistent state.
#[async_trait]
pub trait MarketStore: Send + Sync {
    /// Opens a unit of work.
    async fn begin(&self) -> Result<Box<dyn MarketTransaction>, StoreError>;

    /// Checks that the backend is reachable.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Loads a user by id.
    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Loads a user by platform identity.
    async fn find_user_by_external_id(
        &self,
        external_id: ExternalId,
    ) -> Result<Option<User>, StoreError>;

    /// Lists tasks of `owner` whose status is one of `statuses`, newest first.
    async fn list_owned_tasks(
        &self,
        owner: UserId,
        statuses: &[TaskStatus],
    ) -> Result<Vec<Task>, StoreError>;

    /// Lists up to `limit` active, non-full tasks that `user` neither owns nor
    /// has claimed, optionally restricted to one type.
    async fn list_claimable_tasks(
        &self,
        user: UserId,
        task_type: Option<TaskTypeId>,
        limit: usize,
    ) -> Result<Vec<Task>, StoreError>;

    /// Lists the task type lookup table.
    async fn list_task_types(&self) -> Result<Vec<TaskType>, StoreError>;

    /// Lists the users referred by `referrer`, oldest first.
    async fn list_referred_users(&self, referrer: UserId) -> Result<Vec<ReferredUser>, StoreError>;

    /// Lists the wallet transactions of `user`, newest first.
    async fn list_wallet_transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<WalletTransaction>, StoreError>;

    /// Aggregates platform counters; `since` bounds the "recent" counters.
    async fn statistics(&self, since: DateTime<Utc>) -> Result<StatisticsSnapshot, StoreError>;
}

/// One atomic unit of work.
///
/// Every method observes the writes made earlier on the same transaction.
/// `lock_*` methods hold the row until commit or rollback.
#[async_trait]
pub trait MarketTransaction: Send {
    /// Loads and locks a user.
    async fn lock_user(&mut self, id: UserId) -> Result<Option<User>, StoreError>;

    /// Loads a user by platform identity.
    async fn find_user_by_external_id(
        &mut self,
        external_id: ExternalId,
    ) -> Result<Option<User>, StoreError>;

    /// Loads the owner of a referral code.
    async fn find_user_by_referral_code(
        &mut self,
        code: &ReferralCode,
    ) -> Result<Option<User>, StoreError>;

    /// Returns `true` if a user already holds `code`.
    async fn referral_code_exists(&mut self, code: &ReferralCode) -> Result<bool, StoreError>;

    /// Inserts a user with a zero balance.
    async fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError>;

    /// Decrements the balance of `user` by `amount` if it covers it.
    ///
    /// Returns the new balance, or `None` if the user is missing or the
    /// balance is too small; nothing is written in that case.
    async fn reserve_points(
        &mut self,
        user: UserId,
        amount: Points,
    ) -> Result<Option<Points>, StoreError>;

    /// Increments the balance of `user` by `amount`.
    ///
    /// Returns the new balance, or `None` if the user is missing.
    async fn credit_points(
        &mut self,
        user: UserId,
        amount: Points,
    ) -> Result<Option<Points>, StoreError>;

    /// Returns `true` if the task type exists.
    async fn task_type_exists(&mut self, id: TaskTypeId) -> Result<bool, StoreError>;

    /// Inserts an active task.
    async fn insert_task(&mut self, task: NewTask) -> Result<Task, StoreError>;

    /// Loads and locks a task.
    async fn lock_task(&mut self, id: TaskId) -> Result<Option<Task>, StoreError>;

    /// Writes back the mutable fields of a task.
    async fn save_task(&mut self, task: &Task) -> Result<(), StoreError>;

    /// Records a claim; a duplicate fails with a violation of
    /// [`CLAIM_UNIQUE_CONSTRAINT`].
    async fn insert_claim(&mut self, claim: &Claim) -> Result<(), StoreError>;

    /// Records a referral; a second referral of the same user fails with a
    /// violation of [`REFERRAL_REFERRED_CONSTRAINT`].
    async fn insert_referral(&mut self, referral: &Referral) -> Result<(), StoreError>;

    /// Inserts a pending wallet transaction.
    async fn insert_wallet_transaction(
        &mut self,
        transaction: NewWalletTransaction,
    ) -> Result<WalletTransaction, StoreError>;

    /// Loads and locks a wallet transaction.
    async fn lock_wallet_transaction(
        &mut self,
        id: WalletTransactionId,
    ) -> Result<Option<WalletTransaction>, StoreError>;

    /// Writes back the status and hash of a wallet transaction.
    async fn save_wallet_transaction(
        &mut self,
        transaction: &WalletTransaction,
    ) -> Result<(), StoreError>;

    /// Makes every write of this transaction durable.
    ///
    /// Any later call fails with [`StoreError::TransactionClosed`].
    async fn commit(&mut self) -> Result<(), StoreError>;
}

/// Source of fresh referral codes.
pub trait ReferralCodeGenerator: Send + Sync {
    /// Produces a candidate code; uniqueness is checked by the caller.
    fn generate(&self) -> ReferralCode;
}
