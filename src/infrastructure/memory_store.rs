//! In-memory market store.
//!
//! The whole state sits behind one `tokio::sync::Mutex`. A transaction takes
//! the owned guard for its entire lifetime and works on a staged copy; commit
//! swaps the copy in, drop discards it. Transactions are therefore fully
//! serialised, which trivially gives the isolation the PostgreSQL store gets
//! from row locks.
//!
//! The same uniqueness constraints as the SQL schema are enforced and
//! reported under the same constraint names, so workflows behave identically
//! on both backends.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::application::ports::{
    CLAIM_UNIQUE_CONSTRAINT, MarketStore, MarketTransaction, REFERRAL_REFERRED_CONSTRAINT,
    StoreError, USER_EXTERNAL_ID_CONSTRAINT, USER_REFERRAL_CODE_CONSTRAINT,
};
use crate::application::queries::{
    LanguageCount, StatisticsSnapshot, TaskStatistics, TaskTypeCount, UserStatistics,
    WalletStatistics,
};
use crate::domain::{
    Claim, ExternalId, NewTask, NewUser, NewWalletTransaction, Points, ReferralCode, Referral,
    ReferredUser, Task, TaskId, TaskStatus, TaskType, TaskTypeId, User, UserId,
    WalletTransaction, WalletTransactionId, WalletTransactionStatus,
};

/// Task types seeded into a fresh store, mirroring the SQL migration.
pub const DEFAULT_TASK_TYPES: [(i32, &str); 2] = [(1, "bot-subscribe"), (2, "channel-subscribe")];

#[derive(Debug, Clone, Default)]
struct MarketState {
    users: BTreeMap<UserId, User>,
    task_types: BTreeMap<TaskTypeId, TaskType>,
    tasks: BTreeMap<TaskId, Task>,
    claims: BTreeMap<(TaskId, UserId), Claim>,
    referrals: BTreeMap<UserId, Referral>,
    wallet_transactions: BTreeMap<WalletTransactionId, WalletTransaction>,
    last_user_id: i64,
    last_task_id: i64,
    last_wallet_transaction_id: i64,
}

impl MarketState {
    fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.get_mut(&id)
    }
}

/// Market store kept in process memory.
#[derive(Debug, Clone)]
pub struct InMemoryMarketStore {
    state: Arc<Mutex<MarketState>>,
}

impl Default for InMemoryMarketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryMarketStore {
    /// Creates an empty store seeded with [`DEFAULT_TASK_TYPES`].
    #[must_use]
    pub fn new() -> Self {
        let task_types = DEFAULT_TASK_TYPES
            .iter()
            .map(|(id, name)| {
                let id = TaskTypeId::new(*id);
                (
                    id,
                    TaskType {
                        id,
                        name: (*name).to_string(),
                    },
                )
            })
            .collect();

        Self {
            state: Arc::new(Mutex::new(MarketState {
                task_types,
                ..MarketState::default()
            })),
        }
    }
}

#[async_trait]
impl MarketStore for InMemoryMarketStore {
    async fn begin(&self) -> Result<Box<dyn MarketTransaction>, StoreError> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = (*guard).clone();
        Ok(Box::new(InMemoryTransaction {
            guard: Some(guard),
            staged,
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_external_id(
        &self,
        external_id: ExternalId,
    ) -> Result<Option<User>, StoreError> {
        let state = self.state.lock().await;
        Ok(find_by_external_id(&state, external_id))
    }

    async fn list_owned_tasks(
        &self,
        owner: UserId,
        statuses: &[TaskStatus],
    ) -> Result<Vec<Task>, StoreError> {
        let state = self.state.lock().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| task.owner == owner && statuses.contains(&task.status))
            .cloned()
            .collect();
        tasks.sort_by_key(|task| Reverse((task.created_at, task.id)));
        Ok(tasks)
    }

    async fn list_claimable_tasks(
        &self,
        user: UserId,
        task_type: Option<TaskTypeId>,
        limit: usize,
    ) -> Result<Vec<Task>, StoreError> {
        let state = self.state.lock().await;
        Ok(state
            .tasks
            .values()
            .filter(|task| {
                task.status == TaskStatus::Active
                    && task.remaining_clicks() > 0
                    && task.owner != user
                    && task_type.is_none_or(|wanted| task.task_type == wanted)
                    && !state.claims.contains_key(&(task.id, user))
            })
            .take(limit)
            .cloned()
            .collect())
    }

    async fn list_task_types(&self) -> Result<Vec<TaskType>, StoreError> {
        Ok(self.state.lock().await.task_types.values().cloned().collect())
    }

    async fn list_referred_users(&self, referrer: UserId) -> Result<Vec<ReferredUser>, StoreError> {
        let state = self.state.lock().await;
        let mut referred: Vec<ReferredUser> = state
            .referrals
            .values()
            .filter(|referral| referral.referrer == referrer)
            .filter_map(|referral| {
                state.users.get(&referral.referred).map(|user| ReferredUser {
                    external_id: user.external_id,
                    username: user.profile.username.clone(),
                    first_name: user.profile.first_name.clone(),
                    referred_at: referral.referred_at,
                })
            })
            .collect();
        referred.sort_by_key(|user| (user.referred_at, user.external_id));
        Ok(referred)
    }

    async fn list_wallet_transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<WalletTransaction>, StoreError> {
        let state = self.state.lock().await;
        let mut transactions: Vec<WalletTransaction> = state
            .wallet_transactions
            .values()
            .filter(|transaction| transaction.user == user)
            .cloned()
            .collect();
        transactions.sort_by_key(|transaction| Reverse((transaction.created_at, transaction.id)));
        Ok(transactions)
    }

    async fn statistics(&self, since: DateTime<Utc>) -> Result<StatisticsSnapshot, StoreError> {
        let state = self.state.lock().await;
        Ok(StatisticsSnapshot {
            users: user_statistics(&state, since),
            tasks: task_statistics(&state),
            wallet: wallet_statistics(&state, since),
        })
    }
}

fn count<T>(items: impl Iterator<Item = T>) -> i64 {
    i64::try_from(items.count()).unwrap_or(i64::MAX)
}

fn find_by_external_id(state: &MarketState, external_id: ExternalId) -> Option<User> {
    state
        .users
        .values()
        .find(|user| user.external_id == external_id)
        .cloned()
}

fn user_statistics(state: &MarketState, since: DateTime<Utc>) -> UserStatistics {
    let users = || state.users.values();

    let mut languages: HashMap<Option<String>, i64> = HashMap::new();
    for user in users() {
        *languages
            .entry(user.profile.language_code.clone())
            .or_default() += 1;
    }
    let mut by_language: Vec<LanguageCount> = languages
        .into_iter()
        .map(|(language_code, users)| LanguageCount {
            language_code,
            users,
        })
        .collect();
    by_language.sort_by(|left, right| {
        right
            .users
            .cmp(&left.users)
            .then_with(|| left.language_code.is_none().cmp(&right.language_code.is_none()))
            .then_with(|| left.language_code.cmp(&right.language_code))
    });

    UserStatistics {
        total: count(users()),
        joined_recently: count(users().filter(|user| user.created_at >= since)),
        premium: count(users().filter(|user| user.profile.is_premium)),
        referred: count(users().filter(|user| user.referred_by.is_some())),
        by_language,
    }
}

fn task_statistics(state: &MarketState) -> TaskStatistics {
    let tasks = || state.tasks.values();
    let with_status = |status: TaskStatus| count(tasks().filter(|task| task.status == status));

    TaskStatistics {
        total: count(tasks()),
        active: with_status(TaskStatus::Active),
        archived: with_status(TaskStatus::Archived),
        finished: with_status(TaskStatus::Finished),
        completed_clicks: tasks().map(|task| i64::from(task.completed_clicks)).sum(),
        by_type: state
            .task_types
            .values()
            .map(|task_type| TaskTypeCount {
                task_type: task_type.clone(),
                tasks: count(tasks().filter(|task| task.task_type == task_type.id)),
            })
            .collect(),
    }
}

fn wallet_statistics(state: &MarketState, since: DateTime<Utc>) -> WalletStatistics {
    let transactions = || state.wallet_transactions.values();
    let completed = || {
        transactions().filter(|transaction| transaction.status == WalletTransactionStatus::Completed)
    };

    WalletStatistics {
        total: count(transactions()),
        created_recently: count(transactions().filter(|transaction| transaction.created_at >= since)),
        pending: count(
            transactions()
                .filter(|transaction| transaction.status == WalletTransactionStatus::Pending),
        ),
        completed: count(completed()),
        completed_recently: count(completed().filter(|transaction| transaction.created_at >= since)),
    }
}

/// A serialised unit of work over [`InMemoryMarketStore`].
struct InMemoryTransaction {
    guard: Option<OwnedMutexGuard<MarketState>>,
    staged: MarketState,
}

impl InMemoryTransaction {
    fn state(&mut self) -> Result<&mut MarketState, StoreError> {
        if self.guard.is_some() {
            Ok(&mut self.staged)
        } else {
            Err(StoreError::TransactionClosed)
        }
    }
}

fn unique_violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

#[async_trait]
impl MarketTransaction for InMemoryTransaction {
    async fn lock_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        Ok(self.state()?.users.get(&id).cloned())
    }

    async fn find_user_by_external_id(
        &mut self,
        external_id: ExternalId,
    ) -> Result<Option<User>, StoreError> {
        Ok(find_by_external_id(self.state()?, external_id))
    }

    async fn find_user_by_referral_code(
        &mut self,
        code: &ReferralCode,
    ) -> Result<Option<User>, StoreError> {
        Ok(self
            .state()?
            .users
            .values()
            .find(|user| &user.referral_code == code)
            .cloned())
    }

    async fn referral_code_exists(&mut self, code: &ReferralCode) -> Result<bool, StoreError> {
        Ok(self
            .state()?
            .users
            .values()
            .any(|user| &user.referral_code == code))
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        let state = self.state()?;
        if state
            .users
            .values()
            .any(|existing| existing.external_id == user.external_id)
        {
            return Err(unique_violation(USER_EXTERNAL_ID_CONSTRAINT));
        }
        if state
            .users
            .values()
            .any(|existing| existing.referral_code == user.referral_code)
        {
            return Err(unique_violation(USER_REFERRAL_CODE_CONSTRAINT));
        }

        state.last_user_id += 1;
        let created = User {
            id: UserId::new(state.last_user_id),
            external_id: user.external_id,
            profile: user.profile,
            points: Points::ZERO,
            referral_code: user.referral_code,
            referred_by: user.referred_by,
            created_at: user.created_at,
        };
        state.users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn reserve_points(
        &mut self,
        user: UserId,
        amount: Points,
    ) -> Result<Option<Points>, StoreError> {
        let Some(holder) = self.state()?.user_mut(user) else {
            return Ok(None);
        };
        Ok(holder.points.checked_sub(amount).map(|balance| {
            holder.points = balance;
            balance
        }))
    }

    async fn credit_points(
        &mut self,
        user: UserId,
        amount: Points,
    ) -> Result<Option<Points>, StoreError> {
        let Some(holder) = self.state()?.user_mut(user) else {
            return Ok(None);
        };
        let balance = holder
            .points
            .checked_add(amount)
            .ok_or_else(|| StoreError::Database(format!("balance of user {user} overflows")))?;
        holder.points = balance;
        Ok(Some(balance))
    }

    async fn task_type_exists(&mut self, id: TaskTypeId) -> Result<bool, StoreError> {
        Ok(self.state()?.task_types.contains_key(&id))
    }

    async fn insert_task(&mut self, task: NewTask) -> Result<Task, StoreError> {
        let state = self.state()?;
        if !state.users.contains_key(&task.owner) {
            return Err(StoreError::Database(format!(
                "task owner {} does not exist",
                task.owner
            )));
        }

        state.last_task_id += 1;
        let created = Task {
            id: TaskId::new(state.last_task_id),
            owner: task.owner,
            task_type: task.task_type,
            name: task.name,
            description: task.description,
            link: task.link,
            total_clicks: task.total_clicks,
            completed_clicks: 0,
            reward_per_click: task.reward_per_click,
            reserved_points: task.reserved_points,
            status: TaskStatus::Active,
            created_at: task.created_at,
            updated_at: task.created_at,
        };
        state.tasks.insert(created.id, created.clone());
        Ok(created)
    }

    async fn lock_task(&mut self, id: TaskId) -> Result<Option<Task>, StoreError> {
        Ok(self.state()?.tasks.get(&id).cloned())
    }

    async fn save_task(&mut self, task: &Task) -> Result<(), StoreError> {
        let stored = self
            .state()?
            .tasks
            .get_mut(&task.id)
            .ok_or_else(|| StoreError::Database(format!("task {} does not exist", task.id)))?;
        stored.completed_clicks = task.completed_clicks;
        stored.status = task.status;
        stored.updated_at = task.updated_at;
        Ok(())
    }

    async fn insert_claim(&mut self, claim: &Claim) -> Result<(), StoreError> {
        let state = self.state()?;
        let key = (claim.task, claim.user);
        if state.claims.contains_key(&key) {
            return Err(unique_violation(CLAIM_UNIQUE_CONSTRAINT));
        }
        state.claims.insert(key, claim.clone());
        Ok(())
    }

    async fn insert_referral(&mut self, referral: &Referral) -> Result<(), StoreError> {
        let state = self.state()?;
        if state.referrals.contains_key(&referral.referred) {
            return Err(unique_violation(REFERRAL_REFERRED_CONSTRAINT));
        }
        state.referrals.insert(referral.referred, referral.clone());
        Ok(())
    }

    async fn insert_wallet_transaction(
        &mut self,
        transaction: NewWalletTransaction,
    ) -> Result<WalletTransaction, StoreError> {
        let state = self.state()?;
        state.last_wallet_transaction_id += 1;
        let created = WalletTransaction {
            id: WalletTransactionId::new(state.last_wallet_transaction_id),
            user: transaction.user,
            wallet_address: transaction.wallet_address,
            transaction_hash: None,
            amount: transaction.amount,
            status: WalletTransactionStatus::Pending,
            created_at: transaction.created_at,
        };
        state.wallet_transactions.insert(created.id, created.clone());
        Ok(created)
    }

    async fn lock_wallet_transaction(
        &mut self,
        id: WalletTransactionId,
    ) -> Result<Option<WalletTransaction>, StoreError> {
        Ok(self.state()?.wallet_transactions.get(&id).cloned())
    }

    async fn save_wallet_transaction(
        &mut self,
        transaction: &WalletTransaction,
    ) -> Result<(), StoreError> {
        let stored = self
            .state()?
            .wallet_transactions
            .get_mut(&transaction.id)
            .ok_or_else(|| {
                StoreError::Database(format!("wallet transaction {} does not exist", transaction.id))
            })?;
        stored.status = transaction.status;
        stored.transaction_hash.clone_from(&transaction.transaction_hash);
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        let mut guard = self.guard.take().ok_or(StoreError::TransactionClosed)?;
        *guard = std::mem::take(&mut self.staged);
        Ok(())
    }
}
