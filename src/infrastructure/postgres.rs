//! PostgreSQL market store.
//!
//! Each [`MarketTransaction`] wraps one `sqlx` transaction. Atomicity comes
//! from the database:
//!
//! - reservations are a conditional `UPDATE ... WHERE points >= $2`, so the
//!   balance check and the decrement cannot be separated
//! - task and wallet-transaction reads inside a workflow use
//!   `SELECT ... FOR UPDATE`
//! - duplicate claims and referrals are rejected by unique constraints and
//!   surface as [`StoreError::UniqueViolation`]
//!
//! Dropping a [`PostgresTransaction`] without committing rolls it back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{FromRow, PgConnection, Postgres, Transaction};

use crate::application::ports::{MarketStore, MarketTransaction, StoreError};
use crate::application::queries::{
    LanguageCount, StatisticsSnapshot, TaskStatistics, TaskTypeCount, UserStatistics,
    WalletStatistics,
};
use crate::domain::{
    Claim, ExternalId, NewTask, NewUser, NewWalletTransaction, Points, ReferralCode, Referral,
    ReferredUser, Task, TaskId, TaskStatus, TaskType, TaskTypeId, User, UserId, UserProfile,
    WalletTransaction, WalletTransactionId,
};

const USER_COLUMNS: &str = "id, external_id, username, first_name, last_name, language_code, \
     is_premium, points, referral_code, referred_by, created_at";

const TASK_COLUMNS: &str = "id, owner_id, task_type_id, name, description, link, total_clicks, \
     completed_clicks, reward_per_click, reserved_points, status, created_at, updated_at";

const WALLET_COLUMNS: &str =
    "id, user_id, wallet_address, transaction_hash, amount, status, created_at";

/// Maps a `sqlx` error, keeping unique violations distinguishable.
fn map_error(error: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(database) = &error
        && database.is_unique_violation()
    {
        return StoreError::UniqueViolation {
            constraint: database.constraint().unwrap_or_default().to_string(),
        };
    }
    StoreError::Database(error.to_string())
}

fn corrupted(what: impl std::fmt::Display) -> StoreError {
    StoreError::Corrupted(what.to_string())
}

fn to_i32(value: u32, column: &str) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| corrupted(format!("{column} {value} exceeds INTEGER")))
}

fn to_u32(value: i32, column: &str) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| corrupted(format!("{column} {value} is negative")))
}

fn to_points(value: i64, column: &str) -> Result<Points, StoreError> {
    Points::new(value).map_err(|error| corrupted(format!("{column}: {error}")))
}

fn to_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

// =============================================================================
// Row mapping
// =============================================================================

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    external_id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    language_code: Option<String>,
    is_premium: bool,
    points: i64,
    referral_code: String,
    referred_by: Option<i64>,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: UserId::new(row.id),
            external_id: ExternalId::new(row.external_id),
            profile: UserProfile {
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                language_code: row.language_code,
                is_premium: row.is_premium,
            },
            points: to_points(row.points, "users.points")?,
            referral_code: ReferralCode::parse(&row.referral_code)
                .map_err(|error| corrupted(format!("users.referral_code: {error}")))?,
            referred_by: row.referred_by.map(UserId::new),
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    owner_id: i64,
    task_type_id: i32,
    name: String,
    description: Option<String>,
    link: String,
    total_clicks: i32,
    completed_clicks: i32,
    reward_per_click: i64,
    reserved_points: i64,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TaskRow> for Task {
    type Error = StoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: TaskId::new(row.id),
            owner: UserId::new(row.owner_id),
            task_type: TaskTypeId::new(row.task_type_id),
            name: row.name,
            description: row.description,
            link: row.link,
            total_clicks: to_u32(row.total_clicks, "tasks.total_clicks")?,
            completed_clicks: to_u32(row.completed_clicks, "tasks.completed_clicks")?,
            reward_per_click: to_points(row.reward_per_click, "tasks.reward_per_click")?,
            reserved_points: to_points(row.reserved_points, "tasks.reserved_points")?,
            status: row.status.parse().map_err(corrupted)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct WalletTransactionRow {
    id: i64,
    user_id: i64,
    wallet_address: String,
    transaction_hash: Option<String>,
    amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<WalletTransactionRow> for WalletTransaction {
    type Error = StoreError;

    fn try_from(row: WalletTransactionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: WalletTransactionId::new(row.id),
            user: UserId::new(row.user_id),
            wallet_address: row.wallet_address,
            transaction_hash: row.transaction_hash,
            amount: row.amount,
            status: row.status.parse().map_err(corrupted)?,
            created_at: row.created_at,
        })
    }
}

fn convert_all<R, T>(rows: Vec<R>) -> Result<Vec<T>, StoreError>
where
    T: TryFrom<R, Error = StoreError>,
{
    rows.into_iter().map(T::try_from).collect()
}

// =============================================================================
// Store
// =============================================================================

/// Market store backed by a PostgreSQL pool.
#[derive(Debug, Clone)]
pub struct PostgresMarketStore {
    pool: PgPool,
}

impl PostgresMarketStore {
    /// Creates a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects a new pool.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if the database is unreachable.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(map_error)?;
        Ok(Self::new(pool))
    }

    /// Applies pending schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|error| StoreError::Database(error.to_string()))
    }

    /// Returns a reference to the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn user_statistics(&self, since: DateTime<Utc>) -> Result<UserStatistics, StoreError> {
        let (total, joined_recently, premium, referred): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE created_at >= $1), \
                    COUNT(*) FILTER (WHERE is_premium), \
                    COUNT(*) FILTER (WHERE referred_by IS NOT NULL) \
             FROM users",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_error)?;

        let languages: Vec<(Option<String>, i64)> = sqlx::query_as(
            "SELECT language_code, COUNT(*) FROM users \
             GROUP BY language_code \
             ORDER BY COUNT(*) DESC, language_code ASC NULLS LAST",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(UserStatistics {
            total,
            joined_recently,
            premium,
            referred,
            by_language: languages
                .into_iter()
                .map(|(language_code, users)| LanguageCount {
                    language_code,
                    users,
                })
                .collect(),
        })
    }

    async fn task_statistics(&self) -> Result<TaskStatistics, StoreError> {
        let (total, active, archived, finished, completed_clicks): (i64, i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT COUNT(*), \
                        COUNT(*) FILTER (WHERE status = 'active'), \
                        COUNT(*) FILTER (WHERE status = 'archived'), \
                        COUNT(*) FILTER (WHERE status = 'finished'), \
                        COALESCE(SUM(completed_clicks), 0)::BIGINT \
                 FROM tasks",
            )
            .fetch_one(&self.pool)
            .await
            .map_err(map_error)?;

        let by_type: Vec<(i32, String, i64)> = sqlx::query_as(
            "SELECT tt.id, tt.name, COUNT(t.id) \
             FROM task_types tt \
             LEFT JOIN tasks t ON t.task_type_id = tt.id \
             GROUP BY tt.id, tt.name \
             ORDER BY tt.id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(TaskStatistics {
            total,
            active,
            archived,
            finished,
            completed_clicks,
            by_type: by_type
                .into_iter()
                .map(|(id, name, tasks)| TaskTypeCount {
                    task_type: TaskType {
                        id: TaskTypeId::new(id),
                        name,
                    },
                    tasks,
                })
                .collect(),
        })
    }

    async fn wallet_statistics(
        &self,
        since: DateTime<Utc>,
    ) -> Result<WalletStatistics, StoreError> {
        let (total, created_recently, pending, completed, completed_recently): (
            i64,
            i64,
            i64,
            i64,
            i64,
        ) = sqlx::query_as(
            "SELECT COUNT(*), \
                    COUNT(*) FILTER (WHERE created_at >= $1), \
                    COUNT(*) FILTER (WHERE status = 'pending'), \
                    COUNT(*) FILTER (WHERE status = 'completed'), \
                    COUNT(*) FILTER (WHERE status = 'completed' AND created_at >= $1) \
             FROM wallet_transactions",
        )
        .bind(since)
        .fetch_one(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(WalletStatistics {
            total,
            created_recently,
            pending,
            completed,
            completed_recently,
        })
    }
}

#[async_trait]
impl MarketStore for PostgresMarketStore {
    async fn begin(&self) -> Result<Box<dyn MarketTransaction>, StoreError> {
        let transaction = self.pool.begin().await.map_err(map_error)?;
        Ok(Box::new(PostgresTransaction {
            inner: Some(transaction),
        }))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_external_id(
        &self,
        external_id: ExternalId,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(external_id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn list_owned_tasks(
        &self,
        owner: UserId,
        statuses: &[TaskStatus],
    ) -> Result<Vec<Task>, StoreError> {
        let labels: Vec<String> = statuses
            .iter()
            .map(|status| status.as_str().to_string())
            .collect();
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE owner_id = $1 AND status = ANY($2) \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(owner.value())
            .bind(labels)
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?;
        convert_all(rows)
    }

    async fn list_claimable_tasks(
        &self,
        user: UserId,
        task_type: Option<TaskTypeId>,
        limit: usize,
    ) -> Result<Vec<Task>, StoreError> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks t \
             WHERE t.status = 'active' \
               AND t.completed_clicks < t.total_clicks \
               AND t.owner_id <> $1 \
               AND ($2::INTEGER IS NULL OR t.task_type_id = $2) \
               AND NOT EXISTS ( \
                   SELECT 1 FROM task_claims c \
                   WHERE c.task_id = t.id AND c.user_id = $1 \
               ) \
             ORDER BY t.id \
             LIMIT $3"
        );
        let rows = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(user.value())
            .bind(task_type.map(TaskTypeId::value))
            .bind(to_limit(limit))
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?;
        convert_all(rows)
    }

    async fn list_task_types(&self) -> Result<Vec<TaskType>, StoreError> {
        let rows: Vec<(i32, String)> =
            sqlx::query_as("SELECT id, name FROM task_types ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_error)?;
        Ok(rows
            .into_iter()
            .map(|(id, name)| TaskType {
                id: TaskTypeId::new(id),
                name,
            })
            .collect())
    }

    async fn list_referred_users(&self, referrer: UserId) -> Result<Vec<ReferredUser>, StoreError> {
        let rows: Vec<(i64, Option<String>, Option<String>, DateTime<Utc>)> = sqlx::query_as(
            "SELECT u.external_id, u.username, u.first_name, r.referred_at \
             FROM referrals r \
             JOIN users u ON u.id = r.referred_id \
             WHERE r.referrer_id = $1 \
             ORDER BY r.referred_at, u.external_id",
        )
        .bind(referrer.value())
        .fetch_all(&self.pool)
        .await
        .map_err(map_error)?;

        Ok(rows
            .into_iter()
            .map(
                |(external_id, username, first_name, referred_at)| ReferredUser {
                    external_id: ExternalId::new(external_id),
                    username,
                    first_name,
                    referred_at,
                },
            )
            .collect())
    }

    async fn list_wallet_transactions(
        &self,
        user: UserId,
    ) -> Result<Vec<WalletTransaction>, StoreError> {
        let sql = format!(
            "SELECT {WALLET_COLUMNS} FROM wallet_transactions \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, WalletTransactionRow>(&sql)
            .bind(user.value())
            .fetch_all(&self.pool)
            .await
            .map_err(map_error)?;
        convert_all(rows)
    }

    async fn statistics(&self, since: DateTime<Utc>) -> Result<StatisticsSnapshot, StoreError> {
        Ok(StatisticsSnapshot {
            users: self.user_statistics(since).await?,
            tasks: self.task_statistics().await?,
            wallet: self.wallet_statistics(since).await?,
        })
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A unit of work over one PostgreSQL transaction.
pub struct PostgresTransaction {
    inner: Option<Transaction<'static, Postgres>>,
}

impl PostgresTransaction {
    fn connection(&mut self) -> Result<&mut PgConnection, StoreError> {
        self.inner
            .as_deref_mut()
            .ok_or(StoreError::TransactionClosed)
    }
}

#[async_trait]
impl MarketTransaction for PostgresTransaction {
    async fn lock_user(&mut self, id: UserId) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.value())
            .fetch_optional(self.connection()?)
            .await
            .map_err(map_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_external_id(
        &mut self,
        external_id: ExternalId,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE external_id = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(external_id.value())
            .fetch_optional(self.connection()?)
            .await
            .map_err(map_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_user_by_referral_code(
        &mut self,
        code: &ReferralCode,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE referral_code = $1");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(code.as_str())
            .fetch_optional(self.connection()?)
            .await
            .map_err(map_error)?
            .map(User::try_from)
            .transpose()
    }

    async fn referral_code_exists(&mut self, code: &ReferralCode) -> Result<bool, StoreError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE referral_code = $1)")
            .bind(code.as_str())
            .fetch_one(self.connection()?)
            .await
            .map_err(map_error)
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users \
                 (external_id, username, first_name, last_name, language_code, is_premium, \
                  points, referral_code, referred_by, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8, $9) \
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user.external_id.value())
            .bind(user.profile.username)
            .bind(user.profile.first_name)
            .bind(user.profile.last_name)
            .bind(user.profile.language_code)
            .bind(user.profile.is_premium)
            .bind(user.referral_code.as_str())
            .bind(user.referred_by.map(UserId::value))
            .bind(user.created_at)
            .fetch_one(self.connection()?)
            .await
            .map_err(map_error)?;
        User::try_from(row)
    }

    async fn reserve_points(
        &mut self,
        user: UserId,
        amount: Points,
    ) -> Result<Option<Points>, StoreError> {
        let balance: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET points = points - $2 \
             WHERE id = $1 AND points >= $2 \
             RETURNING points",
        )
        .bind(user.value())
        .bind(amount.value())
        .fetch_optional(self.connection()?)
        .await
        .map_err(map_error)?;
        balance
            .map(|balance| to_points(balance, "users.points"))
            .transpose()
    }

    async fn credit_points(
        &mut self,
        user: UserId,
        amount: Points,
    ) -> Result<Option<Points>, StoreError> {
        let balance: Option<i64> = sqlx::query_scalar(
            "UPDATE users SET points = points + $2 WHERE id = $1 RETURNING points",
        )
        .bind(user.value())
        .bind(amount.value())
        .fetch_optional(self.connection()?)
        .await
        .map_err(map_error)?;
        balance
            .map(|balance| to_points(balance, "users.points"))
            .transpose()
    }

    async fn task_type_exists(&mut self, id: TaskTypeId) -> Result<bool, StoreError> {
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM task_types WHERE id = $1)")
            .bind(id.value())
            .fetch_one(self.connection()?)
            .await
            .map_err(map_error)
    }

    async fn insert_task(&mut self, task: NewTask) -> Result<Task, StoreError> {
        let sql = format!(
            "INSERT INTO tasks \
                 (owner_id, task_type_id, name, description, link, total_clicks, \
                  completed_clicks, reward_per_click, reserved_points, status, \
                  created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, 0, $7, $8, 'active', $9, $9) \
             RETURNING {TASK_COLUMNS}"
        );
        let row = sqlx::query_as::<_, TaskRow>(&sql)
            .bind(task.owner.value())
            .bind(task.task_type.value())
            .bind(task.name)
            .bind(task.description)
            .bind(task.link)
            .bind(to_i32(task.total_clicks, "tasks.total_clicks")?)
            .bind(task.reward_per_click.value())
            .bind(task.reserved_points.value())
            .bind(task.created_at)
            .fetch_one(self.connection()?)
            .await
            .map_err(map_error)?;
        Task::try_from(row)
    }

    async fn lock_task(&mut self, id: TaskId) -> Result<Option<Task>, StoreError> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, TaskRow>(&sql)
            .bind(id.value())
            .fetch_optional(self.connection()?)
            .await
            .map_err(map_error)?
            .map(Task::try_from)
            .transpose()
    }

    async fn save_task(&mut self, task: &Task) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE tasks SET completed_clicks = $2, status = $3, updated_at = $4 WHERE id = $1",
        )
        .bind(task.id.value())
        .bind(to_i32(task.completed_clicks, "tasks.completed_clicks")?)
        .bind(task.status.as_str())
        .bind(task.updated_at)
        .execute(self.connection()?)
        .await
        .map(|_| ())
        .map_err(map_error)
    }

    async fn insert_claim(&mut self, claim: &Claim) -> Result<(), StoreError> {
        sqlx::query("INSERT INTO task_claims (task_id, user_id, claimed_at) VALUES ($1, $2, $3)")
            .bind(claim.task.value())
            .bind(claim.user.value())
            .bind(claim.claimed_at)
            .execute(self.connection()?)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn insert_referral(&mut self, referral: &Referral) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO referrals (referrer_id, referred_id, referred_at) VALUES ($1, $2, $3)",
        )
        .bind(referral.referrer.value())
        .bind(referral.referred.value())
        .bind(referral.referred_at)
        .execute(self.connection()?)
        .await
        .map(|_| ())
        .map_err(map_error)
    }

    async fn insert_wallet_transaction(
        &mut self,
        transaction: NewWalletTransaction,
    ) -> Result<WalletTransaction, StoreError> {
        let sql = format!(
            "INSERT INTO wallet_transactions (user_id, wallet_address, amount, status, created_at) \
             VALUES ($1, $2, $3, 'pending', $4) \
             RETURNING {WALLET_COLUMNS}"
        );
        let row = sqlx::query_as::<_, WalletTransactionRow>(&sql)
            .bind(transaction.user.value())
            .bind(transaction.wallet_address)
            .bind(transaction.amount)
            .bind(transaction.created_at)
            .fetch_one(self.connection()?)
            .await
            .map_err(map_error)?;
        WalletTransaction::try_from(row)
    }

    async fn lock_wallet_transaction(
        &mut self,
        id: WalletTransactionId,
    ) -> Result<Option<WalletTransaction>, StoreError> {
        let sql = format!("SELECT {WALLET_COLUMNS} FROM wallet_transactions WHERE id = $1 FOR UPDATE");
        sqlx::query_as::<_, WalletTransactionRow>(&sql)
            .bind(id.value())
            .fetch_optional(self.connection()?)
            .await
            .map_err(map_error)?
            .map(WalletTransaction::try_from)
            .transpose()
    }

    async fn save_wallet_transaction(
        &mut self,
        transaction: &WalletTransaction,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE wallet_transactions SET status = $2, transaction_hash = $3 WHERE id = $1",
        )
        .bind(transaction.id.value())
        .bind(transaction.status.as_str())
        .bind(transaction.transaction_hash.as_deref())
        .execute(self.connection()?)
        .await
        .map(|_| ())
        .map_err(map_error)
    }

    async fn commit(&mut self) -> Result<(), StoreError> {
        self.inner
            .take()
            .ok_or(StoreError::TransactionClosed)?
            .commit()
            .await
            .map_err(map_error)
    }
}
