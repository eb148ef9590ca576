//! Domain layer for the task-reward marketplace.
//!
//! The domain layer holds the entities, the task state machine and the
//! points arithmetic. It performs no I/O; the application layer loads
//! entities inside a storage transaction, asks the domain what should change,
//! and writes the result back.
//!
//! # Structure
//!
//! - [`value_objects`] - points, identifiers, referral codes
//! - [`user`] - users and their profiles
//! - [`task`] - tasks, the lifecycle state machine, payout/refund rules
//! - [`claim`] - per-user task claims
//! - [`referral`] - referral records and the referral bonus
//! - [`wallet`] - deposit packages and their settlement
//! - [`validation`] - error-accumulating request checks
//! - [`errors`] - business-rule violations

pub mod claim;
pub mod errors;
pub mod referral;
pub mod task;
pub mod user;
pub mod validation;
pub mod value_objects;
pub mod wallet;

pub use claim::Claim;
pub use errors::{DomainError, DomainResult, into_result};
pub use referral::{REFERRAL_BONUS, Referral, ReferredUser};
pub use task::{
    CLAIMABLE_PAGE_SIZE, COMPLETER_SHARE_PERCENT, NewTask, PLATFORM_FEE_PERCENT, Task,
    TaskClosure, TaskStatus, TaskType, completer_payout, escrow_for,
};
pub use user::{NewUser, User, UserProfile};
pub use validation::{FieldViolation, FieldViolations, Validated};
pub use value_objects::*;
pub use wallet::{
    NewWalletTransaction, Settlement, WalletTransaction, WalletTransactionStatus, package_points,
};
