//! Workflows: every operation that changes state.
//!
//! Each workflow runs as one transaction against a [`MarketStore`] and
//! takes the current time as an argument, so tests can pin it.
//!
//! - [`create_task`] - reserve escrow and insert a task
//! - [`claim_task`] - record a click and pay the completer
//! - [`finish_task`] / [`archive_task`] - close a task and refund its escrow
//! - [`login`] - authenticate, registering and crediting referrers on first
//!   contact
//! - [`request_deposit`] / [`settle_deposit`] - wallet deposits
//!
//! [`MarketStore`]: crate::application::ports::MarketStore

pub mod claim_task;
pub mod close_task;
pub mod create_task;
pub mod login;
pub mod wallet;

pub use claim_task::{ClaimReceipt, claim_task};
pub use close_task::{ClosedTask, archive_task, finish_task};
pub use create_task::create_task;
pub use login::{LoginInput, LoginOutcome, MAX_REFERRAL_CODE_ATTEMPTS, login};
pub use wallet::{SettledDeposit, request_deposit, settle_deposit};
