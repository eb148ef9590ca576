//! Application layer for the task-reward marketplace.
//!
//! This module contains the application logic, including:
//!
//! - **Ports**: the storage and code-generator traits infrastructure implements
//! - **Ledger**: the only two balance-changing primitives
//! - **Validation**: request checks that report every violation at once
//! - **Workflows**: transactional state changes
//! - **Queries**: unlocked reads for display

pub mod errors;
pub mod ledger;
pub mod ports;
pub mod queries;
pub mod validation;
pub mod workflows;

pub use errors::{ErrorKind, MarketError};
pub use ports::{MarketStore, MarketTransaction, ReferralCodeGenerator, StoreError};
pub use queries::*;
pub use validation::CreateTaskInput;
pub use workflows::*;
