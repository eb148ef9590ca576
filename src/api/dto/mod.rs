//! Data Transfer Objects for the API layer.
//!
//! This module defines DTOs for API requests and responses, as well as
//! transformation functions between DTOs and domain types.
//!
//! # Design Principles
//!
//! - **Separation**: DTOs are separate from domain types
//! - **Validation**: range checks happen in the application layer, not here
//! - **Pure Functions**: All transformations are pure functions

pub mod requests;
pub mod responses;
pub mod transformers;

pub use requests::{
    CreateTaskRequest, DepositRequest, LoginRequest, SettleDepositRequest, TaskActionRequest,
    TaskTypeQuery,
};
pub use responses::{
    ClaimResponse, ClosedTaskResponse, LoginResponse, ReferralResponse, SettledDepositResponse,
    TaskResponse, TaskTypeResponse, UserResponse, WalletTransactionResponse,
};
