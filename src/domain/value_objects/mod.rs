//! Value objects for the marketplace domain.
//!
//! - [`Points`]: non-negative point amounts with checked arithmetic
//! - identifiers: [`UserId`], [`ExternalId`], [`TaskId`], [`TaskTypeId`],
//!   [`WalletTransactionId`]
//! - [`ReferralCode`]: 8-character shareable code

mod identifiers;
mod points;
mod referral_code;

pub use identifiers::{ExternalId, TaskId, TaskTypeId, UserId, WalletTransactionId};
pub use points::{Points, PointsError};
pub use referral_code::{
    REFERRAL_CODE_ALPHABET, REFERRAL_CODE_LENGTH, ReferralCode, ReferralCodeError,
};
