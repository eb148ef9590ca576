//! User entity.
//!
//! A user owns a points balance exclusively. The balance is only ever changed
//! through the ledger primitives in [`crate::application::ledger`]; this type
//! carries no mutators for it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ExternalId, Points, ReferralCode, UserId};

/// Profile fields supplied by the login platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Platform username, if any.
    pub username: Option<String>,
    /// First name.
    pub first_name: Option<String>,
    /// Last name.
    pub last_name: Option<String>,
    /// IETF language tag reported by the client.
    pub language_code: Option<String>,
    /// Whether the platform reports a premium subscription.
    pub is_premium: bool,
}

/// A registered user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Internal identifier.
    pub id: UserId,
    /// Identity on the login platform.
    pub external_id: ExternalId,
    /// Profile captured at registration.
    pub profile: UserProfile,
    /// Spendable balance.
    pub points: Points,
    /// This user's own referral code.
    pub referral_code: ReferralCode,
    /// The user whose code was redeemed at registration, if any.
    pub referred_by: Option<UserId>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns `true` if the balance covers `amount`.
    #[must_use]
    pub fn can_afford(&self, amount: Points) -> bool {
        self.points >= amount
    }
}

/// Data for inserting a new user.
///
/// New users always start with a zero balance; bonuses are credited through
/// the ledger afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Identity on the login platform.
    pub external_id: ExternalId,
    /// Profile captured at registration.
    pub profile: UserProfile,
    /// Freshly generated referral code.
    pub referral_code: ReferralCode,
    /// Referrer resolved from the presented code.
    pub referred_by: Option<UserId>,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}
