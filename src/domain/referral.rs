//! Referral records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{ExternalId, Points, UserId};

/// Bonus credited to a referrer when a referred user registers.
pub const REFERRAL_BONUS: Points = match Points::new(100) {
    Ok(points) => points,
    Err(_) => Points::ZERO,
};

/// Relationship created when a new user registers with someone's code.
///
/// At most one record exists per referred user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Referral {
    /// Owner of the redeemed code.
    pub referrer: UserId,
    /// The newly registered user.
    pub referred: UserId,
    /// Registration time of the referred user.
    pub referred_at: DateTime<Utc>,
}

/// A referred user as shown to their referrer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferredUser {
    /// Platform identity of the referred user.
    pub external_id: ExternalId,
    /// Platform username, if any.
    pub username: Option<String>,
    /// First name, if any.
    pub first_name: Option<String>,
    /// When the referral was recorded.
    pub referred_at: DateTime<Utc>,
}
