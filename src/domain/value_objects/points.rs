//! Points value object.
//!
//! Points are the only currency of the marketplace. A `Points` value is never
//! negative: every arithmetic helper is checked and reports underflow instead
//! of wrapping, so a balance or an escrow cannot be driven below zero by
//! accident.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing `Points`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PointsError {
    /// The raw value was negative.
    #[error("points cannot be negative: {0}")]
    Negative(i64),
}

/// A non-negative amount of points.
///
/// The inner representation is `i64` so that values map directly onto
/// PostgreSQL `BIGINT` columns.
///
/// # Examples
///
/// ```rust
/// use reward_tasks::domain::Points;
///
/// let balance = Points::new(1000).unwrap();
/// let cost = Points::new(500).unwrap();
///
/// assert_eq!(balance.checked_sub(cost), Some(Points::new(500).unwrap()));
/// assert_eq!(cost.checked_sub(balance), None);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "i64", into = "i64")]
pub struct Points(i64);

impl Points {
    /// Zero points.
    pub const ZERO: Self = Self(0);

    /// Creates a new `Points` value.
    ///
    /// # Errors
    ///
    /// Returns `PointsError::Negative` if `value` is below zero.
    pub const fn new(value: i64) -> Result<Self, PointsError> {
        if value < 0 {
            Err(PointsError::Negative(value))
        } else {
            Ok(Self(value))
        }
    }

    /// Returns the raw value.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns `true` if this is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Subtracts `other`, returning `None` if the result would be negative.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0
            .checked_sub(other.0)
            .filter(|value| *value >= 0)
            .map(Self)
    }

    /// Multiplies by a click count, returning `None` on overflow.
    #[must_use]
    pub fn checked_mul(self, factor: u32) -> Option<Self> {
        self.0.checked_mul(i64::from(factor)).map(Self)
    }

    /// Returns `percent`% of this amount, rounded down.
    ///
    /// `percent` is expected to be at most 100.
    #[must_use]
    pub const fn percent(self, percent: u8) -> Self {
        // Split so the intermediate product stays in range.
        let whole = self.0 / 100 * percent as i64;
        let fraction = self.0 % 100 * percent as i64 / 100;
        Self(whole + fraction)
    }
}

impl TryFrom<i64> for Points {
    type Error = PointsError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Points> for i64 {
    fn from(points: Points) -> Self {
        points.0
    }
}

impl fmt::Display for Points {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}
