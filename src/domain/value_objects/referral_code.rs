//! Referral code value object.
//!
//! Every user receives an 8-character code drawn from a fixed alphanumeric
//! alphabet when their account is created. Uniqueness is not a property of
//! the value itself; the registration workflow regenerates on collision.

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Alphabet referral codes are drawn from.
pub const REFERRAL_CODE_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Number of characters in a referral code.
pub const REFERRAL_CODE_LENGTH: usize = 8;

/// Errors raised when parsing a referral code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferralCodeError {
    /// The code does not have exactly [`REFERRAL_CODE_LENGTH`] characters.
    #[error("referral code must be {REFERRAL_CODE_LENGTH} characters, got {0}")]
    InvalidLength(usize),
    /// The code contains a character outside [`REFERRAL_CODE_ALPHABET`].
    #[error("referral code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A user's shareable referral code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ReferralCode(String);

impl ReferralCode {
    /// Parses a referral code presented by a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the code has the wrong length or contains a
    /// character outside the alphabet.
    pub fn parse(value: &str) -> Result<Self, ReferralCodeError> {
        let length = value.chars().count();
        if length != REFERRAL_CODE_LENGTH {
            return Err(ReferralCodeError::InvalidLength(length));
        }
        if let Some(invalid) = value
            .chars()
            .find(|character| !character.is_ascii() || !REFERRAL_CODE_ALPHABET.contains(&(*character as u8)))
        {
            return Err(ReferralCodeError::InvalidCharacter(invalid));
        }
        Ok(Self(value.to_string()))
    }

    /// Draws a fresh code from `rng`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..REFERRAL_CODE_LENGTH)
            .map(|_| {
                let index = rng.gen_range(0..REFERRAL_CODE_ALPHABET.len());
                char::from(REFERRAL_CODE_ALPHABET[index])
            })
            .collect();
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ReferralCode {
    type Error = ReferralCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ReferralCode> for String {
    fn from(code: ReferralCode) -> Self {
        code.0
    }
}

impl fmt::Display for ReferralCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}
