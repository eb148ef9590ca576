//! Signed init-data verification.
//!
//! The login platform hands the client an URL-encoded payload (`init data`)
//! signed with a key derived from the bot token:
//!
//! ```text
//! secret     = HMAC-SHA256(key = "WebAppData", message = bot_token)
//! check      = sorted "key=value" pairs except `hash`, joined by '\n'
//! hash       = hex(HMAC-SHA256(key = secret, message = check))
//! ```
//!
//! The `user` field carries the caller's identity as JSON and `start_param`
//! carries an optional referral code.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

use crate::domain::{ExternalId, UserProfile};

type HmacSha256 = Hmac<Sha256>;

/// Header every authenticated route reads the signed payload from.
pub const INIT_DATA_HEADER: &str = "x-telegram-init-data";

const SECRET_DERIVATION_KEY: &[u8] = b"WebAppData";

/// Reasons a payload is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// No payload was supplied.
    #[error("init data is missing")]
    Missing,

    /// The payload is not valid URL-encoded data.
    #[error("init data is malformed: {0}")]
    Malformed(String),

    /// The payload carries no `hash` field.
    #[error("init data has no hash")]
    MissingHash,

    /// The hash does not match the payload.
    #[error("init data signature mismatch")]
    InvalidSignature,

    /// The payload is signed but carries no usable `user` field.
    #[error("init data carries no valid user: {0}")]
    InvalidUser(String),
}

/// The identity carried by a verified payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    /// The caller's platform id.
    pub external_id: ExternalId,
    /// Profile fields shown by the platform.
    pub profile: UserProfile,
    /// Start parameter of the link the client was opened with.
    pub start_param: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlatformUser {
    id: i64,
    username: Option<String>,
    first_name: Option<String>,
    last_name: Option<String>,
    language_code: Option<String>,
    #[serde(default)]
    is_premium: bool,
}

/// Verifies `init_data` against `bot_token` and extracts the identity.
///
/// # Errors
///
/// Returns an [`IdentityError`] if the payload is malformed, unsigned,
/// signed with another token, or lacks a `user` field.
pub fn verify_init_data(init_data: &str, bot_token: &str) -> Result<VerifiedIdentity, IdentityError> {
    let mut fields: Vec<(String, String)> = serde_urlencoded::from_str(init_data)
        .map_err(|error| IdentityError::Malformed(error.to_string()))?;

    let hash_position = fields
        .iter()
        .position(|(key, _)| key == "hash")
        .ok_or(IdentityError::MissingHash)?;
    let (_, received_hash) = fields.remove(hash_position);
    let received = hex::decode(received_hash).map_err(|_| IdentityError::InvalidSignature)?;

    signature(&fields, bot_token)?
        .verify_slice(&received)
        .map_err(|_| IdentityError::InvalidSignature)?;

    let user_json = fields
        .iter()
        .find_map(|(key, value)| (key == "user").then_some(value.as_str()))
        .ok_or_else(|| IdentityError::InvalidUser("field is absent".to_string()))?;
    let user: PlatformUser = serde_json::from_str(user_json)
        .map_err(|error| IdentityError::InvalidUser(error.to_string()))?;

    let start_param = fields
        .into_iter()
        .find_map(|(key, value)| (key == "start_param").then_some(value))
        .filter(|value| !value.is_empty());

    Ok(VerifiedIdentity {
        external_id: ExternalId::new(user.id),
        profile: UserProfile {
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            language_code: user.language_code,
            is_premium: user.is_premium,
        },
        start_param,
    })
}

/// Produces a signed payload for `fields`.
///
/// Used by clients of the API in tests and local tooling.
///
/// # Errors
///
/// Returns `Malformed` if the fields cannot be URL-encoded.
pub fn sign_init_data(fields: &[(&str, &str)], bot_token: &str) -> Result<String, IdentityError> {
    let mut owned: Vec<(String, String)> = fields
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
    let hash = hex::encode(signature(&owned, bot_token)?.finalize().into_bytes());
    owned.push(("hash".to_string(), hash));

    serde_urlencoded::to_string(&owned).map_err(|error| IdentityError::Malformed(error.to_string()))
}

/// Feeds the data-check string of `fields` into a keyed MAC.
fn signature(fields: &[(String, String)], bot_token: &str) -> Result<HmacSha256, IdentityError> {
    let mut lines: Vec<String> = fields
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    lines.sort();
    let check = lines.join("\n");

    let mut derivation = HmacSha256::new_from_slice(SECRET_DERIVATION_KEY)
        .map_err(|_| IdentityError::InvalidSignature)?;
    derivation.update(bot_token.as_bytes());
    let secret = derivation.finalize().into_bytes();

    let mut mac =
        HmacSha256::new_from_slice(&secret).map_err(|_| IdentityError::InvalidSignature)?;
    mac.update(check.as_bytes());
    Ok(mac)
}
