//! Login and registration with referral bonus.
//!
//! # Workflow Steps
//!
//! 1. Look the identity up; an existing user is returned as-is
//! 2. Otherwise open a transaction and check again inside it
//! 3. Resolve the presented referral code; an invalid or unknown code is
//!    logged and ignored
//! 4. Generate a referral code for the new user, retrying on collision
//! 5. Insert the user; if a referrer was resolved, record the referral and
//!    credit the bonus
//! 6. Commit
//!
//! The bonus lives in the registration branch only, so re-authentication
//! never credits it again. The `referrals` uniqueness constraint backs this
//! up at the storage level. Two concurrent first logins of the same identity
//! race on the external-id constraint; the loser restarts and finds the
//! winner's user.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::application::errors::MarketError;
use crate::application::ledger;
use crate::application::ports::{
    MarketStore, MarketTransaction, ReferralCodeGenerator, StoreError,
    USER_EXTERNAL_ID_CONSTRAINT, USER_REFERRAL_CODE_CONSTRAINT,
};
use crate::domain::{
    ExternalId, NewUser, REFERRAL_BONUS, Referral, ReferralCode, User, UserProfile,
};

/// Attempts at drawing an unused referral code per registration.
pub const MAX_REFERRAL_CODE_ATTEMPTS: u32 = 32;

/// Attempts at a registration that lost an insert race.
pub const MAX_REGISTRATION_ATTEMPTS: u32 = 3;

/// A verified login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginInput {
    /// Platform identity.
    pub external_id: ExternalId,
    /// Profile reported by the platform.
    pub profile: UserProfile,
    /// Referral code presented at signup, if any.
    pub referral_code: Option<String>,
}

/// Result of a login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    /// The logged-in user.
    pub user: User,
    /// `true` if this login registered the user.
    pub created: bool,
}

/// Logs a user in, registering them on first contact.
///
/// # Errors
///
/// - `Storage` on backend failure, or if no unused referral code could be
///   drawn
pub async fn login(
    store: &dyn MarketStore,
    codes: &dyn ReferralCodeGenerator,
    input: LoginInput,
    now: DateTime<Utc>,
) -> Result<LoginOutcome, MarketError> {
    if let Some(user) = store.find_user_by_external_id(input.external_id).await? {
        debug!(user = %user.id, "existing user logged in");
        return Ok(LoginOutcome {
            user,
            created: false,
        });
    }

    for attempt in 1..=MAX_REGISTRATION_ATTEMPTS {
        match register(store, codes, &input, now).await {
            Err(MarketError::Storage(error))
                if error.violates(USER_EXTERNAL_ID_CONSTRAINT)
                    || error.violates(USER_REFERRAL_CODE_CONSTRAINT) =>
            {
                warn!(
                    external_id = %input.external_id,
                    attempt,
                    %error,
                    "registration lost an insert race, retrying"
                );
            }
            outcome => return outcome,
        }
    }

    Err(StoreError::RetriesExhausted {
        operation: format!("registering external id {}", input.external_id),
        attempts: MAX_REGISTRATION_ATTEMPTS,
    }
    .into())
}

async fn register(
    store: &dyn MarketStore,
    codes: &dyn ReferralCodeGenerator,
    input: &LoginInput,
    now: DateTime<Utc>,
) -> Result<LoginOutcome, MarketError> {
    let mut transaction = store.begin().await?;

    if let Some(user) = transaction
        .find_user_by_external_id(input.external_id)
        .await?
    {
        return Ok(LoginOutcome {
            user,
            created: false,
        });
    }

    let referrer = match input.referral_code.as_deref() {
        Some(code) => resolve_referrer(transaction.as_mut(), code).await?,
        None => None,
    };

    let referral_code = draw_referral_code(transaction.as_mut(), codes).await?;

    let user = transaction
        .insert_user(NewUser {
            external_id: input.external_id,
            profile: input.profile.clone(),
            referral_code,
            referred_by: referrer.as_ref().map(|referrer| referrer.id),
            created_at: now,
        })
        .await?;

    if let Some(referrer) = &referrer {
        transaction
            .insert_referral(&Referral {
                referrer: referrer.id,
                referred: user.id,
                referred_at: now,
            })
            .await?;
        ledger::credit(transaction.as_mut(), referrer.id, REFERRAL_BONUS).await?;
    }

    transaction.commit().await?;

    info!(user = %user.id, external_id = %user.external_id, "user registered");
    if let Some(referrer) = referrer {
        info!(
            referrer = %referrer.id,
            referred = %user.id,
            bonus = %REFERRAL_BONUS,
            "referral bonus credited"
        );
    }

    Ok(LoginOutcome {
        user,
        created: true,
    })
}

async fn resolve_referrer(
    transaction: &mut dyn MarketTransaction,
    presented: &str,
) -> Result<Option<User>, MarketError> {
    let Ok(code) = ReferralCode::parse(presented.trim()) else {
        warn!(code = presented, "ignoring malformed referral code");
        return Ok(None);
    };

    let referrer = transaction.find_user_by_referral_code(&code).await?;
    if referrer.is_none() {
        warn!(code = %code, "ignoring unknown referral code");
    }
    Ok(referrer)
}

async fn draw_referral_code(
    transaction: &mut dyn MarketTransaction,
    codes: &dyn ReferralCodeGenerator,
) -> Result<ReferralCode, MarketError> {
    for _ in 0..MAX_REFERRAL_CODE_ATTEMPTS {
        let candidate = codes.generate();
        if !transaction.referral_code_exists(&candidate).await? {
            return Ok(candidate);
        }
        debug!(code = %candidate, "referral code collision");
    }

    Err(StoreError::RetriesExhausted {
        operation: "drawing an unused referral code".to_string(),
        attempts: MAX_REFERRAL_CODE_ATTEMPTS,
    }
    .into())
}
