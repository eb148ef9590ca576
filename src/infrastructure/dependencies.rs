//! Dependency injection container.
//!
//! [`AppDependencies`] holds everything a request handler needs. The store
//! and the referral-code generator sit behind trait objects so the router
//! can run against PostgreSQL in production and the in-memory store in
//! tests.
//!
//! # Example
//!
//! ```rust,ignore
//! use reward_tasks::infrastructure::{AppConfig, AppDependencies, InMemoryMarketStore};
//! use std::sync::Arc;
//!
//! let dependencies = AppDependencies::new(
//!     config,
//!     Arc::new(InMemoryMarketStore::new()),
//!     Arc::new(RandomReferralCodeGenerator),
//! );
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::config::AppConfig;
use crate::application::ports::{MarketStore, ReferralCodeGenerator};
use crate::domain::ExternalId;

/// Application dependency container.
///
/// Cheap to clone; every field is shared.
#[derive(Clone)]
pub struct AppDependencies {
    /// Application configuration.
    config: Arc<AppConfig>,
    /// Market state.
    store: Arc<dyn MarketStore>,
    /// Referral code source.
    referral_codes: Arc<dyn ReferralCodeGenerator>,
    /// Clock used for workflow timestamps.
    clock: fn() -> DateTime<Utc>,
}

impl AppDependencies {
    /// Creates a new `AppDependencies` container using the system clock.
    #[must_use]
    pub fn new(
        config: AppConfig,
        store: Arc<dyn MarketStore>,
        referral_codes: Arc<dyn ReferralCodeGenerator>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            store,
            referral_codes,
            clock: Utc::now,
        }
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Returns a reference to the application configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the market store.
    #[must_use]
    pub fn store(&self) -> &dyn MarketStore {
        self.store.as_ref()
    }

    /// Returns the referral code generator.
    #[must_use]
    pub fn referral_codes(&self) -> &dyn ReferralCodeGenerator {
        self.referral_codes.as_ref()
    }

    /// Returns the current time according to the configured clock.
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    /// Returns the bot token identity payloads are signed with.
    #[must_use]
    pub fn bot_token(&self) -> &str {
        &self.config.bot_token
    }

    /// Returns `true` if `external_id` may use admin routes.
    #[must_use]
    pub fn is_admin(&self, external_id: ExternalId) -> bool {
        self.config.is_admin(external_id)
    }
}

impl std::fmt::Debug for AppDependencies {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppDependencies")
            .field("config", &self.config)
            .field("store", &"<dyn MarketStore>")
            .field("referral_codes", &"<dyn ReferralCodeGenerator>")
            .finish_non_exhaustive()
    }
}
