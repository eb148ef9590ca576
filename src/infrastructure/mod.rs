//! Infrastructure layer for the task-reward marketplace.
//!
//! This module contains all infrastructure concerns including:
//!
//! - **Configuration**: Application settings loaded from environment variables
//! - **Stores**: PostgreSQL and in-memory implementations of the market ports
//! - **Referral codes**: random code generation
//! - **Telemetry**: tracing subscriber setup
//! - **Dependencies**: Dependency injection container
//!
//! # Module Organization
//!
//! - `config` - Application configuration
//! - `postgres` - sqlx-backed store
//! - `memory_store` - mutex-backed store for tests and local runs
//! - `codes` - referral code generator
//! - `telemetry` - logging
//! - `dependencies` - Dependency injection container

mod codes;
pub mod config;
mod dependencies;
mod memory_store;
mod postgres;
mod telemetry;

pub use codes::RandomReferralCodeGenerator;
pub use config::{AppConfig, ConfigError, LogFormat, StorageBackend};
pub use dependencies::AppDependencies;
pub use memory_store::{DEFAULT_TASK_TYPES, InMemoryMarketStore};
pub use postgres::{PostgresMarketStore, PostgresTransaction};
pub use telemetry::{DEFAULT_LOG_FILTER, init_tracing};
