//! Task-reward marketplace backend.
//!
//! Users earn points by completing click tasks that other users pay for.
//! Creating a task reserves its whole budget from the creator's balance;
//! every paid click consumes part of that escrow, and closing the task
//! refunds whatever is left.
//!
//! # Architecture
//!
//! The application follows the Onion Architecture:
//!
//! - **Domain Layer**: points, tasks, users, referrals, wallet deposits and
//!   the rules between them
//! - **Application Layer**: storage ports, the ledger, workflows, queries,
//!   validation
//! - **Infrastructure Layer**: configuration, PostgreSQL and in-memory
//!   stores, telemetry
//! - **API Layer**: HTTP handlers, DTOs, identity verification, error mapping

pub mod api;
pub mod application;
pub mod domain;
pub mod infrastructure;
