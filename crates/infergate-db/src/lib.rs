//! `SQLite` adapters for infergate.
//!
//! Implements the [`ChatLogPort`](infergate_core::ChatLogPort) and
//! [`ApiKeyStore`](infergate_core::ApiKeyStore) ports on top of `sqlx`.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

pub mod factory;
pub mod repositories;
pub mod setup;

pub use factory::{Stores, build_stores};
pub use repositories::{SqliteApiKeyStore, SqliteChatLog, generate_api_key, hash_api_key};
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
