//! Composition utilities for wiring `SQLite` adapters into the gateway.
//!
//! Construction only; no domain logic lives here.

use std::sync::Arc;

use sqlx::SqlitePool;

use infergate_core::{ApiKeyStore, ChatLogPort};

use crate::repositories::{SqliteApiKeyStore, SqliteChatLog};

/// Trait-object-wrapped stores, ready to hand to the HTTP layer.
#[derive(Debug, Clone)]
pub struct Stores {
    pub chat_log: Arc<dyn ChatLogPort>,
    pub api_keys: Arc<dyn ApiKeyStore>,
}

/// Build all `SQLite` stores from one pool.
pub fn build_stores(pool: SqlitePool) -> Stores {
    Stores {
        chat_log: Arc::new(SqliteChatLog::new(pool.clone())),
        api_keys: Arc::new(SqliteApiKeyStore::new(pool)),
    }
}
