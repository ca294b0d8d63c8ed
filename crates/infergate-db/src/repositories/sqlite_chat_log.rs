//! `SQLite` implementation of the `ChatLogPort` trait.

use async_trait::async_trait;
use sqlx::SqlitePool;

use infergate_core::{ChatLogError, ChatLogPort, ChatMessage};

/// Timestamp format stored in `chat_completion.request_timestamp` (UTC).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Records completed chat exchanges in the `chat_completion` table.
#[derive(Debug, Clone)]
pub struct SqliteChatLog {
    pool: SqlitePool,
}

impl SqliteChatLog {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChatLogPort for SqliteChatLog {
    async fn save(
        &self,
        username: &str,
        model_name: &str,
        messages: &[ChatMessage],
        response: &str,
    ) -> Result<(), ChatLogError> {
        let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
        let messages_json = serde_json::to_string(messages)
            .map_err(|e| ChatLogError::Serialization(e.to_string()))?;

        sqlx::query(
            "INSERT INTO chat_completion (request_timestamp, username, model_name, messages, response) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(timestamp)
        .bind(username)
        .bind(model_name)
        .bind(messages_json)
        .bind(response)
        .execute(&self.pool)
        .await
        .map_err(|e| ChatLogError::Database(e.to_string()))?;

        Ok(())
    }
}
