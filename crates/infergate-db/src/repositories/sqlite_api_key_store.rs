//! `SQLite` implementation of the `ApiKeyStore` trait.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use rand::distributions::Alphanumeric;
use sha2::{Digest, Sha512};
use sqlx::{Row, SqlitePool};

use infergate_core::{ApiKeyError, ApiKeyStore};

/// Length of generated API keys.
const API_KEY_LEN: usize = 64;

/// Hash an API key for storage: base64 of its SHA-512 digest.
pub fn hash_api_key(api_key: &str) -> String {
    let digest = Sha512::digest(api_key.as_bytes());
    STANDARD.encode(digest)
}

/// Generate a random alphanumeric API key.
pub fn generate_api_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(API_KEY_LEN)
        .map(char::from)
        .collect()
}

/// API keys stored as hashes in the `api_keys` table.
#[derive(Debug, Clone)]
pub struct SqliteApiKeyStore {
    pool: SqlitePool,
}

impl SqliteApiKeyStore {
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ApiKeyStore for SqliteApiKeyStore {
    async fn identify(&self, api_key: &str) -> Result<Option<String>, ApiKeyError> {
        let row = sqlx::query("SELECT username FROM api_keys WHERE key_hash = ?")
            .bind(hash_api_key(api_key))
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| ApiKeyError::Database(e.to_string()))?;

        Ok(row.map(|r| r.get("username")))
    }

    async fn register(&self, username: &str, api_key: &str) -> Result<(), ApiKeyError> {
        sqlx::query("INSERT INTO api_keys (username, key_hash) VALUES (?, ?)")
            .bind(username)
            .bind(hash_api_key(api_key))
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => ApiKeyError::Duplicate,
                other => ApiKeyError::Database(other.to_string()),
            })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup::setup_test_database;

    #[test]
    fn test_hash_is_base64_sha512() {
        let hash = hash_api_key("secret");
        // 64-byte digest -> 88 base64 chars with padding
        assert_eq!(hash.len(), 88);
        assert!(hash.ends_with("=="));
        assert_eq!(hash, hash_api_key("secret"));
        assert_ne!(hash, hash_api_key("Secret"));
    }

    #[test]
    fn test_generated_keys() {
        let key = generate_api_key();
        assert_eq!(key.len(), API_KEY_LEN);
        assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(key, generate_api_key());
    }

    #[tokio::test]
    async fn test_register_then_identify() {
        let store = SqliteApiKeyStore::new(setup_test_database().await.unwrap());
        let key = generate_api_key();

        store.register("alice", &key).await.unwrap();

        assert_eq!(store.identify(&key).await.unwrap(), Some("alice".into()));
        assert_eq!(store.identify("wrong").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_plaintext_key_is_not_stored() {
        let pool = setup_test_database().await.unwrap();
        let store = SqliteApiKeyStore::new(pool.clone());
        store.register("alice", "plain-key").await.unwrap();

        let stored: String = sqlx::query("SELECT key_hash FROM api_keys")
            .fetch_one(&pool)
            .await
            .unwrap()
            .get("key_hash");
        assert_ne!(stored, "plain-key");
        assert_eq!(stored, hash_api_key("plain-key"));
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected() {
        let store = SqliteApiKeyStore::new(setup_test_database().await.unwrap());
        store.register("alice", "k").await.unwrap();

        let err = store.register("bob", "k").await.unwrap_err();
        assert!(matches!(err, ApiKeyError::Duplicate));
    }
}
