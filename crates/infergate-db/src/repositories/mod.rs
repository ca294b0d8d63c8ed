//! `SQLite` implementations of the core storage ports.

mod sqlite_api_key_store;
mod sqlite_chat_log;

pub use sqlite_api_key_store::{SqliteApiKeyStore, generate_api_key, hash_api_key};
pub use sqlite_chat_log::SqliteChatLog;
