//! `keys` command handlers.

use infergate_core::ApiKeyStore;
use infergate_db::generate_api_key;
use tracing::info;

use crate::error::CliError;

/// Generate a key for `username` and store its hash.
///
/// Returns the plaintext key; it cannot be recovered later.
pub async fn create_key(store: &dyn ApiKeyStore, username: &str) -> Result<String, CliError> {
    let key = generate_api_key();
    store.register(username, &key).await?;
    info!(user = %username, "Issued API key");
    Ok(key)
}

/// Execute `keys create`.
pub async fn execute_create(store: &dyn ApiKeyStore, username: &str) -> Result<(), CliError> {
    let key = create_key(store, username).await?;
    println!("API key for '{username}':");
    println!("{key}");
    println!();
    println!("Store it now; it will not be shown again.");
    Ok(())
}
