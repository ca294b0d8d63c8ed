//! Gateway settings and validation.
//!
//! Settings are read from an optional TOML file and overridden field by
//! field from the command line / environment. All fields are optional so
//! partial sources merge cleanly; the `effective_*` accessors apply
//! defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stop_token::STOP_TOKEN;

/// Default HTTP listen address.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Default depth of the per-request queue between backend receive and
/// client write in the streaming relay.
pub const DEFAULT_RELAY_QUEUE_CAPACITY: usize = 10;

const DEFAULT_ROUTE_PREFIX: &str = "/openai";
const DEFAULT_CONFIG_PATH: &str = ".";
const DEFAULT_DATABASE_URL: &str = "sqlite://infergate.db";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_RELOAD_INTERVAL_SECS: u64 = 2;

/// Gateway settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GatewaySettings {
    /// Socket address the HTTP server binds to.
    pub listen_addr: Option<String>,

    /// Directory holding model definition `*.toml` files.
    pub config_path: Option<String>,

    /// Prefix the OpenAI routes are mounted under (e.g. `/openai`).
    pub route_prefix: Option<String>,

    /// Bounded queue depth for streaming relays (>= 1).
    pub relay_queue_capacity: Option<usize>,

    /// Backend dial timeout in seconds.
    pub connect_timeout_secs: Option<u64>,

    /// How often the model definition directory is polled for changes.
    pub reload_interval_secs: Option<u64>,

    /// SQLite URL for chat logs and API keys.
    pub database_url: Option<String>,

    /// Reject requests without a valid bearer key.
    pub require_auth: Option<bool>,

    /// End-of-sequence marker stripped from generated text.
    pub stop_token: Option<String>,
}

impl GatewaySettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            listen_addr: Some(DEFAULT_LISTEN_ADDR.to_string()),
            config_path: Some(DEFAULT_CONFIG_PATH.to_string()),
            route_prefix: Some(DEFAULT_ROUTE_PREFIX.to_string()),
            relay_queue_capacity: Some(DEFAULT_RELAY_QUEUE_CAPACITY),
            connect_timeout_secs: Some(DEFAULT_CONNECT_TIMEOUT_SECS),
            reload_interval_secs: Some(DEFAULT_RELOAD_INTERVAL_SECS),
            database_url: Some(DEFAULT_DATABASE_URL.to_string()),
            require_auth: Some(true),
            stop_token: Some(STOP_TOKEN.to_string()),
        }
    }

    #[must_use]
    pub fn effective_listen_addr(&self) -> &str {
        self.listen_addr.as_deref().unwrap_or(DEFAULT_LISTEN_ADDR)
    }

    #[must_use]
    pub fn effective_config_path(&self) -> &str {
        self.config_path.as_deref().unwrap_or(DEFAULT_CONFIG_PATH)
    }

    /// Route prefix without a trailing slash. An empty string mounts the
    /// routes at the root.
    #[must_use]
    pub fn effective_route_prefix(&self) -> &str {
        self.route_prefix
            .as_deref()
            .unwrap_or(DEFAULT_ROUTE_PREFIX)
            .trim_end_matches('/')
    }

    #[must_use]
    pub const fn effective_relay_queue_capacity(&self) -> usize {
        match self.relay_queue_capacity {
            Some(capacity) => capacity,
            None => DEFAULT_RELAY_QUEUE_CAPACITY,
        }
    }

    #[must_use]
    pub const fn effective_connect_timeout(&self) -> Duration {
        match self.connect_timeout_secs {
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub const fn effective_reload_interval(&self) -> Duration {
        match self.reload_interval_secs {
            Some(secs) => Duration::from_secs(secs),
            None => Duration::from_secs(DEFAULT_RELOAD_INTERVAL_SECS),
        }
    }

    #[must_use]
    pub fn effective_database_url(&self) -> &str {
        self.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL)
    }

    #[must_use]
    pub const fn effective_require_auth(&self) -> bool {
        match self.require_auth {
            Some(required) => required,
            None => true,
        }
    }

    #[must_use]
    pub fn effective_stop_token(&self) -> &str {
        self.stop_token.as_deref().unwrap_or(STOP_TOKEN)
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &Self) {
        if let Some(ref addr) = other.listen_addr {
            self.listen_addr = Some(addr.clone());
        }
        if let Some(ref path) = other.config_path {
            self.config_path = Some(path.clone());
        }
        if let Some(ref prefix) = other.route_prefix {
            self.route_prefix = Some(prefix.clone());
        }
        if let Some(capacity) = other.relay_queue_capacity {
            self.relay_queue_capacity = Some(capacity);
        }
        if let Some(secs) = other.connect_timeout_secs {
            self.connect_timeout_secs = Some(secs);
        }
        if let Some(secs) = other.reload_interval_secs {
            self.reload_interval_secs = Some(secs);
        }
        if let Some(ref url) = other.database_url {
            self.database_url = Some(url.clone());
        }
        if let Some(required) = other.require_auth {
            self.require_auth = Some(required);
        }
        if let Some(ref token) = other.stop_token {
            self.stop_token = Some(token.clone());
        }
    }
}

/// Settings validation error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SettingsError {
    #[error("Relay queue capacity must be at least 1, got {0}")]
    InvalidQueueCapacity(usize),

    #[error("Reload interval must be at least 1 second")]
    InvalidReloadInterval,

    #[error("Route prefix must start with '/', got '{0}'")]
    InvalidRoutePrefix(String),

    #[error("Listen address cannot be empty")]
    EmptyListenAddr,

    #[error("Stop token cannot be empty")]
    EmptyStopToken,
}

/// Validate settings values.
pub fn validate_settings(settings: &GatewaySettings) -> Result<(), SettingsError> {
    if let Some(capacity) = settings.relay_queue_capacity {
        if capacity == 0 {
            return Err(SettingsError::InvalidQueueCapacity(capacity));
        }
    }

    if settings.reload_interval_secs == Some(0) {
        return Err(SettingsError::InvalidReloadInterval);
    }

    if let Some(ref prefix) = settings.route_prefix {
        if !prefix.is_empty() && !prefix.starts_with('/') {
            return Err(SettingsError::InvalidRoutePrefix(prefix.clone()));
        }
    }

    if settings
        .listen_addr
        .as_ref()
        .is_some_and(|addr| addr.trim().is_empty())
    {
        return Err(SettingsError::EmptyListenAddr);
    }

    if settings.stop_token.as_ref().is_some_and(String::is_empty) {
        return Err(SettingsError::EmptyStopToken);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = GatewaySettings::with_defaults();
        assert_eq!(settings.effective_listen_addr(), DEFAULT_LISTEN_ADDR);
        assert_eq!(settings.effective_relay_queue_capacity(), 10);
        assert_eq!(settings.effective_route_prefix(), "/openai");
        assert_eq!(settings.effective_stop_token(), STOP_TOKEN);
        assert!(settings.effective_require_auth());
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_effective_values_fall_back_when_unset() {
        let settings = GatewaySettings::default();
        assert_eq!(settings.effective_config_path(), ".");
        assert_eq!(
            settings.effective_reload_interval(),
            Duration::from_secs(DEFAULT_RELOAD_INTERVAL_SECS)
        );
    }

    #[test]
    fn test_route_prefix_trailing_slash_trimmed() {
        let settings = GatewaySettings {
            route_prefix: Some("/v1/".into()),
            ..Default::default()
        };
        assert_eq!(settings.effective_route_prefix(), "/v1");
    }

    #[test]
    fn test_validate_zero_queue_capacity() {
        let settings = GatewaySettings {
            relay_queue_capacity: Some(0),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidQueueCapacity(0))
        ));
    }

    #[test]
    fn test_validate_route_prefix() {
        let settings = GatewaySettings {
            route_prefix: Some("openai".into()),
            ..Default::default()
        };
        assert!(matches!(
            validate_settings(&settings),
            Err(SettingsError::InvalidRoutePrefix(_))
        ));
    }

    #[test]
    fn test_merge_only_overrides_set_fields() {
        let mut base = GatewaySettings::with_defaults();
        base.merge(&GatewaySettings {
            relay_queue_capacity: Some(32),
            ..Default::default()
        });
        assert_eq!(base.effective_relay_queue_capacity(), 32);
        assert_eq!(base.effective_listen_addr(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn test_deserialize_partial_settings() {
        let settings: GatewaySettings =
            serde_json::from_str(r#"{"listen_addr": "127.0.0.1:9000", "require_auth": false}"#)
                .unwrap();
        assert_eq!(settings.effective_listen_addr(), "127.0.0.1:9000");
        assert!(!settings.effective_require_auth());
        assert_eq!(settings.relay_queue_capacity, None);
    }
}
