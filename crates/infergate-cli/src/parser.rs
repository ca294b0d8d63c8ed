//! Root CLI parser and global options.

use std::path::PathBuf;

use clap::{Args, Parser};
use infergate_core::GatewaySettings;

use crate::commands::Commands;

/// OpenAI-compatible gateway in front of gRPC model backends.
#[derive(Parser)]
#[command(name = "infergate")]
#[command(about = "OpenAI-compatible gateway for gRPC model backends")]
#[command(version)]
pub struct Cli {
    /// Settings file (TOML). Command-line values override it.
    #[arg(long = "config", env = "INFERGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub settings: SettingsArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Per-invocation overrides for [`GatewaySettings`].
#[derive(Args, Debug, Default, Clone)]
pub struct SettingsArgs {
    /// Address the HTTP server binds to
    #[arg(long, env = "LISTEN_ADDR", global = true)]
    pub listen_addr: Option<String>,

    /// Directory holding model definition files
    #[arg(long, env = "CONFIG_PATH", global = true)]
    pub config_path: Option<String>,

    /// Prefix the OpenAI routes are mounted under ("" for the root)
    #[arg(long, env = "ROUTE_PREFIX", global = true)]
    pub route_prefix: Option<String>,

    /// Streaming relay queue depth
    #[arg(long, env = "RELAY_QUEUE_CAPACITY", global = true)]
    pub relay_queue_capacity: Option<usize>,

    /// Backend dial timeout in seconds
    #[arg(long, global = true)]
    pub connect_timeout_secs: Option<u64>,

    /// Model definition poll interval in seconds
    #[arg(long, global = true)]
    pub reload_interval_secs: Option<u64>,

    /// SQLite URL for chat logs and API keys
    #[arg(long, env = "DATABASE_URL", global = true)]
    pub database_url: Option<String>,

    /// Accept requests without an API key
    #[arg(long, global = true)]
    pub no_auth: bool,
}

impl SettingsArgs {
    /// Convert to a partial settings value; unset flags stay `None`.
    pub fn to_settings(&self) -> GatewaySettings {
        GatewaySettings {
            listen_addr: self.listen_addr.clone(),
            config_path: self.config_path.clone(),
            route_prefix: self.route_prefix.clone(),
            relay_queue_capacity: self.relay_queue_capacity,
            connect_timeout_secs: self.connect_timeout_secs,
            reload_interval_secs: self.reload_interval_secs,
            database_url: self.database_url.clone(),
            require_auth: self.no_auth.then_some(false),
            stop_token: None,
        }
    }
}
