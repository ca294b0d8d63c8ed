//! Command-line adapter for infergate.
//!
//! `main.rs` parses arguments, installs logging, and dispatches to the
//! handlers here. All infrastructure is wired in the `bootstrap` module.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by the binary only.
use dotenvy as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod commands;
pub mod config;
pub mod error;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliContext, bootstrap, load_registry, open_stores};
pub use commands::{Commands, KeysCommand, ModelsCommand};
pub use config::load_settings;
pub use error::CliError;
pub use parser::{Cli, SettingsArgs};
