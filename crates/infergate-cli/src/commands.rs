//! Subcommands.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the gateway until interrupted
    Serve,

    /// Manage API keys
    #[command(subcommand)]
    Keys(KeysCommand),

    /// Inspect model definitions
    #[command(subcommand)]
    Models(ModelsCommand),
}

#[derive(Subcommand, Debug)]
pub enum KeysCommand {
    /// Issue a new API key for a user. The key is printed once.
    Create {
        /// Username the key belongs to
        username: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModelsCommand {
    /// List the models defined in the config directory
    List,
}
