//! `infergate` entry point.

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use infergate_cli::{
    Cli, CliError, Commands, KeysCommand, ModelsCommand, bootstrap, handlers, load_registry,
    load_settings, open_stores,
};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let settings = load_settings(cli.config.as_deref(), &cli.settings.to_settings())?;

    match cli.command {
        Commands::Serve => {
            let ctx = bootstrap(settings).await?;
            handlers::serve::execute(ctx).await
        }
        Commands::Keys(KeysCommand::Create { username }) => {
            let stores = open_stores(&settings).await?;
            handlers::keys::execute_create(stores.api_keys.as_ref(), &username).await
        }
        Commands::Models(ModelsCommand::List) => {
            let registry = load_registry(&settings)?;
            handlers::models::execute_list(registry.as_ref());
            Ok(())
        }
    }
}
