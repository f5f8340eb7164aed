//! Verity CLI - research health influencers and score their claims.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use verity_cli::commands;
use verity_cli::{Cli, CliError, Command, Config, Formatter};
use verity_llm::PerplexityProvider;
use verity_store::SqliteStore;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> verity_cli::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => Config::path()?,
    };
    let mut config = Config::load_from(&config_path)?;

    let format = cli.format.map(Into::into).unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Config(args) => {
            commands::execute_config(args, &mut config, &config_path, &formatter)?;
        }
        Command::Leaderboard(args) => {
            let store = open_store(cli.database, &config)?;
            commands::execute_leaderboard(args, &store, &formatter)?;
        }
        Command::Show(args) => {
            let store = open_store(cli.database, &config)?;
            commands::execute_show(args, &store, &formatter)?;
        }
        Command::Find(args) => {
            let provider = build_provider(cli.api_key, &config)?;
            let mut store = open_store(cli.database, &config)?;
            commands::execute_find(args, provider, &config, &mut store, &formatter).await?;
        }
        Command::Discover(args) => {
            let provider = build_provider(cli.api_key, &config)?;
            let mut store = open_store(cli.database, &config)?;
            commands::execute_discover(args, provider, &config, &mut store, &formatter).await?;
        }
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .init();
}

fn build_provider(api_key: Option<String>, config: &Config) -> verity_cli::Result<PerplexityProvider> {
    let key = api_key
        .or_else(|| config.api.api_key.clone())
        .ok_or(CliError::MissingApiKey)?;

    Ok(PerplexityProvider::new(key, config.api.model.clone())?
        .with_endpoint(config.api.endpoint.clone())
        .with_timeout(Duration::from_secs(config.api.timeout_secs)))
}

fn open_store(database: Option<PathBuf>, config: &Config) -> verity_cli::Result<SqliteStore> {
    let path = match database {
        Some(path) => path,
        None => config.database_path()?,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    tracing::debug!(path = %path.display(), "Opening database");
    Ok(SqliteStore::new(&path)?)
}
