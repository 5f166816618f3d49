//! Endpoint health command-line tool

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use endpoint_health::{
    cli::{user_message, Command},
    init_logger_with_config, runtime::run_with_runtime, MonitorConfig, NetworkService,
};
use tracing::{debug, error};

#[derive(Parser)]
#[command(name = "endpoint-health")]
#[command(about = "Track health of indexer, relay, explorer and chat-app endpoints")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Configuration file (defaults to config.yml when present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Endpoint settings file, overrides storage.settings_path
    #[arg(long, global = true)]
    settings: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = MonitorConfig::load_config(cli.config.as_deref())?;
    if let Some(path) = cli.settings {
        config.storage.settings_path = path;
    }
    if cli.verbose {
        config.log_level = "debug".to_string();
    } else if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_logger_with_config(&config.log_level, &config.logging);
    debug!("Loaded configuration: {:?}", config);

    let service = Arc::new(NetworkService::from_config(&config)?);

    let result = run_with_runtime(&config.runtime, cli.command.run(service, &config));
    if let Err(e) = &result {
        error!("{:#}", e);
        if let Some(message) = user_message(e) {
            eprintln!("{}", message);
        }
    }
    result
}
