//! Endpoint management commands

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use tracing::{info, warn};

use crate::config::MonitorConfig;
use crate::error::Error;
use crate::models::{Category, EndpointRecord, Settings};
use crate::network::Network;
use crate::service::NetworkService;
use crate::utils::format_timestamp;

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run one health check cycle and print the result
    Check(CheckArgs),

    /// List stored endpoints
    List(ListArgs),

    /// Print the endpoint currently selected for a category
    Primary(PrimaryArgs),

    /// Mark the endpoint serving a host as offline
    Demote(DemoteArgs),

    /// Run health checks periodically until interrupted
    Watch(WatchArgs),

    /// Show or choose the active network
    Network(NetworkArgs),
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Probe every endpoint regardless of when it was last checked
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only list this category
    #[arg(value_enum)]
    pub category: Option<Category>,
}

#[derive(Debug, Args)]
pub struct PrimaryArgs {
    #[arg(value_enum)]
    pub category: Category,
}

#[derive(Debug, Args)]
pub struct DemoteArgs {
    /// Host name, matched case-insensitively
    pub host: String,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between cycles (defaults to health.watch_interval_secs)
    #[arg(long)]
    pub interval: Option<u64>,
}

#[derive(Debug, Args)]
pub struct NetworkArgs {
    /// URL the client is served from, used as a hint
    #[arg(long, default_value = "")]
    pub url: String,

    /// Store this network, replacing any previous choice
    #[arg(long)]
    pub set: Option<String>,
}

impl Command {
    pub async fn run(self, service: Arc<NetworkService>, config: &MonitorConfig) -> Result<()> {
        match self {
            Command::Check(args) => {
                let report = service
                    .check_services(args.force)
                    .await
                    .context("Health check cycle failed")?;
                info!(
                    "Probed {} endpoint(s), {} changed, persisted: {}",
                    report.probed,
                    report.changed.len(),
                    report.persisted
                );
                print_settings(&service.settings()?, None);
            }
            Command::List(args) => {
                let settings = service.settings()?;
                if settings.is_empty() {
                    println!("No endpoints configured");
                    return Ok(());
                }
                print_settings(&settings, args.category);
            }
            Command::Primary(args) => {
                let record = service.primary(args.category)?;
                println!("{}", format_record(&record, args.category));
            }
            Command::Demote(args) => match service.demote_host(&args.host)? {
                Some(url) => println!("Marked {} as offline", url),
                None => println!("No online endpoint matches host {}", args.host),
            },
            Command::Watch(args) => {
                let secs = args.interval.unwrap_or(config.health.watch_interval_secs).max(1);
                let checker = service.checker().clone();
                checker
                    .watch(Duration::from_secs(secs), async {
                        if let Err(e) = tokio::signal::ctrl_c().await {
                            warn!(error = %e, "Failed to listen for ctrl-c");
                        }
                    })
                    .await;
            }
            Command::Network(args) => {
                let network = match args.set {
                    Some(name) => {
                        let network: Network = name.parse()?;
                        service.set_network(network)?;
                        network
                    }
                    None => service.check_and_set_network(&args.url, config.network.as_deref())?,
                };
                println!("{}", network);
            }
        }

        Ok(())
    }
}

/// End-user hint for a failed command, when the cause is a classified network error
pub fn user_message(err: &anyhow::Error) -> Option<String> {
    err.downcast_ref::<Error>()
        .and_then(Error::as_network)
        .map(|network| network.user_message())
}

fn print_settings(settings: &Settings, only: Option<Category>) {
    let categories: Vec<Category> = match only {
        Some(category) => vec![category],
        None => Category::ALL.to_vec(),
    };

    for category in categories {
        let endpoints = settings.endpoints(category);
        println!("{} ({}):", category.label(), endpoints.len());
        for record in endpoints {
            println!("  {}", format_record(record, category));
        }
    }
}

fn format_record(record: &EndpointRecord, category: Category) -> String {
    let mut line = record.url.clone();
    if record.is_primary {
        line.push_str(" [primary]");
    }
    if category.has_status() {
        let checked = record
            .last_check
            .map(format_timestamp)
            .unwrap_or_else(|| "never".to_string());
        line.push_str(&format!(" {} (checked {})", record.status, checked));
    }
    if !record.name.is_empty() {
        line.push_str(&format!(" \"{}\"", record.name));
    }
    line
}
