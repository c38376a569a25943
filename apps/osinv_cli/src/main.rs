mod query;

use anyhow::Result;
use clap::{Parser, Subcommand};
use osinv_engine::QueryEngine;
use osinv_model::Envelope;
use osinv_providers::{config, DeadlineProvider, SnapshotProvider};
use query::OutputFormat;
use serde_json::Value;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "osinv", about = "Query OpenStack endpoint and service inventory")]
struct Cli {
    /// Inventory snapshot (YAML or JSON); defaults to $OSINV_INVENTORY
    #[arg(long, global = true)]
    inventory: Option<PathBuf>,
    /// Deadline for each provider request; defaults to $OSINV_PROVIDER_TIMEOUT_SECS
    #[arg(long, global = true)]
    timeout_secs: Option<u64>,
    #[arg(long, global = true, default_value_t = OutputFormat::Json, value_enum)]
    format: OutputFormat,
    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true, default_value_t = false)]
    log_json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Retrieve facts about one or more keystone endpoints
    Endpoints(query::EndpointsCmd),
    /// Retrieve facts about one or more keystone services
    Services(query::ServicesCmd),
    /// Retrieve facts about one or more nova services
    ComputeServices(query::ComputeServicesCmd),
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);
    let format = cli.format;

    let succeeded = match run(cli).await {
        Ok(succeeded) => succeeded,
        Err(err) => query::emit(&Envelope::<Value>::failure(format!("{err:#}")), format)?,
    };

    Ok(if succeeded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn init_tracing(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.with_target(false).init();
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let inventory = cli.inventory.unwrap_or_else(config::default_inventory_path);
    let timeout = cli
        .timeout_secs
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
        .unwrap_or_else(config::provider_timeout);

    let snapshot = SnapshotProvider::load(&inventory)?;
    let engine = QueryEngine::new(DeadlineProvider::with_timeout(snapshot, timeout));
    info!("querying inventory {}", inventory.display());

    match cli.command {
        Commands::Endpoints(cmd) => query::endpoints(&engine, cmd, cli.format).await,
        Commands::Services(cmd) => query::services(&engine, cmd, cli.format).await,
        Commands::ComputeServices(cmd) => {
            query::compute_services(&engine, cmd, cli.format).await
        }
    }
}
