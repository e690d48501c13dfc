mod config;
mod delivery;
mod inspector;
mod models;
mod narrator;

use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::info;

use config::{Config, ConfigError};
use delivery::{Console, DeliveryError, DeliveryMode};
use inspector::{InspectionError, Inspector};
use narrator::{GenerationError, Narrator, Provider};

#[derive(Debug, Parser)]
#[command(name = "kube-reporter", version, about = "Kubernetes status report generator")]
struct Cli {
    /// Path to the configuration YAML file
    #[arg(short = 'c', long)]
    config_file: PathBuf,

    /// Report delivery mode
    #[arg(short = 'm', long, value_enum)]
    mode: DeliveryMode,

    /// Path to save the report when mode is `file`
    #[arg(short = 'f', long)]
    file: Option<PathBuf>,

    /// Kubeconfig context to inspect
    #[arg(short = 'C', long)]
    context: String,

    /// Language for the report (e.g. English, Korean)
    #[arg(short = 'L', long)]
    language: String,
}

#[derive(Debug, thiserror::Error)]
enum PipelineError {
    #[error("loading configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("inspecting cluster: {0}")]
    Inspection(#[from] InspectionError),
    #[error("generating report: {0}")]
    Generation(#[from] GenerationError),
    #[error("delivering report: {0}")]
    Delivery(#[from] DeliveryError),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kube_reporter=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), PipelineError> {
    let config = Config::load(&cli.config_file)?;
    let narrator = Narrator::new(Provider::from_config(&config.openai)?);

    info!("inspecting cluster context {}", cli.context);
    let inspector = Inspector::connect(&config.kubernetes.kubeconfig, &cli.context).await?;
    let snapshot = inspector.collect().await?;

    info!("generating report in {}", cli.language);
    let report = narrator.narrate(&snapshot, &cli.language).await?;

    let console = Console::new();
    delivery::dispatch(&report, cli.mode, &config, &console, cli.file.as_deref()).await?;

    Ok(())
}
