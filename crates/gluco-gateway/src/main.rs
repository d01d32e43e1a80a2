//! Glucocast - glucose forecasting service entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gluco_gateway::artifacts::{load_forecaster, ArtifactPaths};
use gluco_gateway::config::{AppConfig, CONFIG_ENV};
use gluco_gateway::server;

/// Glucose forecasting service
#[derive(Parser, Debug)]
#[command(name = "glucocast")]
#[command(version)]
#[command(about = "Serves 10-step glucose forecasts from a pre-trained sequence model", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "glucocast.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Listen address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Directory holding the model and scaler artifacts
    #[arg(short, long)]
    artifacts_dir: Option<PathBuf>,
}

/// Resolve configuration; also returns the file it was read from, if any
fn load_config(args: &Args) -> anyhow::Result<(AppConfig, Option<PathBuf>)> {
    let source = if args.config.exists() {
        Some(args.config.clone())
    } else {
        std::env::var_os(CONFIG_ENV).map(PathBuf::from)
    };
    let mut config = match &source {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    config.apply_env_overrides()?;
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(dir) = &args.artifacts_dir {
        config.artifacts.dir = Some(dir.clone());
    }

    Ok((config, source))
}

fn init_logging(verbose: bool, level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(level)
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let (config, source) = load_config(&args).context("invalid configuration")?;
    init_logging(args.verbose, &config.log_level);

    tracing::info!("Starting {} v{}", config.name, env!("CARGO_PKG_VERSION"));
    match source {
        Some(path) => tracing::info!("Configuration loaded from {}", path.display()),
        None => tracing::warn!("Config file not found, using defaults"),
    }

    let paths = ArtifactPaths::resolve(&config.artifacts)?;
    let forecaster = match load_forecaster(&paths) {
        Ok(forecaster) => forecaster,
        Err(e) => {
            tracing::error!("Refusing to start: {}", e);
            return Err(e).context("failed to load model artifacts");
        }
    };

    server::run(&config, forecaster).await?;

    tracing::info!("Glucocast shutdown complete");
    Ok(())
}
