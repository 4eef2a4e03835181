//! Entry point for the payroll engine HTTP service.
//!
//! Wires the HTTP fact providers into the orchestrator and serves the API.

use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::orchestrator::{FactProviders, PayrollOrchestrator};
use payroll_engine::providers::HttpFactProvider;

/// Payroll computation service
#[derive(Parser)]
#[command(name = "payroll-engine")]
#[command(about = "Computes gross pay, tax, deductions and net pay from upstream payroll facts")]
struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "./config/payroll.yaml")]
    config: String,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let loader = ConfigLoader::load(&args.config).inspect_err(|e| {
        error!(path = %args.config, error = %e, "Failed to load configuration");
    })?;
    let config = loader.config();

    let http = HttpFactProvider::new(config.services.clone(), &config.http)?;
    let orchestrator = PayrollOrchestrator::new(
        FactProviders::from_single(Arc::new(http)),
        config.policy.clone(),
    );
    let router = create_router(AppState::new(orchestrator));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_address).await?;
    info!(address = %config.server.bind_address, "Payroll engine listening");
    axum::serve(listener, router).await?;

    Ok(())
}
