//! Tokenbook Simulator
//!
//! Test environment for exercising the token ledger with scripted
//! scenarios or generated transfer traffic.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod accounts;
mod controller;
mod metrics;
mod scenario;

use controller::SimulationController;
use scenario::Scenario;
use tokenbook_ledger::TokenConfig;

/// Tokenbook Simulator CLI
#[derive(Parser, Debug)]
#[command(name = "simulator")]
#[command(about = "Tokenbook test and simulation environment")]
struct Args {
    /// Number of simulated accounts besides the owner
    #[arg(short, long, default_value = "3")]
    accounts: usize,

    /// Built-in scenario to run
    #[arg(short, long)]
    scenario: Option<String>,

    /// JSON scenario file to run
    #[arg(long)]
    scenario_file: Option<PathBuf>,

    /// Simulation speed multiplier
    #[arg(long, default_value = "1.0")]
    speed: f64,

    /// Random seed for reproducibility
    #[arg(long)]
    seed: Option<u64>,

    /// Run duration in seconds (0 = until Ctrl+C)
    #[arg(long, default_value = "0")]
    duration: u64,

    /// Print the event journal as JSON after the run
    #[arg(long)]
    dump_events: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = TokenConfig::from_env();
    if let Err(e) = config.validate() {
        error!("Invalid token configuration: {}", e);
        return Err(anyhow::anyhow!("Invalid token configuration: {}", e));
    }

    info!("Starting Tokenbook Simulator");
    info!("Token: {} ({})", config.name, config.symbol);
    info!("Accounts: {}", args.accounts);
    info!("Speed: {}x", args.speed);

    let mut controller =
        SimulationController::new(config, args.accounts, args.speed, args.seed)?;

    if let Some(path) = &args.scenario_file {
        let scenario = Scenario::from_file(path)?;
        info!("Running scenario from {}: {}", path.display(), scenario.name);
        controller.run_scenario(scenario).await?;
    } else if let Some(scenario_name) = &args.scenario {
        info!("Running scenario: {}", scenario_name);

        let scenario = Scenario::load(scenario_name)?;
        controller.run_scenario(scenario).await?;
    } else {
        info!("Running in continuous mode");
        info!("Press Ctrl+C to stop");

        controller.initialize()?;

        let duration = if args.duration > 0 {
            Some(std::time::Duration::from_secs(args.duration))
        } else {
            None
        };

        controller.run(duration).await?;
    }

    let metrics = controller.metrics();
    info!("Simulation complete");
    info!("Total operations: {}", metrics.total_operations);
    info!("Applied: {}", metrics.applied_operations);
    info!("Rejected: {}", metrics.rejected_operations);
    info!("Success rate: {:.2}%", metrics.success_rate() * 100.0);
    for (code, count) in metrics.rejections_by_code() {
        info!("  {}: {}", code, count);
    }

    info!("Final holdings:");
    for (label, address) in controller.accounts().accounts() {
        let balance = controller.ledger().balance_of(address);
        info!("  {} ({}): {}", label, address, balance);
    }

    if args.dump_events {
        let json = serde_json::to_string_pretty(controller.ledger().journal().records())?;
        println!("{}", json);
    }

    Ok(())
}
