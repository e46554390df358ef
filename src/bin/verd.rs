//! verd — run a life-path simulation from the command line.
//!
//! Reads the API key from `OPENROUTER_API_KEY` when present; without one
//! the engine runs entirely on the procedural generator.

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use verdandi::{Mode, SimulatorConfig, Verdandi};

/// Verdandi life-path simulator.
#[derive(Parser)]
#[command(name = "verd")]
#[command(version)]
#[command(about = "Generate alternate life path branches for a decision")]
struct Args {
    /// The decision to simulate, e.g. "What if I moved to Lisbon?".
    decision: String,

    /// Simulation mode: realistic, 50/50, or random.
    #[arg(short, long, default_value = "realistic")]
    mode: Mode,

    /// Number of branches to generate.
    #[arg(short, long, default_value_t = 4)]
    branches: usize,

    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Sqlite file to persist the result into.
    #[arg(long)]
    db: Option<std::path::PathBuf>,

    /// Print limiter, cache, and usage statistics after the run.
    #[arg(long)]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => SimulatorConfig::load(Some(path))?,
        None => SimulatorConfig::load(None).unwrap_or_default(),
    };

    let mut builder = Verdandi::builder().config(config);
    if let Some(key) = verdandi::config::env_api_key() {
        builder = builder.openrouter(key);
    } else {
        info!("no API key configured, branches will be procedural");
    }
    if let Some(ref db) = args.db {
        builder = builder.store_path(db.clone());
    }

    let engine = builder.build()?;

    let result = engine
        .simulate(&args.decision, args.mode, args.branches)
        .await?;

    if args.db.is_some() {
        let id = engine.save(&result)?;
        info!(id = %id, "simulation saved");
    }

    println!("{}", serde_json::to_string_pretty(&result)?);

    if args.stats {
        let governor = engine.governor();
        eprintln!(
            "limiter: {}",
            serde_json::to_string(&governor.limiter().status())?
        );
        eprintln!(
            "cache:   {}",
            serde_json::to_string(&governor.cache().stats())?
        );
        eprintln!(
            "usage:   {}",
            serde_json::to_string(&governor.monitor().stats())?
        );
    }

    Ok(())
}
