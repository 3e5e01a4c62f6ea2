//! Command-line interface for schema-proptest
//!
//! # Usage Examples
//!
//! ```bash
//! # Generate ten demo users with the default seed
//! schema-proptest sample
//!
//! # Reproducible run with a config file and a flag override
//! schema-proptest sample --config sampler.yaml --count 3
//!
//! # Show dispatch decisions
//! RUST_LOG=strategy_registry=debug schema-proptest sample --count 1
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use schema_proptest::demo;
use schema_proptest::SampleOpts;
use strategy_registry::Sampler;

#[derive(Parser)]
#[command(name = "schema-proptest")]
#[command(about = "Generate schema-valid test data with proptest strategies")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print generated values of the demo User schema as JSON lines
    Sample {
        #[command(flatten)]
        opts: SampleOpts,

        /// Pretty-print each value
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Sample { opts, pretty } => {
            let config = opts.resolve().context("Failed to load sampler config")?;
            tracing::info!(
                seed = config.seed,
                count = config.count,
                "Sampling demo schema"
            );

            let registry = demo::demo_registry(config.conversion_settings());
            let strategy = registry
                .strategy(&demo::user_schema())
                .context("Failed to build strategy for User schema")?;

            let mut sampler = Sampler::with_config(&config);
            for value in sampler.samples(&strategy, config.count) {
                let value = value.context("Failed to generate value")?;
                let json = if pretty {
                    serde_json::to_string_pretty(&value)?
                } else {
                    serde_json::to_string(&value)?
                };
                println!("{json}");
            }
        }
    }

    Ok(())
}
