//! Crossing Simulation CLI
//!
//! # Usage
//!
//! ```bash
//! # Classic run: 10 cars each way, 5 pedestrians, unbounded waves
//! cargo run --bin crossing-sim --release -- run
//!
//! # Heavy traffic with capped waves, 100x faster, JSON summary
//! cargo run --bin crossing-sim --release -- run --preset capped --time-scale 0.01 --json
//!
//! # Print the effective configuration
//! cargo run --bin crossing-sim --release -- show-config --config bridge.yaml
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossing_sim::{Preset, SimConfig, Simulation};
use std::path::PathBuf;
use tracing::error;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "crossing-sim")]
#[command(about = "Single-lane crossing shared by two car directions and pedestrians", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation
    Run {
        #[command(flatten)]
        source: ConfigSource,

        /// RNG seed (random when omitted)
        #[arg(long)]
        seed: Option<u64>,

        /// Multiplier for every sampled delay
        #[arg(long)]
        time_scale: Option<f64>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as YAML
    ShowConfig {
        #[command(flatten)]
        source: ConfigSource,
    },
}

#[derive(clap::Args)]
struct ConfigSource {
    /// Base preset (classic, capped, quick)
    #[arg(short, long, default_value = "classic")]
    preset: String,

    /// YAML configuration file (takes precedence over --preset)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ConfigSource {
    fn load(&self) -> anyhow::Result<SimConfig> {
        match &self.config {
            Some(path) => SimConfig::from_yaml(path)
                .with_context(|| format!("loading {}", path.display())),
            None => {
                let preset = Preset::from_str(&self.preset).map_err(anyhow::Error::msg)?;
                Ok(SimConfig::preset(preset))
            }
        }
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_names(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Commands::Run {
            source,
            seed,
            time_scale,
            json,
        } => run_simulation(source, seed, time_scale, json)?,
        Commands::ShowConfig { source } => {
            let config = source.load()?;
            print!("{}", config.to_yaml()?);
        }
    }

    Ok(())
}

fn run_simulation(
    source: ConfigSource,
    seed: Option<u64>,
    time_scale: Option<f64>,
    json: bool,
) -> anyhow::Result<()> {
    let mut config = source.load()?;
    if let Some(seed) = seed {
        config = config.seed(seed);
    }
    if let Some(scale) = time_scale {
        config = config.time_scale(scale);
    }

    let report = Simulation::new(config)
        .and_then(|sim| sim.run())
        .map_err(|e| {
            error!("Simulation aborted ({} error): {}", e.category(), e);
            e
        })?;

    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }
    Ok(())
}
