use clap::Subcommand;
use std::path::PathBuf;
use tripwire_breaker::CircuitBreakerConfig;

pub mod config;
pub mod simulate;

use self::simulate::SimulationOptions;

#[derive(Subcommand)]
pub enum Commands {
    /// Drive a breaker against a flaky dependency and print the outcome as JSON
    Simulate {
        /// JSON breaker configuration (defaults are used when omitted)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Name of the simulated dependency
        #[arg(short, long, default_value = "simulated")]
        name: String,

        /// Number of calls to attempt
        #[arg(long, default_value_t = 50)]
        calls: usize,

        /// Probability that a call to the dependency fails
        #[arg(long, default_value_t = 0.5)]
        failure_rate: f64,

        /// Make the dependency healthy after this many invocations
        #[arg(long, value_name = "N")]
        recover_after: Option<usize>,

        /// Pause between calls in milliseconds
        #[arg(long, default_value_t = 10)]
        interval_ms: u64,

        /// Latency of each dependency invocation in milliseconds
        #[arg(long, default_value_t = 1)]
        latency_ms: u64,

        /// Seed for the failure generator
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Print a breaker configuration as JSON
    Config {
        /// Preset to print (default, database, external-api)
        #[arg(long, default_value = "default", value_parser = ["default", "database", "external-api"])]
        preset: String,
    },
}

impl Commands {
    pub async fn execute(self) -> eyre::Result<()> {
        match self {
            Commands::Simulate {
                config: config_path,
                name,
                calls,
                failure_rate,
                recover_after,
                interval_ms,
                latency_ms,
                seed,
            } => {
                let config = match config_path {
                    Some(path) => config::load(&path)?,
                    None => CircuitBreakerConfig::default(),
                };
                let options = SimulationOptions {
                    name,
                    calls,
                    failure_rate,
                    recover_after,
                    interval_ms,
                    latency_ms,
                    seed,
                };
                simulate::run(config, options).await
            }
            Commands::Config { preset } => config::print_preset(&preset),
        }
    }
}
