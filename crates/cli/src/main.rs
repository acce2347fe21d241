use clap::Parser;

mod commands;

use commands::Commands;

#[derive(Parser)]
#[command(name = "tripwire")]
#[command(about = "Exercise the tripwire circuit breaker against a simulated dependency", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    color_eyre::install()?;

    tripwire_core::tracing::init().map_err(|e| eyre::eyre!("failed to initialize tracing: {e}"))?;

    let cli = Cli::parse();
    cli.command.execute().await
}
