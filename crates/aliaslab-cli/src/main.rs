//! aliaslab CLI - aliasing experiments on tanh waveshaping.

mod commands;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aliaslab")]
#[command(author, version, about = "Aliasing analysis for tanh waveshaping", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare naive tanh with antiderivative antialiasing on a test tone
    Adaa(commands::adaa::AdaaArgs),

    /// Fit a memory lookup table to tanh
    Train(commands::train::TrainArgs),

    /// List the strongest spectral peaks of a distorted test tone
    Spectrum(commands::spectrum::SpectrumArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Adaa(args) => commands::adaa::run(args),
        Commands::Train(args) => commands::train::run(args),
        Commands::Spectrum(args) => commands::spectrum::run(args),
    }
}
