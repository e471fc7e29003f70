//! Cadenza CLI - Offline renderer for the cadenza synthesizer.

mod commands;
mod notes;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cadenza")]
#[command(author, version, about = "Cadenza polyphonic synthesizer CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render notes through the synth to a WAV file
    Render(commands::render::RenderArgs),

    /// List synth parameters and their ranges
    Params(commands::params::ParamsArgs),

    /// Validate a patch file
    Check(commands::check::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Params(args) => commands::params::run(args),
        Commands::Check(args) => commands::check::run(args),
    }
}
