//! Voltage CLI - renders modular synthesis patches to WAV files.

mod commands;
mod patches;
mod wav;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "voltage")]
#[command(author, version, about = "Voltage modular synthesis CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a built-in patch to a WAV file
    Render(commands::render::RenderArgs),

    /// List node types and their inputs
    Nodes(commands::nodes::NodesArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Nodes(args) => commands::nodes::run(args),
    }
}
