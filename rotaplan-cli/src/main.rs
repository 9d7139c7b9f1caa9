//! ROTAPLAN CLI - Command-line interface
//!
//! Commands:
//! - generate: Build a lineup from a roster file
//! - formations: List the built-in formation catalog
//! - serve: Start the HTTP API server

mod formations;
mod generate;
mod serve;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rotaplan")]
#[command(about = "ROTAPLAN fair-rotation lineup generator")]
struct Cli {
    /// Random seed for reproducible output
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a lineup from a roster file
    Generate(generate::GenerateArgs),
    /// List the built-in formation catalog
    Formations,
    /// Start the HTTP API server
    Serve(serve::ServeArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate::run(args, cli.seed),
        Commands::Formations => formations::run(),
        Commands::Serve(args) => serve::run(args),
    }
}
