//! Serve command - start the ROTAPLAN HTTP API
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: (delegated to rotaplan-server crate)
//! - Level 4: configuration validation

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use rotaplan_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServeArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing static files for the web front end
    #[arg(long, default_value = "web")]
    pub static_dir: PathBuf,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
pub fn run(args: ServeArgs) -> Result<()> {
    let config = configure_server(&args);

    tracing::info!("Starting ROTAPLAN server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServeArgs) -> ServerConfig {
    if !args.static_dir.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            args.static_dir.display()
        );
    }

    ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
    }
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    // Create tokio runtime for async server
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// TESTS
// ============================================================================
