//! Run the ROTAPLAN server with default configuration

use rotaplan_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    run_server(ServerConfig::default()).await
}
