//! SafeTrade brokerage server.

use anyhow::Result;
use brokerage_server::config::Config;
use brokerage_server::server;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "brokerage-server")]
#[clap(about = "SafeTrade brokerage: trader sessions in front of a stock exchange")]
struct Cli {
    /// Address to bind (overrides BROKERAGE_BIND_ADDR)
    #[clap(short, long)]
    bind: Option<String>,

    /// Port to listen on (overrides BROKERAGE_PORT)
    #[clap(short, long)]
    port: Option<u16>,

    /// Maximum connected clients (overrides BROKERAGE_MAX_CLIENTS)
    #[clap(short, long)]
    max_clients: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::from_env()?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(max_clients) = cli.max_clients {
        config.max_clients = max_clients;
    }

    info!(
        addr = %config.socket_addr_string(),
        max_clients = config.max_clients,
        listings = config.listings.len(),
        "starting brokerage-server"
    );

    server::run(config).await
}
