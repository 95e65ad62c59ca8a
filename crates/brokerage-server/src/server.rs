//! TCP listener and top-level server wiring.
//!
//! This module:
//! - Lists the configured securities.
//! - Listens on the configured address/port.
//! - Accepts new TCP connections and assigns each a `ClientId`.
//! - Spawns:
//!   - a per-client task to handle I/O,
//!   - a single central engine task that owns the `Brokerage`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use exchange_core::StockExchange;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, RwLock};
use tracing::{error, info, warn};

use crate::brokerage::Brokerage;
use crate::client;
use crate::config::Config;
use crate::engine_task;
use crate::types::{ClientId, ClientRegistry, EngineRx, EngineTx, OutboundRx, OutboundTx};

/// Counter for assigning unique `ClientId`s.
static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

fn next_client_id() -> ClientId {
    let id = NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed);
    ClientId(id)
}

/// Build the brokerage with every configured listing.
pub fn build_brokerage(config: &Config) -> Result<Brokerage> {
    let mut brokerage = Brokerage::new(StockExchange::new());
    for listing in &config.listings {
        brokerage
            .list_security(&listing.symbol, &listing.company_name, listing.price)
            .with_context(|| format!("listing {}", listing.symbol))?;
    }
    Ok(brokerage)
}

/// Run the TCP server with the given configuration.
pub async fn run(config: Config) -> Result<()> {
    let brokerage = build_brokerage(&config)?;

    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, "listening");

    // Shared registry of clients → outbound channels.
    let clients: ClientRegistry = Arc::new(RwLock::new(Default::default()));

    // Channel from clients → engine task.
    let (engine_tx, engine_rx): (EngineTx, EngineRx) = mpsc::unbounded_channel();

    tokio::spawn(engine_task::run_engine_loop(engine_rx, clients.clone(), brokerage));

    loop {
        let (stream, peer_addr) = listener.accept().await.context("accepting connection")?;
        let current_clients = clients.read().await.len();

        if current_clients >= config.max_clients {
            warn!(
                %peer_addr,
                max_clients = config.max_clients,
                "rejecting connection: max_clients reached"
            );
            // Dropping the stream closes it.
            continue;
        }

        let client_id = next_client_id();
        info!(client = %client_id, %peer_addr, "accepted connection");

        let (out_tx, out_rx): (OutboundTx, OutboundRx) = mpsc::unbounded_channel();
        clients.write().await.insert(client_id, out_tx.clone());

        let engine_tx_clone = engine_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = client::run_client(
                client_id,
                stream,
                engine_tx_clone,
                out_tx,
                out_rx,
            )
            .await
            {
                error!(client = %client_id, error = %format!("{e:#}"), "client error");
            }
        });
    }
}
