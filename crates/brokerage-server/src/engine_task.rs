//! Central engine loop.
//!
//! This task owns the [`Brokerage`] (and through it the exchange) and
//! processes every `EngineRequest` in arrival order, so submissions to
//! the same security are totally ordered and no book is ever touched
//! concurrently.
//!
//! Delivery is fire-and-forget: a client whose channel has closed just
//! misses the line, and matching never waits on it.

use std::collections::HashMap;

use tracing::{debug, info};

use crate::brokerage::{Brokerage, Delivery};
use crate::types::{ClientEvent, ClientId, ClientRegistry, EngineRequest, EngineRx, OutboundTx};

/// Run the central engine processing loop.
///
/// - `engine_rx`: receives requests from all client tasks.
/// - `clients`: registry of connected clients and their outbound channels.
pub async fn run_engine_loop(mut engine_rx: EngineRx, clients: ClientRegistry, mut brokerage: Brokerage) {
    while let Some(req) = engine_rx.recv().await {
        let EngineRequest { client_id, event } = req;

        let deliveries = match event {
            ClientEvent::Command(command) => {
                debug!(client = %client_id, ?command, "processing command");
                brokerage.handle(client_id, command)
            }
            ClientEvent::Disconnected => {
                // Later lines for this trader queue in its mailbox.
                brokerage.disconnect(client_id);
                clients.write().await.remove(&client_id);
                continue;
            }
        };

        if deliveries.is_empty() {
            continue;
        }

        // Snapshot of current clients to minimize lock hold time.
        let current_clients = {
            let guard = clients.read().await;
            guard.clone()
        };

        for delivery in deliveries {
            deliver(delivery, &current_clients);
        }
    }

    info!("engine loop shutting down (engine_rx closed)");
}

fn deliver(delivery: Delivery, clients: &HashMap<ClientId, OutboundTx>) {
    match clients.get(&delivery.client) {
        Some(tx) => {
            let _ = tx.send(delivery.line);
        }
        None => debug!(client = %delivery.client, "client gone, dropping line"),
    }
}
