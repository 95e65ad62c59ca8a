//! Shared types for the brokerage server.
//!
//! This module defines:
//! - `ClientId`: a lightweight handle for connected clients
//! - channel aliases between clients and the engine loop
//! - `EngineRequest`: events flowing from clients to the engine

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use exchange_protocol::Command;
use tokio::sync::mpsc;
use tokio::sync::RwLock;

/// Identifier for a connected client.
///
/// Opaque; unique over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client#{}", self.0)
    }
}

/// Outbound text lines from the engine to a given client.
pub type OutboundTx = mpsc::UnboundedSender<String>;
pub type OutboundRx = mpsc::UnboundedReceiver<String>;

/// Registry of connected clients and their outbound channels.
pub type ClientRegistry = Arc<RwLock<HashMap<ClientId, OutboundTx>>>;

/// What a client task reports to the engine task.
#[derive(Debug)]
pub enum ClientEvent {
    /// A parsed command line.
    Command(Command),

    /// The connection closed; any session on it ends.
    Disconnected,
}

/// Message flowing from a client task into the central engine task.
#[derive(Debug)]
pub struct EngineRequest {
    pub client_id: ClientId,
    pub event: ClientEvent,
}

/// Channel from clients → engine task.
pub type EngineTx = mpsc::UnboundedSender<EngineRequest>;
pub type EngineRx = mpsc::UnboundedReceiver<EngineRequest>;
