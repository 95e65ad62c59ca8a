//! Per-connection I/O.
//!
//! Each connection gets a reader that parses command lines and forwards
//! them to the engine task, and a writer task that drains the client's
//! outbound channel onto the socket, one line per message.

use anyhow::{Context, Result};
use exchange_protocol::parse_command;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::types::{
    ClientEvent, ClientId, EngineRequest, EngineTx, OutboundRx, OutboundTx,
};

/// Run the client I/O loop for a single connection.
pub async fn run_client(
    client_id: ClientId,
    stream: TcpStream,
    engine_tx: EngineTx,
    out_tx: OutboundTx,
    out_rx: OutboundRx,
) -> Result<()> {
    let (read_stream, write_stream) = stream.into_split();

    // The writer ends once every sender for this client is dropped.
    tokio::spawn(run_writer(client_id, write_stream, out_rx));

    let result = run_reader(client_id, read_stream, &engine_tx, &out_tx).await;

    // The engine task ends the session, then drops the registry entry.
    let _ = engine_tx.send(EngineRequest {
        client_id,
        event: ClientEvent::Disconnected,
    });

    result
}

async fn run_reader(
    client_id: ClientId,
    read_stream: OwnedReadHalf,
    engine_tx: &EngineTx,
    out_tx: &OutboundTx,
) -> Result<()> {
    let mut lines = BufReader::new(read_stream).lines();

    while let Some(line) = lines
        .next_line()
        .await
        .with_context(|| format!("{client_id} read error"))?
    {
        debug!(client = %client_id, line = line.trim(), "received");

        match parse_command(&line) {
            Ok(Some(command)) => {
                let req = EngineRequest {
                    client_id,
                    event: ClientEvent::Command(command),
                };
                if engine_tx.send(req).is_err() {
                    warn!("engine channel closed");
                    break;
                }
            }
            Ok(None) => {}
            Err(err) => {
                warn!(client = %client_id, %err, "invalid command");
                let _ = out_tx.send(format!("error: {err}"));
            }
        }
    }

    info!(client = %client_id, "disconnected");
    Ok(())
}

async fn run_writer(client_id: ClientId, mut write_stream: OwnedWriteHalf, mut out_rx: OutboundRx) {
    while let Some(line) = out_rx.recv().await {
        if let Err(e) = write_line(&mut write_stream, &line).await {
            warn!(client = %client_id, error = %e, "write error");
            break;
        }
    }
}

async fn write_line(stream: &mut OwnedWriteHalf, line: &str) -> Result<()> {
    stream.write_all(line.as_bytes()).await?;
    stream.write_all(b"\n").await?;
    stream.flush().await?;
    Ok(())
}
