//! Minimal line client for the brokerage server.
//!
//! Reads commands from stdin, validates them locally, sends them to the
//! server and prints whatever comes back shortly afterwards.

use std::env;
use std::time::Duration;

use anyhow::Result;
use exchange_protocol::parse_command;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

#[tokio::main]
async fn main() -> Result<()> {
    let addr = env::var("BROKERAGE_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:9000".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    let (read_half, mut write_half) = stream.into_split();
    let mut replies = BufReader::new(read_half).lines();
    println!("Connected. Commands look like:");
    println!("  REGISTER, alice, pw");
    println!("  LOGIN, alice, pw");
    println!("  BUY, ABC, 100, 10.00");
    println!("  SELL, ABC, 50, MKT");
    println!("  QUOTE, ABC");
    println!("Type 'quit' or 'exit' to leave.\n");

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = stdin.next_line().await? {
        let trimmed = line.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }

        match parse_command(trimmed) {
            Ok(Some(_)) => {}
            Ok(None) => continue,
            Err(e) => {
                eprintln!("not sent: {e}");
                continue;
            }
        }

        write_half.write_all(trimmed.as_bytes()).await?;
        write_half.write_all(b"\n").await?;

        // Print replies until the server goes quiet.
        while let Ok(reply) = timeout(Duration::from_millis(100), replies.next_line()).await {
            match reply? {
                Some(text) => println!("<< {}", text),
                None => {
                    println!("Server closed the connection.");
                    return Ok(());
                }
            }
        }
    }

    Ok(())
}
