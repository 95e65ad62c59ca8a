//! Configuration for the brokerage server.
//!
//! Defaults can be overridden via environment variables:
//!
//! - `BROKERAGE_BIND_ADDR`   (default: "0.0.0.0")
//! - `BROKERAGE_PORT`        (default: "9000")
//! - `BROKERAGE_MAX_CLIENTS` (default: "1024")
//! - `BROKERAGE_LISTINGS`    (default: none), securities listed at
//!   startup as `SYMBOL:Company name:price` entries separated by `;`,
//!   e.g. `ABC:Abc Corp:10.00;XYZ:Xyz Inc:4.25`

use std::env;
use std::str::FromStr;

use anyhow::{anyhow, bail, Context, Result};
use exchange_core::ListSecurity;
use rust_decimal::Decimal;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// TCP port to listen on.
    pub port: u16,

    /// Maximum number of simultaneously connected clients.
    pub max_clients: usize,

    /// Securities listed before the first connection is accepted.
    pub listings: Vec<ListSecurity>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 9000,
            max_clients: 1024,
            listings: Vec::new(),
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();
        let bind_addr = env::var("BROKERAGE_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let port = read_env_or_default("BROKERAGE_PORT", defaults.port)?;
        let max_clients = read_env_or_default("BROKERAGE_MAX_CLIENTS", defaults.max_clients)?;
        let listings = match env::var("BROKERAGE_LISTINGS") {
            Ok(entries) => parse_listings(&entries).context("BROKERAGE_LISTINGS")?,
            Err(_) => defaults.listings,
        };

        Ok(Config {
            bind_addr,
            port,
            max_clients,
            listings,
        })
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

/// Parse `SYMBOL:Company name:price` entries separated by `;`.
///
/// Blank entries are skipped.
pub fn parse_listings(entries: &str) -> Result<Vec<ListSecurity>> {
    entries.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(parse_listing)
        .collect()
}

fn parse_listing(entry: &str) -> Result<ListSecurity> {
    let mut parts = entry.splitn(3, ':').map(str::trim);
    let (Some(symbol), Some(company_name), Some(price)) = (parts.next(), parts.next(), parts.next())
    else {
        bail!("expected SYMBOL:Company name:price, got {entry:?}");
    };
    if symbol.is_empty() || company_name.is_empty() {
        bail!("empty symbol or company name in {entry:?}");
    }
    let price = Decimal::from_str(price)
        .map_err(|e| anyhow!("invalid price {price:?} for {symbol}: {e}"))?;

    Ok(ListSecurity {
        symbol: symbol.to_string(),
        company_name: company_name.to_string(),
        price,
    })
}

fn read_env_or_default<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(val) => val
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {val:?}")),
        Err(_) => Ok(default),
    }
}
