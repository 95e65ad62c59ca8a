// crates/exchange-protocol/src/text_codec.rs

//! Text line codec.
//!
//! Input format (lines → [`Command`]), keyword case-insensitive,
//! fields separated by commas and trimmed:
//!
//! - Register a trader:   `REGISTER, name, password`
//! - Log in:              `LOGIN, name, password`
//! - Log out:             `LOGOUT`
//! - List a security:     `LIST, symbol, company name, price`
//! - Limit order:         `BUY, symbol, shares, price` / `SELL, …`
//! - Market order:        `BUY, symbol, shares, MKT` / `SELL, …`
//! - Quote:               `QUOTE, symbol`
//!
//! Output format ([`OutputMessage`] → line):
//!
//! - Ack:    `New order: Buy ABC (Abc Corp) 100 shares at $10.00`
//!           or `… shares at market`
//! - Fill:   `You bought: 100 ABC at 10.00 amt 1000.00`
//!           or `You sold: …`
//! - Quote:  `Abc Corp (ABC) Price: 10.00 hi: 10.50 lo: 9.75 vol: 300 Ask: 10.25 size: 100 Bid: none`
//! - Listed: `Listed ABC (Abc Corp) at 10.00`

use std::str::FromStr;

use exchange_core::{
    format_money, OrderType, OutputMessage, Price, Quote, Shares, Side, TopOrder,
};
use rust_decimal::Decimal;
use thiserror::Error;

/// A parsed client command.
///
/// Commands carry no trader identity; the session layer attaches the
/// logged-in trader before anything reaches the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Register { name: String, password: String },
    Login { name: String, password: String },
    Logout,
    List { symbol: String, company_name: String, price: Price },
    Order { symbol: String, side: Side, order_type: OrderType, shares: Shares },
    Quote { symbol: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    #[error("{command} expects {expected} fields, got {got}")]
    FieldCount {
        command: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("invalid share count: {0}")]
    InvalidShares(String),

    #[error("invalid price: {0}")]
    InvalidPrice(String),

    #[error("empty {0}")]
    EmptyField(&'static str),
}

/// Parse a single line into a [`Command`].
///
/// Returns `Ok(None)` for blank lines or comments (starting with `#`).
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = split_and_trim(trimmed, ',');
    let keyword = tokens[0].to_ascii_uppercase();

    let command = match keyword.as_str() {
        "REGISTER" => {
            let [name, password] = fields::<2>("REGISTER", &tokens)?;
            Command::Register {
                name: non_empty(name, "screen name")?,
                password: password.to_string(),
            }
        }
        "LOGIN" => {
            let [name, password] = fields::<2>("LOGIN", &tokens)?;
            Command::Login {
                name: non_empty(name, "screen name")?,
                password: password.to_string(),
            }
        }
        "LOGOUT" => {
            fields::<0>("LOGOUT", &tokens)?;
            Command::Logout
        }
        "LIST" => {
            let [symbol, company_name, price] = fields::<3>("LIST", &tokens)?;
            Command::List {
                symbol: non_empty(symbol, "symbol")?,
                company_name: non_empty(company_name, "company name")?,
                price: parse_price(price)?,
            }
        }
        "BUY" | "SELL" => parse_order(&keyword, &tokens)?,
        "QUOTE" => {
            let [symbol] = fields::<1>("QUOTE", &tokens)?;
            Command::Quote {
                symbol: non_empty(symbol, "symbol")?,
            }
        }
        _ => return Err(ParseError::UnknownCommand(tokens[0].to_string())),
    };

    Ok(Some(command))
}

fn parse_order(keyword: &str, tokens: &[&str]) -> Result<Command, ParseError> {
    // BUY|SELL, symbol, shares, price|MKT
    let (name, side) = match Side::from_keyword(keyword) {
        Some(Side::Buy) => ("BUY", Side::Buy),
        Some(Side::Sell) => ("SELL", Side::Sell),
        None => return Err(ParseError::UnknownCommand(keyword.to_string())),
    };
    let [symbol, shares, price] = fields::<3>(name, tokens)?;

    let order_type = if price.eq_ignore_ascii_case("MKT") || price.eq_ignore_ascii_case("MARKET") {
        OrderType::Market
    } else {
        OrderType::Limit(parse_price(price)?)
    };

    Ok(Command::Order {
        symbol: non_empty(symbol, "symbol")?,
        side,
        order_type,
        shares: parse_shares(shares)?,
    })
}

/// Render an [`OutputMessage`] as the text a trader sees.
pub fn format_output(msg: &OutputMessage) -> String {
    match msg {
        OutputMessage::Listed(l) => format!(
            "Listed {} ({}) at {}",
            l.symbol,
            l.company_name,
            format_money(l.price)
        ),
        OutputMessage::Ack(a) => {
            let at = match a.order_type {
                OrderType::Market => "market".to_string(),
                OrderType::Limit(price) => format!("${}", format_money(price)),
            };
            format!(
                "New order: {} {} ({}) {} shares at {}",
                a.side.label(),
                a.symbol,
                a.company_name,
                a.shares,
                at
            )
        }
        OutputMessage::Fill(f) => {
            let verb = match f.side {
                Side::Buy => "bought",
                Side::Sell => "sold",
            };
            format!(
                "You {}: {} {} at {} amt {}",
                verb,
                f.shares,
                f.symbol,
                format_money(f.price),
                format_money(f.amount)
            )
        }
        OutputMessage::Quote { quote, .. } => format_quote(quote),
    }
}

/// Render a quote on one line.
pub fn format_quote(q: &Quote) -> String {
    format!(
        "{} ({}) Price: {} hi: {} lo: {} vol: {} Ask: {} Bid: {}",
        q.company_name,
        q.symbol,
        format_money(q.last_price),
        format_money(q.high),
        format_money(q.low),
        q.volume,
        format_top(q.ask.as_ref()),
        format_top(q.bid.as_ref()),
    )
}

// -----------------------------------------------------------------------------
// Helpers
// -----------------------------------------------------------------------------

fn format_top(top: Option<&TopOrder>) -> String {
    match top {
        None => "none".to_string(),
        Some(t) => {
            let price = match t.price() {
                Some(p) => format_money(p),
                None => "market".to_string(),
            };
            format!("{} size: {}", price, t.shares)
        }
    }
}

fn split_and_trim(s: &str, delimiter: char) -> Vec<&str> {
    s.split(delimiter).map(str::trim).collect()
}

/// The `N` fields following the keyword, or a field-count error.
fn fields<'a, const N: usize>(
    command: &'static str,
    tokens: &[&'a str],
) -> Result<[&'a str; N], ParseError> {
    let rest = &tokens[1..];
    <[&'a str; N]>::try_from(rest).map_err(|_| ParseError::FieldCount {
        command,
        expected: N,
        got: rest.len(),
    })
}

fn non_empty(s: &str, what: &'static str) -> Result<String, ParseError> {
    if s.is_empty() {
        Err(ParseError::EmptyField(what))
    } else {
        Ok(s.to_string())
    }
}

fn parse_shares(s: &str) -> Result<Shares, ParseError> {
    match s.parse::<Shares>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ParseError::InvalidShares(s.to_string())),
    }
}

fn parse_price(s: &str) -> Result<Price, ParseError> {
    let digits = s.strip_prefix('$').unwrap_or(s);
    Decimal::from_str(digits).map_err(|_| ParseError::InvalidPrice(s.to_string()))
}
