//! Brokerage: trader registry, sessions, and mailboxes in front of the
//! exchange.
//!
//! The brokerage owns the [`StockExchange`] and every [`Trader`]. Orders
//! and quote requests arrive as parsed [`Command`]s on a client
//! connection; the brokerage attaches the logged-in trader's
//! [`TraderId`], forwards the request, and turns each resulting
//! [`OutputMessage`] into text in the addressed trader's mailbox.
//! Mailboxes of traders with an open session are flushed immediately;
//! the rest wait for the next login.
//!
//! Everything here is synchronous and returns the lines to send as
//! [`Delivery`] values, so the engine task decides how to ship them.

use std::collections::{BTreeMap, HashMap, VecDeque};

use exchange_core::{
    ExchangeError, InputMessage, NewOrder, OrderType, OutputMessage, Price, QuoteQuery, Shares,
    Side, StockExchange, TraderId,
};
use exchange_protocol::{format_output, Command};
use thiserror::Error;
use tracing::{debug, info};

use crate::types::ClientId;

/// Greeting queued for a trader whose mailbox is empty at login.
pub const WELCOME: &str = "Welcome to SafeTrade!";

const SCREEN_NAME_LEN: std::ops::RangeInclusive<usize> = 4..=10;
const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 2..=10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BrokerageError {
    #[error("screen name must be 4 to 10 characters")]
    InvalidScreenName,

    #[error("password must be 2 to 10 characters")]
    InvalidPassword,

    #[error("screen name already taken: {0}")]
    ScreenNameTaken(String),

    #[error("no such trader: {0}")]
    UnknownTrader(String),

    #[error("wrong password")]
    WrongPassword,

    #[error("{0} is already logged in")]
    AlreadyLoggedIn(String),

    #[error("this connection is already logged in as {0}")]
    SessionOpen(String),

    #[error("not logged in")]
    NotLoggedIn,

    #[error(transparent)]
    Exchange(#[from] ExchangeError),
}

pub type Result<T> = std::result::Result<T, BrokerageError>;

/// A line of text bound for one client connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub client: ClientId,
    pub line: String,
}

impl Delivery {
    pub fn new(client: ClientId, line: impl Into<String>) -> Self {
        Delivery {
            client,
            line: line.into(),
        }
    }
}

/// A registered trader.
#[derive(Debug, Clone)]
pub struct Trader {
    id: TraderId,
    screen_name: String,
    password: String,

    /// Messages not yet shown to the trader, oldest first.
    mailbox: VecDeque<String>,

    /// Connection the trader is logged in on.
    session: Option<ClientId>,
}

impl Trader {
    pub fn id(&self) -> TraderId {
        self.id
    }

    pub fn screen_name(&self) -> &str {
        &self.screen_name
    }

    pub fn has_messages(&self) -> bool {
        !self.mailbox.is_empty()
    }

    pub fn mailbox(&self) -> impl Iterator<Item = &str> {
        self.mailbox.iter().map(String::as_str)
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }
}

#[derive(Debug, Default)]
pub struct Brokerage {
    exchange: StockExchange,

    /// Traders keyed by lowercased screen name.
    traders: BTreeMap<String, Trader>,

    /// Trader handle → registry key.
    keys: HashMap<TraderId, String>,

    /// Open sessions by connection.
    sessions: HashMap<ClientId, TraderId>,

    next_trader_id: u64,
}

impl Brokerage {
    pub fn new(exchange: StockExchange) -> Self {
        Brokerage {
            exchange,
            ..Brokerage::default()
        }
    }

    pub fn exchange(&self) -> &StockExchange {
        &self.exchange
    }

    /// Look up a trader by screen name, case-insensitively.
    pub fn trader(&self, screen_name: &str) -> Option<&Trader> {
        self.traders.get(&screen_name.to_lowercase())
    }

    /// Trader logged in on `client`, if any.
    pub fn session(&self, client: ClientId) -> Option<&Trader> {
        let id = self.sessions.get(&client)?;
        self.trader_by_id(*id)
    }

    /// List a security on the underlying exchange.
    pub fn list_security(&mut self, symbol: &str, company_name: &str, price: Price) -> Result<()> {
        Ok(self.exchange.list_security(symbol, company_name, price)?)
    }

    /// Register a new trader. The trader is not logged in.
    pub fn add_user(&mut self, screen_name: &str, password: &str) -> Result<TraderId> {
        if !SCREEN_NAME_LEN.contains(&screen_name.chars().count()) {
            return Err(BrokerageError::InvalidScreenName);
        }
        if !PASSWORD_LEN.contains(&password.chars().count()) {
            return Err(BrokerageError::InvalidPassword);
        }
        let key = screen_name.to_lowercase();
        if self.traders.contains_key(&key) {
            return Err(BrokerageError::ScreenNameTaken(screen_name.to_string()));
        }

        self.next_trader_id += 1;
        let id = TraderId(self.next_trader_id);
        self.traders.insert(
            key.clone(),
            Trader {
                id,
                screen_name: screen_name.to_string(),
                password: password.to_string(),
                mailbox: VecDeque::new(),
                session: None,
            },
        );
        self.keys.insert(id, key);

        info!(screen_name, trader = %id, "registered trader");
        Ok(id)
    }

    /// Open a session for `screen_name` on `client` and flush its mailbox.
    ///
    /// A trader with no pending messages is greeted with [`WELCOME`].
    pub fn login(&mut self, client: ClientId, screen_name: &str, password: &str) -> Result<Vec<Delivery>> {
        if let Some(current) = self.session(client) {
            return Err(BrokerageError::SessionOpen(current.screen_name.clone()));
        }
        let trader = self
            .traders
            .get_mut(&screen_name.to_lowercase())
            .ok_or_else(|| BrokerageError::UnknownTrader(screen_name.to_string()))?;
        if trader.password != password {
            return Err(BrokerageError::WrongPassword);
        }
        if trader.session.is_some() {
            return Err(BrokerageError::AlreadyLoggedIn(trader.screen_name.clone()));
        }

        if trader.mailbox.is_empty() {
            trader.mailbox.push_back(WELCOME.to_string());
        }
        trader.session = Some(client);
        let id = trader.id;
        self.sessions.insert(client, id);

        info!(%client, trader = %id, "logged in");
        Ok(self.flush_mailbox(id))
    }

    /// Close the session on `client`. Later messages wait in the mailbox.
    pub fn logout(&mut self, client: ClientId) -> Result<TraderId> {
        let id = self
            .sessions
            .remove(&client)
            .ok_or(BrokerageError::NotLoggedIn)?;
        if let Some(trader) = self.trader_by_id_mut(id) {
            trader.session = None;
        }
        info!(%client, trader = %id, "logged out");
        Ok(id)
    }

    /// The connection on `client` went away.
    pub fn disconnect(&mut self, client: ClientId) {
        // A connection without a session has nothing to close.
        let _ = self.logout(client);
    }

    /// Put `text` in the trader's mailbox and flush it if the trader is
    /// logged in. Messages for unknown traders are dropped.
    pub fn receive_message(&mut self, trader: TraderId, text: impl Into<String>) -> Vec<Delivery> {
        match self.trader_by_id_mut(trader) {
            Some(t) => t.mailbox.push_back(text.into()),
            None => {
                debug!(%trader, "dropping message for unknown trader");
                return Vec::new();
            }
        }
        self.flush_mailbox(trader)
    }

    /// Run one command on behalf of `client`.
    ///
    /// Failures are reported back to `client` as `error: …` lines.
    pub fn handle(&mut self, client: ClientId, command: Command) -> Vec<Delivery> {
        self.try_handle(client, command)
            .unwrap_or_else(|e| vec![Delivery::new(client, format!("error: {e}"))])
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn try_handle(&mut self, client: ClientId, command: Command) -> Result<Vec<Delivery>> {
        match command {
            Command::Register { name, password } => {
                self.add_user(&name, &password)?;
                Ok(vec![Delivery::new(client, format!("Registered {name}"))])
            }
            Command::Login { name, password } => self.login(client, &name, &password),
            Command::Logout => {
                let id = self.logout(client)?;
                let name = self
                    .trader_by_id(id)
                    .map(|t| t.screen_name.clone())
                    .unwrap_or_default();
                Ok(vec![Delivery::new(client, format!("Goodbye, {name}"))])
            }
            Command::List {
                symbol,
                company_name,
                price,
            } => {
                let outputs = self.exchange.process_message(InputMessage::ListSecurity(
                    exchange_core::ListSecurity {
                        symbol,
                        company_name,
                        price,
                    },
                ))?;
                Ok(self.route(client, &outputs))
            }
            Command::Order {
                symbol,
                side,
                order_type,
                shares,
            } => self.place_order(client, symbol, side, order_type, shares),
            Command::Quote { symbol } => {
                let trader = self.logged_in(client)?;
                let outputs = self
                    .exchange
                    .process_message(InputMessage::QueryQuote(QuoteQuery { trader, symbol }))?;
                Ok(self.route(client, &outputs))
            }
        }
    }

    fn place_order(
        &mut self,
        client: ClientId,
        symbol: String,
        side: Side,
        order_type: OrderType,
        shares: Shares,
    ) -> Result<Vec<Delivery>> {
        let trader = self.logged_in(client)?;
        let outputs = self.exchange.process_message(InputMessage::NewOrder(NewOrder {
            trader,
            symbol,
            side,
            order_type,
            shares,
        }))?;
        Ok(self.route(client, &outputs))
    }

    /// Deliver exchange outputs: addressed ones through mailboxes, the
    /// rest straight back to `client`.
    fn route(&mut self, client: ClientId, outputs: &[OutputMessage]) -> Vec<Delivery> {
        let mut deliveries = Vec::new();
        for out in outputs {
            let text = format_output(out);
            match out.recipient() {
                Some(trader) => deliveries.extend(self.receive_message(trader, text)),
                None => deliveries.push(Delivery::new(client, text)),
            }
        }
        deliveries
    }

    fn logged_in(&self, client: ClientId) -> Result<TraderId> {
        self.sessions
            .get(&client)
            .copied()
            .ok_or(BrokerageError::NotLoggedIn)
    }

    fn flush_mailbox(&mut self, trader: TraderId) -> Vec<Delivery> {
        match self.trader_by_id_mut(trader) {
            Some(Trader {
                session: Some(client),
                mailbox,
                ..
            }) => {
                let client = *client;
                mailbox
                    .drain(..)
                    .map(|line| Delivery::new(client, line))
                    .collect()
            }
            _ => Vec::new(),
        }
    }

    fn trader_by_id(&self, id: TraderId) -> Option<&Trader> {
        self.keys.get(&id).and_then(|key| self.traders.get(key))
    }

    fn trader_by_id_mut(&mut self, id: TraderId) -> Option<&mut Trader> {
        let key = self.keys.get(&id)?;
        self.traders.get_mut(key)
    }
}
