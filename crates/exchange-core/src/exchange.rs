//! Security directory: maps symbols to order books and routes requests.
//!
//! Books are created only by listing and live for the lifetime of the
//! exchange. Each request touches exactly one book, and a failed lookup
//! leaves every book untouched.

use std::collections::HashMap;

use tracing::info;

use crate::error::{ExchangeError, Result};
use crate::messages::{InputMessage, ListSecurity, NewOrder, OutputMessage, QuoteQuery};
use crate::money::{is_tradable_price, Price};
use crate::order::Order;
use crate::order_book::OrderBook;
use crate::quote::Quote;

/// A stock exchange holding one [`OrderBook`] per listed symbol.
#[derive(Debug, Default)]
pub struct StockExchange {
    listed: HashMap<String, OrderBook>,
}

impl StockExchange {
    /// Create an exchange with nothing listed.
    pub fn new() -> Self {
        StockExchange::default()
    }

    /// Process a single input message and return any output events.
    pub fn process_message(&mut self, msg: InputMessage) -> Result<Vec<OutputMessage>> {
        match msg {
            InputMessage::ListSecurity(ListSecurity {
                symbol,
                company_name,
                price,
            }) => {
                self.list_security(&symbol, &company_name, price)?;
                Ok(vec![OutputMessage::listed(symbol, company_name, price)])
            }
            InputMessage::NewOrder(new) => self.submit_order(&new),
            InputMessage::QueryQuote(QuoteQuery { trader, symbol }) => {
                let quote = self.quote(&symbol)?;
                Ok(vec![OutputMessage::quote(trader, quote)])
            }
        }
    }

    /// List a new security with its initial reference price.
    pub fn list_security(&mut self, symbol: &str, company_name: &str, price: Price) -> Result<()> {
        if symbol.is_empty() {
            return Err(ExchangeError::InvalidArgument(
                "symbol must not be empty".to_string(),
            ));
        }
        if price.is_sign_negative() {
            return Err(ExchangeError::InvalidArgument(format!(
                "listing price must not be negative, got {price}"
            )));
        }
        if !is_tradable_price(price) {
            return Err(ExchangeError::InvalidArgument(format!(
                "listing price out of range: {price}"
            )));
        }
        if self.listed.contains_key(symbol) {
            return Err(ExchangeError::AlreadyExists(symbol.to_string()));
        }

        info!(symbol, company_name, %price, "listed security");
        self.listed
            .insert(symbol.to_string(), OrderBook::new(symbol, company_name, price));
        Ok(())
    }

    /// Route a new order to its book.
    pub fn submit_order(&mut self, msg: &NewOrder) -> Result<Vec<OutputMessage>> {
        self.place_order(Order::from_new_order(msg))
    }

    /// Route an already constructed order to its book.
    pub fn place_order(&mut self, order: Order) -> Result<Vec<OutputMessage>> {
        let book = self
            .listed
            .get_mut(&order.symbol)
            .ok_or_else(|| ExchangeError::NotFound(order.symbol.clone()))?;
        book.submit(order)
    }

    /// Quote for a listed symbol.
    pub fn quote(&self, symbol: &str) -> Result<Quote> {
        self.listed
            .get(symbol)
            .map(OrderBook::quote)
            .ok_or_else(|| ExchangeError::NotFound(symbol.to_string()))
    }

    /// For tests or admin queries: immutable access to a book by symbol.
    pub fn get_book(&self, symbol: &str) -> Option<&OrderBook> {
        self.listed.get(symbol)
    }

    /// Number of listed securities.
    pub fn num_securities(&self) -> usize {
        self.listed.len()
    }

    /// Listed symbols, sorted.
    pub fn symbols(&self) -> Vec<&str> {
        let mut symbols: Vec<&str> = self.listed.keys().map(String::as_str).collect();
        symbols.sort_unstable();
        symbols
    }
}
