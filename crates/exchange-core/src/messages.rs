//! Message types used by the exchange core.
//!
//! These are **transport-agnostic** logical messages:
//! - [`InputMessage`]: what the exchange consumes.
//! - [`OutputMessage`]: what the exchange produces.
//!
//! Every output addressed to a trader carries its [`TraderId`] so the
//! session layer can deliver it without extra context. Text rendering
//! lives in the `exchange-protocol` crate; this module is purely logical.

use crate::money::{Amount, Price, Shares};
use crate::order::TraderId;
use crate::order_type::OrderType;
use crate::quote::Quote;
use crate::side::Side;

/// A request into the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMessage {
    /// List a new security with its initial reference price.
    ListSecurity(ListSecurity),

    /// New market or limit order.
    NewOrder(NewOrder),

    /// Ask for a quote; the answer is addressed to `trader`.
    QueryQuote(QuoteQuery),
}

/// An event emitted by the exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMessage {
    /// A security was listed.
    Listed(Listing),

    /// Acknowledgement of a new order, sent before any fill.
    Ack(Ack),

    /// One side of an execution.
    Fill(Fill),

    /// Quote snapshot answering a [`QuoteQuery`].
    Quote { trader: TraderId, quote: Quote },
}

impl OutputMessage {
    /// Trader this message is addressed to, `None` for listing
    /// confirmations which go back to whoever asked.
    pub fn recipient(&self) -> Option<TraderId> {
        match self {
            OutputMessage::Listed(_) => None,
            OutputMessage::Ack(a) => Some(a.trader),
            OutputMessage::Fill(f) => Some(f.trader),
            OutputMessage::Quote { trader, .. } => Some(*trader),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSecurity {
    pub symbol: String,
    pub company_name: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    /// Trader the order's acknowledgement and fills go to.
    pub trader: TraderId,

    /// Security symbol, e.g. `"ABC"`.
    pub symbol: String,

    pub side: Side,

    /// Market, or limit with its price.
    pub order_type: OrderType,

    /// Requested shares; must be positive.
    pub shares: Shares,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteQuery {
    pub trader: TraderId,
    pub symbol: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub symbol: String,
    pub company_name: String,
    pub price: Price,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ack {
    pub trader: TraderId,
    pub symbol: String,
    pub company_name: String,
    pub side: Side,
    pub order_type: OrderType,
    pub shares: Shares,
}

/// One trader's view of an execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fill {
    pub trader: TraderId,
    pub symbol: String,

    /// `Buy` for the buyer's fill, `Sell` for the seller's.
    pub side: Side,
    pub shares: Shares,
    pub price: Price,

    /// `shares * price` for this execution.
    pub amount: Amount,
}

// -----------------------------------------------------------------------------
// Convenience constructors
// -----------------------------------------------------------------------------

impl OutputMessage {
    pub fn listed(symbol: impl Into<String>, company_name: impl Into<String>, price: Price) -> Self {
        OutputMessage::Listed(Listing {
            symbol: symbol.into(),
            company_name: company_name.into(),
            price,
        })
    }

    pub fn fill(
        trader: TraderId,
        symbol: impl Into<String>,
        side: Side,
        shares: Shares,
        price: Price,
    ) -> Self {
        OutputMessage::Fill(Fill {
            trader,
            symbol: symbol.into(),
            side,
            shares,
            price,
            amount: crate::money::amount(shares, price),
        })
    }

    pub fn quote(trader: TraderId, quote: Quote) -> Self {
        OutputMessage::Quote { trader, quote }
    }
}
