//! Quote snapshot for a single security.

use crate::money::{Price, Shares};
use crate::order_type::OrderType;

/// The highest-priority order on one side of a book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopOrder {
    /// Market, or the limit price.
    pub order_type: OrderType,
    pub shares: Shares,
}

impl TopOrder {
    /// Limit price, `None` if the top order is a market order.
    pub fn price(&self) -> Option<Price> {
        self.order_type.limit_price()
    }
}

/// Point-in-time view of a book and its trading session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    pub company_name: String,
    pub symbol: String,
    pub last_price: Price,
    pub low: Price,
    pub high: Price,
    pub volume: u64,

    /// Top of the buy queue, `None` if it is empty.
    pub bid: Option<TopOrder>,

    /// Top of the sell queue, `None` if it is empty.
    pub ask: Option<TopOrder>,
}
