//! Order type (Market vs Limit).
//!
//! A limit order carries its price; a market order has none and
//! executes at whatever price the opposite side offers.

use crate::money::Price;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit(Price),
}

impl OrderType {
    /// Limit price, or `None` for market orders.
    pub fn limit_price(&self) -> Option<Price> {
        match self {
            OrderType::Market => None,
            OrderType::Limit(price) => Some(*price),
        }
    }
}
