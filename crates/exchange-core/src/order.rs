//! Order representation used inside the order books.
//!
//! An order is immutable once submitted except for its remaining
//! share count, which only the matching loop reduces. The trader is
//! referenced through an opaque [`TraderId`]; the book never owns or
//! resolves traders, it only addresses notifications to them.

use std::fmt;

use crate::messages::NewOrder;
use crate::money::{Price, Shares};
use crate::order_type::OrderType;
use crate::side::Side;

/// Opaque handle identifying the trader an order belongs to.
///
/// Resolved by the session layer's own registry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraderId(pub u64);

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "trader#{}", self.0)
    }
}

/// A single order in a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub trader: TraderId,
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,

    /// Unfilled shares; the order leaves its book when this hits zero.
    pub remaining_qty: Shares,

    /// Arrival sequence within the book, assigned on submission.
    /// Earlier sequence wins between equally ranked orders.
    pub sequence: u64,
}

impl Order {
    pub fn new(
        trader: TraderId,
        symbol: impl Into<String>,
        side: Side,
        order_type: OrderType,
        shares: Shares,
    ) -> Self {
        Order {
            trader,
            symbol: symbol.into(),
            side,
            order_type,
            remaining_qty: shares,
            sequence: 0,
        }
    }

    /// Construct an `Order` from a [`NewOrder`] request.
    pub fn from_new_order(msg: &NewOrder) -> Self {
        Order::new(
            msg.trader,
            msg.symbol.clone(),
            msg.side,
            msg.order_type,
            msg.shares,
        )
    }

    /// Limit price, `None` for market orders.
    pub fn price(&self) -> Option<Price> {
        self.order_type.limit_price()
    }

    /// Returns `true` if the order is fully filled.
    pub fn is_filled(&self) -> bool {
        self.remaining_qty == 0
    }

    /// Fill the order by up to `qty` shares.
    ///
    /// Returns the quantity actually filled (`<= qty` and
    /// `<= remaining_qty`).
    pub fn fill(&mut self, qty: Shares) -> Shares {
        let filled = qty.min(self.remaining_qty);
        self.remaining_qty -= filled;
        filled
    }
}
