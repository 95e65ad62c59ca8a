//! Single-security order book with price/time priority.
//!
//! - One instance per listed security.
//! - Buy queue: market orders first, then highest limit price.
//! - Sell queue: market orders first, then lowest limit price.
//! - Arrival order among equally ranked orders.
//!
//! Every submission runs the matching loop to completion, so outside
//! [`OrderBook::submit`] the two tops never form a crossable pair.

use tracing::debug;

use crate::error::{ExchangeError, Result};
use crate::messages::{Ack, OutputMessage};
use crate::money::{is_tradable_price, round_cents, Price, Shares};
use crate::order::{Order, TraderId};
use crate::order_queue::OrderQueue;
use crate::order_type::OrderType;
use crate::quote::{Quote, TopOrder};
use crate::ranking::PriceComparator;
use crate::side::Side;

/// Single-security order book and trading session statistics.
#[derive(Debug, Clone)]
pub struct OrderBook {
    symbol: String,
    company_name: String,

    last_price: Price,
    low_price: Price,
    high_price: Price,

    /// Cumulative shares traded since listing.
    volume: u64,

    buy_orders: OrderQueue<PriceComparator>,
    sell_orders: OrderQueue<PriceComparator>,

    next_sequence: u64,
}

/// Outcome of a single matching step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Execution {
    price: Price,
    shares: Shares,
}

impl OrderBook {
    /// Create a book for a newly listed security.
    ///
    /// Last, low, and high all start at the listing price.
    pub fn new(symbol: impl Into<String>, company_name: impl Into<String>, price: Price) -> Self {
        OrderBook {
            symbol: symbol.into(),
            company_name: company_name.into(),
            last_price: price,
            low_price: price,
            high_price: price,
            volume: 0,
            buy_orders: OrderQueue::new(PriceComparator::for_side(Side::Buy)),
            sell_orders: OrderQueue::new(PriceComparator::for_side(Side::Sell)),
            next_sequence: 1,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn last_price(&self) -> Price {
        self.last_price
    }

    pub fn low_price(&self) -> Price {
        self.low_price
    }

    pub fn high_price(&self) -> Price {
        self.high_price
    }

    pub fn volume(&self) -> u64 {
        self.volume
    }

    pub fn buy_orders(&self) -> &OrderQueue<PriceComparator> {
        &self.buy_orders
    }

    pub fn sell_orders(&self) -> &OrderQueue<PriceComparator> {
        &self.sell_orders
    }

    /// Accept a new order, acknowledge it, and match.
    ///
    /// Returns the acknowledgement followed by one buy fill and one
    /// sell fill per execution, in execution order. Limit prices are
    /// rounded to the cent on entry. Invalid orders are rejected before
    /// the book changes.
    pub fn submit(&mut self, mut order: Order) -> Result<Vec<OutputMessage>> {
        if let OrderType::Limit(price) = order.order_type {
            order.order_type = OrderType::Limit(round_cents(price));
        }
        self.validate(&order)?;

        order.sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!(
            symbol = %self.symbol,
            trader = %order.trader,
            side = ?order.side,
            order_type = ?order.order_type,
            shares = order.remaining_qty,
            "order accepted"
        );

        let mut outputs = vec![OutputMessage::Ack(Ack {
            trader: order.trader,
            symbol: self.symbol.clone(),
            company_name: self.company_name.clone(),
            side: order.side,
            order_type: order.order_type,
            shares: order.remaining_qty,
        })];

        match order.side {
            Side::Buy => self.buy_orders.push(order),
            Side::Sell => self.sell_orders.push(order),
        }

        self.execute_orders(&mut outputs);
        Ok(outputs)
    }

    /// Snapshot of session statistics and both tops of book.
    pub fn quote(&self) -> Quote {
        Quote {
            company_name: self.company_name.clone(),
            symbol: self.symbol.clone(),
            last_price: self.last_price,
            low: self.low_price,
            high: self.high_price,
            volume: self.volume,
            bid: self.buy_orders.peek().map(Self::top_order),
            ask: self.sell_orders.peek().map(Self::top_order),
        }
    }

    /// Returns `true` if the current tops would trade with each other.
    ///
    /// Always `false` between submissions.
    pub fn is_crossed(&self) -> bool {
        match (self.buy_orders.peek(), self.sell_orders.peek()) {
            (Some(buy), Some(sell)) => Self::execution_price(buy, sell, self.last_price).is_some(),
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Internal helpers
    // -------------------------------------------------------------------------

    fn validate(&self, order: &Order) -> Result<()> {
        if order.symbol != self.symbol {
            return Err(ExchangeError::InvalidArgument(format!(
                "order for {} submitted to book {}",
                order.symbol, self.symbol
            )));
        }
        if order.remaining_qty == 0 {
            return Err(ExchangeError::InvalidArgument(
                "share quantity must be positive".to_string(),
            ));
        }
        if let OrderType::Limit(price) = order.order_type {
            if price <= Price::ZERO {
                return Err(ExchangeError::InvalidArgument(format!(
                    "limit price must be positive, got {price}"
                )));
            }
            if !is_tradable_price(price) {
                return Err(ExchangeError::InvalidArgument(format!(
                    "limit price out of range: {price}"
                )));
            }
        }
        Ok(())
    }

    /// Run executions until one queue is empty or the tops no longer cross.
    fn execute_orders(&mut self, outputs: &mut Vec<OutputMessage>) {
        loop {
            let execution = match (self.buy_orders.peek(), self.sell_orders.peek()) {
                (Some(buy), Some(sell)) => {
                    match Self::execution_price(buy, sell, self.last_price) {
                        Some(price) => Execution {
                            price,
                            shares: buy.remaining_qty.min(sell.remaining_qty),
                        },
                        None => break,
                    }
                }
                _ => break,
            };

            let (Some(buyer), Some(seller)) = (
                Self::fill_top(&mut self.buy_orders, execution.shares),
                Self::fill_top(&mut self.sell_orders, execution.shares),
            ) else {
                break;
            };

            self.volume += u64::from(execution.shares);
            self.last_price = execution.price;
            if execution.price < self.low_price {
                self.low_price = execution.price;
            }
            if execution.price > self.high_price {
                self.high_price = execution.price;
            }

            debug!(
                symbol = %self.symbol,
                %buyer,
                %seller,
                price = %execution.price,
                shares = execution.shares,
                volume = self.volume,
                "executed"
            );

            outputs.push(OutputMessage::fill(
                buyer,
                self.symbol.clone(),
                Side::Buy,
                execution.shares,
                execution.price,
            ));
            outputs.push(OutputMessage::fill(
                seller,
                self.symbol.clone(),
                Side::Sell,
                execution.shares,
                execution.price,
            ));
        }
    }

    /// Price at which the two tops trade, or `None` if they don't cross.
    ///
    /// - both limit: the sell price, if it does not exceed the buy price,
    /// - one market: the other order's limit price,
    /// - both market: the last trade price.
    fn execution_price(buy: &Order, sell: &Order, last_price: Price) -> Option<Price> {
        match (buy.order_type, sell.order_type) {
            (OrderType::Limit(bid), OrderType::Limit(ask)) => (bid >= ask).then_some(ask),
            (OrderType::Limit(bid), OrderType::Market) => Some(bid),
            (OrderType::Market, OrderType::Limit(ask)) => Some(ask),
            (OrderType::Market, OrderType::Market) => Some(last_price),
        }
    }

    /// Fill the top order of `queue` by `shares`, dequeuing it once filled.
    ///
    /// Returns the trader to notify.
    fn fill_top(queue: &mut OrderQueue<PriceComparator>, shares: Shares) -> Option<TraderId> {
        let top = queue.peek_mut()?;
        top.fill(shares);
        let trader = top.trader;
        if top.is_filled() {
            queue.pop();
        }
        Some(trader)
    }

    fn top_order(order: &Order) -> TopOrder {
        TopOrder {
            order_type: order.order_type,
            shares: order.remaining_qty,
        }
    }
}
