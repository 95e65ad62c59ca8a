//! Priority ordering within one side of a book.
//!
//! A [`RankingPolicy`] decides which of two orders on the same side
//! should execute first. Queues are generic over the policy, so the
//! buy and sell sides share one container type and differ only in the
//! comparator they are built with.

use std::cmp::Ordering;

use crate::money::to_cents;
use crate::order::Order;
use crate::order_type::OrderType;
use crate::side::Side;

/// Strategy deciding priority between two orders on the same side.
pub trait RankingPolicy {
    /// `Ordering::Less` means `a` ranks ahead of `b`.
    ///
    /// `Equal` leaves the decision to arrival order.
    fn compare(&self, a: &Order, b: &Order) -> Ordering;
}

/// Price comparator for trade orders.
///
/// - market orders rank ahead of every limit order,
/// - two market orders are equal,
/// - two limit orders compare by price in whole cents: an ascending
///   comparator (buy side) puts the highest price first, a descending
///   one (sell side) the lowest.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PriceComparator {
    ascending: bool,
}

impl PriceComparator {
    pub fn new(ascending: bool) -> Self {
        PriceComparator { ascending }
    }

    /// Highest bid first.
    pub fn ascending() -> Self {
        PriceComparator::new(true)
    }

    /// Lowest ask first.
    pub fn descending() -> Self {
        PriceComparator::new(false)
    }

    /// The comparator a book uses for the given side.
    pub fn for_side(side: Side) -> Self {
        match side {
            Side::Buy => PriceComparator::ascending(),
            Side::Sell => PriceComparator::descending(),
        }
    }
}

impl RankingPolicy for PriceComparator {
    fn compare(&self, a: &Order, b: &Order) -> Ordering {
        match (a.order_type, b.order_type) {
            (OrderType::Market, OrderType::Market) => Ordering::Equal,
            (OrderType::Market, OrderType::Limit(_)) => Ordering::Less,
            (OrderType::Limit(_), OrderType::Market) => Ordering::Greater,
            (OrderType::Limit(pa), OrderType::Limit(pb)) => {
                let (ca, cb) = (to_cents(pa), to_cents(pb));
                if self.ascending {
                    cb.cmp(&ca)
                } else {
                    ca.cmp(&cb)
                }
            }
        }
    }
}
