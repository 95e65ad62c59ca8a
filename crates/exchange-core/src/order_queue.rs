//! One side of an order book: a priority queue of resting orders.
//!
//! Orders are kept sorted best-first according to a [`RankingPolicy`].
//! Equally ranked orders are ordered by arrival sequence (time
//! priority).

use std::cmp::Ordering;
use std::collections::VecDeque;

use crate::order::Order;
use crate::ranking::RankingPolicy;

#[derive(Debug, Clone)]
pub struct OrderQueue<P> {
    policy: P,
    orders: VecDeque<Order>,
}

impl<P: RankingPolicy> OrderQueue<P> {
    pub fn new(policy: P) -> Self {
        OrderQueue {
            policy,
            orders: VecDeque::new(),
        }
    }

    /// Insert `order` at its ranked position.
    pub fn push(&mut self, order: Order) {
        let policy = &self.policy;
        let idx = self
            .orders
            .partition_point(|resting| {
                policy
                    .compare(resting, &order)
                    .then(resting.sequence.cmp(&order.sequence))
                    != Ordering::Greater
            });
        self.orders.insert(idx, order);
    }

    /// Highest-priority order, if any.
    pub fn peek(&self) -> Option<&Order> {
        self.orders.front()
    }

    pub fn peek_mut(&mut self) -> Option<&mut Order> {
        self.orders.front_mut()
    }

    /// Remove and return the highest-priority order.
    pub fn pop(&mut self) -> Option<Order> {
        self.orders.pop_front()
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Orders in priority order, best first.
    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    /// Sum of remaining shares across the queue.
    pub fn total_shares(&self) -> u64 {
        self.orders
            .iter()
            .map(|o| u64::from(o.remaining_qty))
            .sum()
    }
}
