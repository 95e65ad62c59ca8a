//! exchange-core
//!
//! Pure stock exchange logic:
//! - messages (input/output types)
//! - order representation and ranking policy
//! - per-security order book with matching and quotes
//! - security directory

pub mod side;
pub mod order_type;
pub mod money;
pub mod messages;
pub mod order;
pub mod ranking;
pub mod order_queue;
pub mod quote;
pub mod order_book;
pub mod exchange;
pub mod error;

pub use side::Side;
pub use order_type::OrderType;
pub use money::{format_money, Amount, Price, Shares};

pub use messages::{
    Ack,
    Fill,
    InputMessage,
    ListSecurity,
    Listing,
    NewOrder,
    OutputMessage,
    QuoteQuery,
};

pub use order::{Order, TraderId};
pub use ranking::{PriceComparator, RankingPolicy};
pub use order_queue::OrderQueue;
pub use quote::{Quote, TopOrder};
pub use order_book::OrderBook;
pub use exchange::StockExchange;
pub use error::ExchangeError;
