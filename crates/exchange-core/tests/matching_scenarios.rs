// crates/exchange-core/tests/matching_scenarios.rs
use exchange_core::{
    ExchangeError, Fill, InputMessage, NewOrder, Order, OrderBook, OrderType, OutputMessage,
    Price, QuoteQuery, Side, StockExchange, TraderId,
};
use rust_decimal_macros::dec;

const BUYER: TraderId = TraderId(1);
const SELLER: TraderId = TraderId(2);

fn listed(symbol: &str, price: Price) -> StockExchange {
    let mut exchange = StockExchange::new();
    exchange
        .list_security(symbol, "Abc Corp", price)
        .expect("listing a fresh symbol");
    exchange
}

fn limit(trader: TraderId, side: Side, shares: u32, price: Price) -> NewOrder {
    NewOrder {
        trader,
        symbol: "ABC".to_string(),
        side,
        order_type: OrderType::Limit(price),
        shares,
    }
}

fn market(trader: TraderId, side: Side, shares: u32) -> NewOrder {
    NewOrder {
        trader,
        symbol: "ABC".to_string(),
        side,
        order_type: OrderType::Market,
        shares,
    }
}

fn fills(outputs: &[OutputMessage]) -> Vec<&Fill> {
    outputs
        .iter()
        .filter_map(|o| match o {
            OutputMessage::Fill(f) => Some(f),
            _ => None,
        })
        .collect()
}

fn book(exchange: &StockExchange) -> &OrderBook {
    exchange.get_book("ABC").expect("ABC is listed")
}

#[test]
fn equal_limits_trade_in_full() {
    let mut exchange = listed("ABC", dec!(10.00));

    let out = exchange
        .submit_order(&limit(BUYER, Side::Buy, 100, dec!(10.00)))
        .unwrap();
    assert_eq!(out.len(), 1, "only an ack, nothing to match");

    let out = exchange
        .submit_order(&limit(SELLER, Side::Sell, 100, dec!(10.00)))
        .unwrap();
    let fills = fills(&out);
    assert_eq!(fills.len(), 2);
    assert_eq!((fills[0].trader, fills[0].side), (BUYER, Side::Buy));
    assert_eq!((fills[1].trader, fills[1].side), (SELLER, Side::Sell));
    for fill in &fills {
        assert_eq!(fill.shares, 100);
        assert_eq!(fill.price, dec!(10.00));
        assert_eq!(fill.amount, dec!(1000.00));
    }

    let book = book(&exchange);
    assert!(book.buy_orders().is_empty());
    assert!(book.sell_orders().is_empty());
    assert_eq!(book.volume(), 100);
    assert_eq!(book.last_price(), dec!(10.00));
}

#[test]
fn resting_bid_without_asks() {
    let mut exchange = listed("ABC", dec!(10.00));
    let out = exchange
        .submit_order(&limit(BUYER, Side::Buy, 50, dec!(9.00)))
        .unwrap();
    assert!(fills(&out).is_empty());

    let quote = exchange.quote("ABC").unwrap();
    let bid = quote.bid.expect("bid is resting");
    assert_eq!(bid.price(), Some(dec!(9.00)));
    assert_eq!(bid.shares, 50);
    assert!(quote.ask.is_none());
    assert_eq!(book(&exchange).buy_orders().peek().map(|o| o.trader), Some(BUYER));
}

#[test]
fn market_buy_partially_fills_resting_ask() {
    let mut exchange = listed("ABC", dec!(4.00));
    exchange
        .submit_order(&limit(SELLER, Side::Sell, 200, dec!(5.00)))
        .unwrap();
    let out = exchange.submit_order(&market(BUYER, Side::Buy, 100)).unwrap();

    let fills = fills(&out);
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].price, dec!(5.00));
    assert_eq!(fills[0].shares, 100);
    assert_eq!(fills[1].amount, dec!(500.00));

    let book = book(&exchange);
    assert!(book.buy_orders().is_empty());
    let ask = book.sell_orders().peek().expect("ask keeps the rest");
    assert_eq!(ask.remaining_qty, 100);
    assert_eq!(book.high_price(), dec!(5.00));
    assert_eq!(book.low_price(), dec!(4.00));
}

#[test]
fn equal_bids_fill_in_arrival_order() {
    let mut exchange = listed("ABC", dec!(8.00));
    let first = TraderId(10);
    let second = TraderId(11);
    exchange
        .submit_order(&limit(first, Side::Buy, 100, dec!(8.00)))
        .unwrap();
    exchange
        .submit_order(&limit(second, Side::Buy, 100, dec!(8.00)))
        .unwrap();

    let out = exchange
        .submit_order(&limit(SELLER, Side::Sell, 100, dec!(8.00)))
        .unwrap();
    let fills = fills(&out);
    assert_eq!(fills[0].trader, first);

    let rest = book(&exchange).buy_orders();
    assert_eq!(rest.len(), 1);
    let resting = rest.peek().unwrap();
    assert_eq!(resting.trader, second);
    assert_eq!(resting.remaining_qty, 100);
}

#[test]
fn two_market_orders_trade_at_last_price() {
    let mut exchange = listed("ABC", dec!(12.34));
    exchange.submit_order(&market(BUYER, Side::Buy, 40)).unwrap();
    let out = exchange.submit_order(&market(SELLER, Side::Sell, 40)).unwrap();

    let fills = fills(&out);
    assert_eq!(fills.len(), 2);
    assert!(fills.iter().all(|f| f.price == dec!(12.34)));
    assert_eq!(book(&exchange).volume(), 40);
}

#[test]
fn limit_buy_against_market_sell_trades_at_bid() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange.submit_order(&market(SELLER, Side::Sell, 30)).unwrap();
    let out = exchange
        .submit_order(&limit(BUYER, Side::Buy, 30, dec!(9.25)))
        .unwrap();
    let fills = fills(&out);
    assert_eq!(fills[0].price, dec!(9.25));
    assert_eq!(book(&exchange).low_price(), dec!(9.25));
}

#[test]
fn crossing_limits_trade_at_sell_price() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(SELLER, Side::Sell, 10, dec!(10.10)))
        .unwrap();
    let out = exchange
        .submit_order(&limit(BUYER, Side::Buy, 10, dec!(10.50)))
        .unwrap();
    assert_eq!(fills(&out)[0].price, dec!(10.10));
}

#[test]
fn aggressive_order_sweeps_several_levels() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(TraderId(3), Side::Sell, 30, dec!(10.20)))
        .unwrap();
    exchange
        .submit_order(&limit(TraderId(4), Side::Sell, 30, dec!(10.10)))
        .unwrap();
    exchange
        .submit_order(&limit(TraderId(5), Side::Sell, 30, dec!(10.30)))
        .unwrap();

    let out = exchange
        .submit_order(&limit(BUYER, Side::Buy, 70, dec!(10.25)))
        .unwrap();
    let sells: Vec<(TraderId, u32, Price)> = fills(&out)
        .into_iter()
        .filter(|f| f.side == Side::Sell)
        .map(|f| (f.trader, f.shares, f.price))
        .collect();
    assert_eq!(
        sells,
        vec![
            (TraderId(4), 30, dec!(10.10)),
            (TraderId(3), 30, dec!(10.20)),
        ]
    );

    let book = book(&exchange);
    assert_eq!(book.buy_orders().peek().map(|o| o.remaining_qty), Some(10));
    assert_eq!(book.sell_orders().peek().map(|o| o.trader), Some(TraderId(5)));
    assert_eq!(book.high_price(), dec!(10.20));
    assert_eq!(book.volume(), 60);
}

#[test]
fn acknowledgement_precedes_fills() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(SELLER, Side::Sell, 5, dec!(10.00)))
        .unwrap();
    let out = exchange.submit_order(&market(BUYER, Side::Buy, 5)).unwrap();
    match &out[0] {
        OutputMessage::Ack(ack) => {
            assert_eq!(ack.trader, BUYER);
            assert_eq!(ack.order_type, OrderType::Market);
            assert_eq!(ack.shares, 5);
            assert_eq!(ack.company_name, "Abc Corp");
        }
        other => panic!("expected ack first, got {other:?}"),
    }
}

// -----------------------------------------------------------------------------
// Invariants and laws
// -----------------------------------------------------------------------------

#[test]
fn book_never_left_crossed() {
    let mut exchange = listed("ABC", dec!(10.00));
    let orders = [
        limit(TraderId(1), Side::Buy, 30, dec!(9.90)),
        limit(TraderId(2), Side::Sell, 20, dec!(10.05)),
        market(TraderId(3), Side::Buy, 5),
        limit(TraderId(4), Side::Sell, 50, dec!(9.95)),
        limit(TraderId(5), Side::Buy, 15, dec!(10.10)),
        market(TraderId(6), Side::Sell, 60),
        limit(TraderId(7), Side::Buy, 25, dec!(9.80)),
        limit(TraderId(8), Side::Sell, 10, dec!(9.85)),
        market(TraderId(9), Side::Buy, 3),
    ];

    for order in &orders {
        exchange.submit_order(order).unwrap();
        let book = book(&exchange);
        assert!(!book.is_crossed(), "crossed after {order:?}");
        if let (Some(buy), Some(sell)) = (book.buy_orders().peek(), book.sell_orders().peek()) {
            if let (Some(bid), Some(ask)) = (buy.price(), sell.price()) {
                assert!(bid < ask, "bid {bid} must stay below ask {ask}");
            }
        }
    }
}

#[test]
fn each_execution_reduces_resting_shares() {
    let mut exchange = listed("ABC", dec!(10.00));
    for price in [dec!(10.00), dec!(10.01), dec!(10.02)] {
        exchange
            .submit_order(&limit(SELLER, Side::Sell, 10, price))
            .unwrap();
    }
    let before = book(&exchange).sell_orders().total_shares() + 25;

    let out = exchange.submit_order(&market(BUYER, Side::Buy, 25)).unwrap();
    let executed: u64 = fills(&out)
        .iter()
        .filter(|f| f.side == Side::Buy)
        .map(|f| {
            assert!(f.shares > 0);
            u64::from(f.shares)
        })
        .sum();

    let book = book(&exchange);
    let after = book.sell_orders().total_shares() + book.buy_orders().total_shares();
    assert_eq!(before - after, 2 * executed);
    assert_eq!(executed, 25);
}

#[test]
fn quote_reads_are_idempotent() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(BUYER, Side::Buy, 10, dec!(9.00)))
        .unwrap();
    exchange
        .submit_order(&limit(SELLER, Side::Sell, 10, dec!(11.00)))
        .unwrap();
    let first = exchange.quote("ABC").unwrap();
    let second = exchange.quote("ABC").unwrap();
    assert_eq!(first, second);
}

#[test]
fn higher_bid_and_lower_ask_rank_first() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(TraderId(1), Side::Buy, 10, dec!(9.00)))
        .unwrap();
    exchange
        .submit_order(&limit(TraderId(2), Side::Buy, 10, dec!(9.50)))
        .unwrap();
    exchange
        .submit_order(&limit(TraderId(3), Side::Sell, 10, dec!(11.00)))
        .unwrap();
    exchange
        .submit_order(&limit(TraderId(4), Side::Sell, 10, dec!(10.50)))
        .unwrap();

    let book = book(&exchange);
    let bids: Vec<TraderId> = book.buy_orders().iter().map(|o| o.trader).collect();
    let asks: Vec<TraderId> = book.sell_orders().iter().map(|o| o.trader).collect();
    assert_eq!(bids, vec![TraderId(2), TraderId(1)]);
    assert_eq!(asks, vec![TraderId(4), TraderId(3)]);
}

#[test]
fn market_order_jumps_ahead_of_limits() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(TraderId(1), Side::Sell, 10, dec!(10.50)))
        .unwrap();
    exchange
        .submit_order(&limit(TraderId(2), Side::Sell, 10, dec!(10.40)))
        .unwrap();
    exchange.submit_order(&market(TraderId(3), Side::Sell, 10)).unwrap();

    let book = book(&exchange);
    let asks: Vec<TraderId> = book.sell_orders().iter().map(|o| o.trader).collect();
    assert_eq!(asks, vec![TraderId(3), TraderId(2), TraderId(1)]);
    let quote = book.quote();
    assert_eq!(quote.ask.map(|a| a.order_type), Some(OrderType::Market));
}

// -----------------------------------------------------------------------------
// Errors
// -----------------------------------------------------------------------------

#[test]
fn unlisted_symbol_is_not_found() {
    let mut exchange = listed("ABC", dec!(10.00));
    let mut order = limit(BUYER, Side::Buy, 10, dec!(1.00));
    order.symbol = "XYZ".to_string();
    assert_eq!(
        exchange.submit_order(&order),
        Err(ExchangeError::NotFound("XYZ".to_string()))
    );
    assert_eq!(
        exchange.quote("XYZ"),
        Err(ExchangeError::NotFound("XYZ".to_string()))
    );
    assert!(book(&exchange).buy_orders().is_empty());
}

#[test]
fn zero_shares_are_rejected_before_the_book() {
    let mut exchange = listed("ABC", dec!(10.00));
    let result = exchange.submit_order(&limit(BUYER, Side::Buy, 0, dec!(10.00)));
    assert!(matches!(result, Err(ExchangeError::InvalidArgument(_))));
    assert!(book(&exchange).buy_orders().is_empty());
}

#[test]
fn non_positive_limit_price_is_rejected() {
    let mut exchange = listed("ABC", dec!(10.00));
    let result = exchange.submit_order(&limit(BUYER, Side::Buy, 10, dec!(0)));
    assert!(matches!(result, Err(ExchangeError::InvalidArgument(_))));
}

#[test]
fn wrong_book_is_rejected() {
    let mut book = OrderBook::new("ABC", "Abc Corp", dec!(1.00));
    let order = Order::new(BUYER, "XYZ", Side::Buy, OrderType::Market, 10);
    assert!(matches!(
        book.submit(order),
        Err(ExchangeError::InvalidArgument(_))
    ));
    assert!(book.buy_orders().is_empty());
}

#[test]
fn listing_twice_keeps_the_original_book() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(BUYER, Side::Buy, 10, dec!(9.00)))
        .unwrap();
    assert_eq!(
        exchange.list_security("ABC", "Other", dec!(1.00)),
        Err(ExchangeError::AlreadyExists("ABC".to_string()))
    );
    let book = book(&exchange);
    assert_eq!(book.company_name(), "Abc Corp");
    assert_eq!(book.buy_orders().len(), 1);
    assert_eq!(exchange.num_securities(), 1);
}

#[test]
fn process_message_routes_every_request() {
    let mut exchange = StockExchange::new();
    let out = exchange
        .process_message(InputMessage::ListSecurity(exchange_core::ListSecurity {
            symbol: "ABC".to_string(),
            company_name: "Abc Corp".to_string(),
            price: dec!(3.00),
        }))
        .unwrap();
    assert!(matches!(&out[0], OutputMessage::Listed(l) if l.symbol == "ABC"));

    let out = exchange
        .process_message(InputMessage::NewOrder(market(BUYER, Side::Buy, 1)))
        .unwrap();
    assert_eq!(out[0].recipient(), Some(BUYER));

    let out = exchange
        .process_message(InputMessage::QueryQuote(QuoteQuery {
            trader: SELLER,
            symbol: "ABC".to_string(),
        }))
        .unwrap();
    match &out[0] {
        OutputMessage::Quote { trader, quote } => {
            assert_eq!(*trader, SELLER);
            assert_eq!(quote.last_price, dec!(3.00));
            assert!(quote.bid.is_some());
        }
        other => panic!("expected quote, got {other:?}"),
    }
}

#[test]
fn unrepresentable_limit_price_is_rejected_and_book_unchanged() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(BUYER, Side::Buy, 1, dec!(1.00)))
        .unwrap();

    let huge = Price::MAX;
    let result = exchange.submit_order(&limit(SELLER, Side::Buy, 1, huge));
    assert!(matches!(result, Err(ExchangeError::InvalidArgument(_))));

    let result = exchange.submit_order(&limit(
        SELLER,
        Side::Sell,
        1000,
        dec!(1000000000000000000000000000),
    ));
    assert!(matches!(result, Err(ExchangeError::InvalidArgument(_))));

    let book = book(&exchange);
    assert_eq!(book.buy_orders().len(), 1);
    assert_eq!(book.buy_orders().total_shares(), 1);
    assert!(book.sell_orders().is_empty());
    assert_eq!(book.volume(), 0);
    assert_eq!(book.last_price(), dec!(10.00));
}

#[test]
fn unrepresentable_listing_price_is_rejected() {
    let mut exchange = StockExchange::new();
    assert!(matches!(
        exchange.list_security("ABC", "Abc Corp", dec!(1000000000000000000000000000)),
        Err(ExchangeError::InvalidArgument(_))
    ));
    assert_eq!(exchange.num_securities(), 0);
}

#[test]
fn sub_cent_limits_are_rounded_before_matching() {
    let mut exchange = listed("ABC", dec!(10.00));
    exchange
        .submit_order(&limit(SELLER, Side::Sell, 10, dec!(10.004)))
        .unwrap();

    let out = exchange
        .submit_order(&limit(BUYER, Side::Buy, 10, dec!(10.001)))
        .unwrap();
    match &out[0] {
        OutputMessage::Ack(ack) => assert_eq!(ack.order_type, OrderType::Limit(dec!(10.00))),
        other => panic!("expected ack, got {other:?}"),
    }
    let fills = fills(&out);
    assert_eq!(fills.len(), 2);
    assert_eq!(fills[0].price, dec!(10.00));
    assert_eq!(fills[0].amount, dec!(100.00));
    assert!(!book(&exchange).is_crossed());
    assert!(book(&exchange).sell_orders().is_empty());
}
