use limit_book::{Order, OrderBook, OrderType, Side};
use rust_decimal::Decimal;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

fn main() {
    let book = OrderBook::new();
    let filled = Arc::new(AtomicU32::new(0));
    let sink = Arc::clone(&filled);
    book.set_trade_callback(Box::new(move |_, _, _, qty| {
        sink.fetch_add(qty, Ordering::Relaxed);
    }));

    book.add(Order::new(1, 0, "AAPL", OrderType::Limit, Side::Sell, Decimal::from(100), 50));

    // Market buy for 100: only 50 units of liquidity exist.
    book.add(Order::new(2, 0, "AAPL", OrderType::Market, Side::Buy, Decimal::ZERO, 100));

    println!("requested: 100 units");
    println!("filled: {} units", filled.load(Ordering::Relaxed));
    println!("ask side empty: {}", book.best_ask().is_none());

    assert_eq!(filled.load(Ordering::Relaxed), 50);
    assert_eq!(book.resting_qty_at(Side::Sell, Decimal::from(100)), 0);
}
