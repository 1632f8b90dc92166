use limit_book::{Order, OrderBook, OrderType, Side};
use rust_decimal::Decimal;

fn main() {
    let book = OrderBook::new();
    book.set_trade_callback(Box::new(|buy, sell, price, qty| {
        println!(
            "trade: buy={} sell={} {} @ {}",
            buy.order_id, sell.order_id, qty, price
        );
    }));

    book.add(Order::new(1, 0, "AAPL", OrderType::Limit, Side::Buy, Decimal::from(99), 10));
    book.add(Order::new(2, 0, "AAPL", OrderType::Limit, Side::Sell, Decimal::from(101), 10));

    println!("best bid: {:?}", book.best_bid());
    println!("best ask: {:?}", book.best_ask());

    // Aggressive buy lifts the ask and rests the remainder at 101.
    book.add(Order::new(3, 0, "AAPL", OrderType::Limit, Side::Buy, Decimal::from(101), 15));

    println!("after the cross:");
    println!("best bid: {:?}", book.best_bid());
    println!("best ask: {:?}", book.best_ask());
    println!("total trades: {}", book.total_trades());
}
