use limit_book::{Order, OrderBook, OrderType, Side};
use rust_decimal::Decimal;

fn main() {
    let book = OrderBook::new();
    let mut id = 0u64;
    let mut add = |side, price: i64, qty: u32| {
        id += 1;
        book.add(Order::new(
            id,
            0,
            "AAPL",
            OrderType::Limit,
            side,
            Decimal::from(price),
            qty,
        ));
    };

    for price in 95..=99 {
        add(Side::Buy, price, 10 * (price as u32 - 94));
    }
    for price in 101..=105 {
        add(Side::Sell, price, 10 * (106 - price as u32));
    }

    let (bids, asks) = book.depth(5);

    println!("asks:");
    for (price, qty) in asks.iter().rev() {
        println!("  {price} x {qty}");
    }
    println!("  ---- spread ----");
    println!("bids:");
    for (price, qty) in &bids {
        println!("  {price} x {qty}");
    }
}
