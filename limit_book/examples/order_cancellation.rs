use limit_book::{Order, OrderBook, OrderType, Side};
use rust_decimal::Decimal;

fn main() {
    let book = OrderBook::new();

    for (id, price) in [(1u64, 100), (2, 99), (3, 98)] {
        book.add(Order::new(
            id,
            0,
            "AAPL",
            OrderType::Limit,
            Side::Buy,
            Decimal::from(price),
            10,
        ));
    }

    println!("best bid: {:?}", book.best_bid());

    book.cancel(1);
    println!("after cancelling id=1: {:?}", book.best_bid());

    // Cancels are idempotent; unknown ids are ignored.
    book.cancel(1);
    book.cancel(42);

    book.cancel(2);
    book.cancel(3);
    println!("after cancelling everything: {:?}", book.best_bid());
    assert_eq!(book.resting_orders(), 0);
}
