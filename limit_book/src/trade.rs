use std::fmt;

use crate::order::{Order, Price, Quantity};

/// One matched execution: owned snapshots of both orders as they stood
/// immediately after the fill was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub buy: Order,
    pub sell: Order,
    pub price: Price,
    pub quantity: Quantity,
}

impl Trade {
    pub fn capture(buy: &Order, sell: &Order, price: Price, quantity: Quantity) -> Self {
        Self {
            buy: buy.clone(),
            sell: sell.clone(),
            price,
            quantity,
        }
    }
}

impl fmt::Display for Trade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buy={},sell={},price={},qty={}",
            self.buy.order_id, self.sell.order_id, self.price, self.quantity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::{OrderType, Side};
    use rust_decimal_macros::dec;

    #[test]
    fn capture_snapshots_current_state() {
        let mut buy = Order::new(1, 0, "AAPL", OrderType::Limit, Side::Buy, dec!(100), 10);
        let mut sell = Order::new(2, 0, "AAPL", OrderType::Limit, Side::Sell, dec!(100), 4);
        buy.apply_fill(4);
        sell.apply_fill(4);

        let trade = Trade::capture(&buy, &sell, dec!(100), 4);
        assert_eq!(trade.buy.remaining_qty, 6);
        assert_eq!(trade.sell.remaining_qty, 0);
        assert_eq!(trade.to_string(), "buy=1,sell=2,price=100,qty=4");
    }
}
