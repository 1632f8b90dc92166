use std::fmt;
use std::time::Instant;

use rust_decimal::Decimal;

pub type OrderId = u64;
pub type ClientId = u64;

// Exact decimal prices so the book can key levels on equality without the
// binary-float rounding traps. Quantities are whole units.
pub type Price = Decimal;
pub type Quantity = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    Stop,
    StopLimit,
    Cancel,
    Modify,
}

impl OrderType {
    /// Only LIMIT and MARKET orders participate in matching; the rest are
    /// instructions or stored-but-untriggered types.
    pub fn is_matchable(self) -> bool {
        matches!(self, OrderType::Market | OrderType::Limit)
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
            OrderType::StopLimit => "STOP_LIMIT",
            OrderType::Cancel => "CANCEL",
            OrderType::Modify => "MODIFY",
        };
        f.write_str(s)
    }
}

/// A single client instruction: immutable identity plus mutable fill state.
///
/// `timestamp` is the arrival stamp assigned when the book admits the order,
/// not when the client constructs it; it stays `None` until then.
#[derive(Debug, Clone)]
pub struct Order {
    pub order_id: OrderId,
    pub client_id: ClientId,
    pub symbol: String,
    pub order_type: OrderType,
    pub side: Side,
    pub price: Price,
    pub quantity: Quantity,
    pub remaining_qty: Quantity,
    pub stop_price: Price,
    pub timestamp: Option<Instant>,
    pub last_modified: Instant,
}

impl Order {
    pub fn new(
        order_id: OrderId,
        client_id: ClientId,
        symbol: impl Into<String>,
        order_type: OrderType,
        side: Side,
        price: Price,
        quantity: Quantity,
    ) -> Self {
        Self {
            order_id,
            client_id,
            symbol: symbol.into(),
            order_type,
            side,
            price,
            quantity,
            remaining_qty: quantity,
            stop_price: Decimal::ZERO,
            timestamp: None,
            last_modified: Instant::now(),
        }
    }

    pub fn with_stop(
        order_id: OrderId,
        client_id: ClientId,
        symbol: impl Into<String>,
        order_type: OrderType,
        side: Side,
        price: Price,
        quantity: Quantity,
        stop_price: Price,
    ) -> Self {
        let mut order = Self::new(order_id, client_id, symbol, order_type, side, price, quantity);
        order.stop_price = stop_price;
        order
    }

    pub fn is_valid(&self) -> bool {
        self.order_id > 0 && self.quantity > 0 && !self.symbol.is_empty()
    }

    pub fn is_fully_filled(&self) -> bool {
        self.remaining_qty == 0
    }

    pub fn is_partially_filled(&self) -> bool {
        self.remaining_qty > 0 && self.remaining_qty < self.quantity
    }

    pub fn filled_qty(&self) -> Quantity {
        self.quantity - self.remaining_qty
    }

    /// Reduce remaining quantity by a fill. Oversized fills are ignored so
    /// `remaining_qty <= quantity` can never be violated.
    pub fn apply_fill(&mut self, qty: Quantity) {
        if qty <= self.remaining_qty {
            self.remaining_qty -= qty;
            self.last_modified = Instant::now();
        }
    }

    pub fn cancel(&mut self) {
        self.remaining_qty = 0;
        self.last_modified = Instant::now();
    }

    /// Called exactly once when the book admits the order.
    pub fn set_arrival_timestamp(&mut self, t: Instant) {
        self.timestamp = Some(t);
    }

    /// Arrival ordering; an unstamped order counts as later than any stamped one.
    pub fn arrived_before(&self, other: &Order) -> bool {
        match (self.timestamp, other.timestamp) {
            (Some(a), Some(b)) => a < b,
            (Some(_), None) => true,
            _ => false,
        }
    }

    pub fn can_match_with(&self, other: &Order) -> bool {
        if self.symbol != other.symbol {
            return false;
        }
        if self.side == other.side {
            return false;
        }
        if !self.is_valid() || !other.is_valid() {
            return false;
        }
        if self.remaining_qty == 0 || other.remaining_qty == 0 {
            return false;
        }

        if self.order_type == OrderType::Limit && other.order_type == OrderType::Limit {
            return match self.side {
                Side::Buy => self.price >= other.price,
                Side::Sell => self.price <= other.price,
            };
        }

        // A market order crosses any valid opposite order.
        self.order_type == OrderType::Market || other.order_type == OrderType::Market
    }

    /// Execution price for a match against `other`: the limit side's price
    /// when one order is MARKET, otherwise the earlier-arrived (maker) price.
    pub fn execution_price(&self, other: &Order) -> Price {
        if self.order_type == OrderType::Market && other.order_type == OrderType::Limit {
            return other.price;
        }
        if other.order_type == OrderType::Market && self.order_type == OrderType::Limit {
            return self.price;
        }
        if self.order_type == OrderType::Limit && other.order_type == OrderType::Limit {
            return if self.arrived_before(other) {
                self.price
            } else {
                other.price
            };
        }
        self.price.max(other.price)
    }
}

impl Default for Order {
    /// Invalid-but-safe zero state.
    fn default() -> Self {
        Self {
            order_id: 0,
            client_id: 0,
            symbol: String::new(),
            order_type: OrderType::Limit,
            side: Side::Buy,
            price: Decimal::ZERO,
            quantity: 0,
            remaining_qty: 0,
            stop_price: Decimal::ZERO,
            timestamp: None,
            last_modified: Instant::now(),
        }
    }
}

// Identity comparison: two orders are the same order iff the ids match.
impl PartialEq for Order {
    fn eq(&self, other: &Self) -> bool {
        self.order_id == other.order_id
    }
}

impl Eq for Order {}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order[ID={}, Client={}, Symbol={}, Type={}, Side={}, Price={}, Qty={}, Remaining={}",
            self.order_id,
            self.client_id,
            self.symbol,
            self.order_type,
            self.side,
            self.price,
            self.quantity,
            self.remaining_qty,
        )?;
        if matches!(self.order_type, OrderType::Stop | OrderType::StopLimit) {
            write!(f, ", StopPrice={}", self.stop_price)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn default_order_is_invalid() {
        let order = Order::default();
        assert_eq!(order.order_id, 0);
        assert_eq!(order.quantity, 0);
        assert_eq!(order.remaining_qty, 0);
        assert!(!order.is_valid());
    }

    #[test]
    fn new_order_starts_unfilled() {
        let order = Order::new(123, 456, "MSFT", OrderType::Market, Side::Sell, dec!(250.75), 50);
        assert!(order.is_valid());
        assert_eq!(order.remaining_qty, 50);
        assert_eq!(order.filled_qty(), 0);
        assert!(!order.is_partially_filled());
        assert!(!order.is_fully_filled());
        assert!(order.timestamp.is_none());
    }

    #[test]
    fn fill_lifecycle() {
        let mut order = Order::new(10, 500, "AMZN", OrderType::Limit, Side::Buy, dec!(3200), 100);

        order.apply_fill(30);
        assert!(order.is_partially_filled());
        assert_eq!(order.filled_qty(), 30);
        assert_eq!(order.remaining_qty, 70);

        order.apply_fill(25);
        assert_eq!(order.remaining_qty, 45);

        order.apply_fill(45);
        assert!(order.is_fully_filled());
        assert_eq!(order.filled_qty(), 100);
    }

    #[test]
    fn oversized_fill_is_ignored() {
        let mut order = Order::new(1, 0, "AAPL", OrderType::Limit, Side::Buy, dec!(100), 10);
        order.apply_fill(11);
        assert_eq!(order.remaining_qty, 10);
    }

    #[test]
    fn cancel_zeroes_remaining() {
        let mut order = Order::new(20, 600, "NFLX", OrderType::Limit, Side::Sell, dec!(450), 50);
        order.cancel();
        assert!(order.is_fully_filled());
        assert_eq!(order.remaining_qty, 0);
    }

    #[test]
    fn matching_rules() {
        let buy = Order::new(1, 100, "GOOGL", OrderType::Limit, Side::Buy, dec!(2500), 10);
        let sell = Order::new(2, 200, "GOOGL", OrderType::Limit, Side::Sell, dec!(2500), 15);
        assert!(buy.can_match_with(&sell));
        assert!(sell.can_match_with(&buy));

        let other_symbol = Order::new(3, 300, "TSLA", OrderType::Limit, Side::Sell, dec!(800), 5);
        assert!(!buy.can_match_with(&other_symbol));

        let same_side = Order::new(4, 400, "GOOGL", OrderType::Limit, Side::Buy, dec!(2450), 20);
        assert!(!buy.can_match_with(&same_side));

        let too_expensive = Order::new(5, 500, "GOOGL", OrderType::Limit, Side::Sell, dec!(2600), 5);
        assert!(!buy.can_match_with(&too_expensive));

        let market = Order::new(6, 600, "GOOGL", OrderType::Market, Side::Sell, Decimal::ZERO, 5);
        assert!(buy.can_match_with(&market));
    }

    #[test]
    fn execution_price_prefers_limit_over_market() {
        let limit = Order::new(1, 0, "AAPL", OrderType::Limit, Side::Buy, dec!(100), 10);
        let market = Order::new(2, 0, "AAPL", OrderType::Market, Side::Sell, Decimal::ZERO, 10);
        assert_eq!(limit.execution_price(&market), dec!(100));
        assert_eq!(market.execution_price(&limit), dec!(100));
    }

    #[test]
    fn execution_price_uses_earlier_arrival() {
        let mut maker = Order::new(1, 0, "AAPL", OrderType::Limit, Side::Buy, dec!(101), 10);
        let mut taker = Order::new(2, 0, "AAPL", OrderType::Limit, Side::Sell, dec!(100), 10);
        let t0 = Instant::now();
        maker.set_arrival_timestamp(t0);
        taker.set_arrival_timestamp(t0 + Duration::from_micros(1));

        assert!(maker.arrived_before(&taker));
        assert_eq!(maker.execution_price(&taker), dec!(101));
        assert_eq!(taker.execution_price(&maker), dec!(101));
    }

    #[test]
    fn display_includes_stop_price_for_stop_orders() {
        let order = Order::with_stop(
            999,
            777,
            "META",
            OrderType::StopLimit,
            Side::Buy,
            dec!(300.50),
            25,
            dec!(305),
        );
        let text = order.to_string();
        assert!(text.contains("999"));
        assert!(text.contains("777"));
        assert!(text.contains("META"));
        assert!(text.contains("STOP_LIMIT"));
        assert!(text.contains("BUY"));
        assert!(text.contains("300.50"));
        assert!(text.contains("StopPrice=305"));

        let plain = Order::new(1, 0, "AAPL", OrderType::Limit, Side::Sell, dec!(100), 5);
        assert!(!plain.to_string().contains("StopPrice"));
    }

    #[test]
    fn equality_is_identity() {
        let a = Order::new(7, 1, "AAPL", OrderType::Limit, Side::Buy, dec!(100), 10);
        let mut b = a.clone();
        b.apply_fill(4);
        assert_eq!(a, b);
    }
}
