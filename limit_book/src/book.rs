use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::level::PriceLevel;
use crate::order::{Order, OrderId, OrderType, Price, Quantity, Side};
use crate::side::BookSide;

/// Invoked once per fill, in fill order, on the thread that called `add`,
/// while the book lock is held. The callback must not call back into the
/// book or the matcher.
pub type TradeCallback = Box<dyn Fn(&Order, &Order, Price, Quantity) + Send>;

struct BookState {
    bids: BookSide,
    asks: BookSide,
    // order id -> (side, price) locator of the level the order rests in
    index: HashMap<OrderId, (Side, Price)>,
    trade_cb: Option<TradeCallback>,
}

/// Two price-ordered sides, an id locator index, and the matching loop.
///
/// A single coarse lock covers both sides and the index; `total_trades` is
/// atomic so observers can poll it without contending for the lock.
pub struct OrderBook {
    state: Mutex<BookState>,
    total_trades: AtomicU64,
}

impl OrderBook {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(BookState {
                bids: BookSide::new(Side::Buy),
                asks: BookSide::new(Side::Sell),
                index: HashMap::new(),
                trade_cb: None,
            }),
            total_trades: AtomicU64::new(0),
        }
    }

    pub fn set_trade_callback(&self, cb: TradeCallback) {
        self.state.lock().unwrap().trade_cb = Some(cb);
    }

    /// Admit an order: it is stamped with an arrival time and crossed
    /// against the opposite side, and any LIMIT residual rests at its limit
    /// price. Invalid and non-matchable orders are dropped silently;
    /// validation belongs to the boundary.
    pub fn add(&self, mut order: Order) {
        if !order.is_valid() || !order.order_type.is_matchable() {
            return;
        }
        order.set_arrival_timestamp(Instant::now());

        let mut state = self.state.lock().unwrap();
        let BookState {
            bids,
            asks,
            index,
            trade_cb,
        } = &mut *state;

        let opposite = match order.side {
            Side::Buy => &mut *asks,
            Side::Sell => &mut *bids,
        };
        Self::cross(&mut order, opposite, index, trade_cb.as_ref(), &self.total_trades);

        // Unfilled MARKET quantity does not rest.
        if order.remaining_qty > 0 && order.order_type == OrderType::Limit {
            let own = match order.side {
                Side::Buy => bids,
                Side::Sell => asks,
            };
            index.insert(order.order_id, (order.side, order.price));
            own.level_mut(order.price).push_back(order);
        }
    }

    fn cross(
        order: &mut Order,
        opposite: &mut BookSide,
        index: &mut HashMap<OrderId, (Side, Price)>,
        trade_cb: Option<&TradeCallback>,
        total_trades: &AtomicU64,
    ) {
        while order.remaining_qty > 0 {
            let Some(best_price) = opposite.best_price() else {
                break;
            };
            if order.order_type == OrderType::Limit {
                let gated = match order.side {
                    Side::Buy => order.price < best_price,
                    Side::Sell => order.price > best_price,
                };
                if gated {
                    break;
                }
            }
            let Some(level) = opposite.level_at_mut(best_price) else {
                break;
            };

            while order.remaining_qty > 0 {
                let Some(maker_qty) = level.front().map(|m| m.remaining_qty) else {
                    break;
                };
                let fill_qty = order.remaining_qty.min(maker_qty);
                order.apply_fill(fill_qty);

                let Some(maker) = level.fill_front(fill_qty) else {
                    break;
                };
                total_trades.fetch_add(1, Ordering::Relaxed);
                if let Some(cb) = trade_cb {
                    // Trades always print at the resting (maker) price.
                    match order.side {
                        Side::Buy => cb(order, maker, best_price, fill_qty),
                        Side::Sell => cb(maker, order, best_price, fill_qty),
                    }
                }

                let maker_done = maker.is_fully_filled();
                if maker_done {
                    if let Some(done) = level.pop_front() {
                        index.remove(&done.order_id);
                    }
                }
            }

            opposite.remove_if_empty(best_price);
        }
    }

    /// Idempotent: unknown ids are a no-op. Never emits a trade.
    pub fn cancel(&self, order_id: OrderId) {
        let mut state = self.state.lock().unwrap();
        let Some((side, price)) = state.index.remove(&order_id) else {
            return;
        };
        let owning = match side {
            Side::Buy => &mut state.bids,
            Side::Sell => &mut state.asks,
        };
        owning.remove_order(price, order_id);
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.state.lock().unwrap().bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.state.lock().unwrap().asks.best_price()
    }

    pub fn total_trades(&self) -> u64 {
        self.total_trades.load(Ordering::Relaxed)
    }

    pub fn resting_orders(&self) -> usize {
        self.state.lock().unwrap().index.len()
    }

    /// Remaining quantity resting at one price, 0 when no such level exists.
    pub fn resting_qty_at(&self, side: Side, price: Price) -> u64 {
        let state = self.state.lock().unwrap();
        let book_side = match side {
            Side::Buy => &state.bids,
            Side::Sell => &state.asks,
        };
        book_side
            .level_at(price)
            .map_or(0, PriceLevel::resting_qty)
    }

    /// Best-first (price, resting qty) views of both sides, at most `depth`
    /// levels each: (bids, asks).
    pub fn depth(&self, depth: usize) -> (Vec<(Price, u64)>, Vec<(Price, u64)>) {
        let state = self.state.lock().unwrap();
        (state.bids.depth(depth), state.asks.depth(depth))
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl OrderBook {
    /// Asserts the structural invariants: the index and the levels agree,
    /// no level is empty or holds a spent order, FIFO arrival order holds
    /// within each level, and the book is uncrossed.
    fn assert_invariants(&self) {
        let state = self.state.lock().unwrap();

        let mut seen = 0usize;
        for side in [&state.bids, &state.asks] {
            for (price, level) in side.levels_from_best() {
                assert!(!level.is_empty(), "empty level at {price}");
                let mut aggregate = 0u64;
                let mut prev_arrival = None;
                for order in level.iter() {
                    seen += 1;
                    assert!(order.remaining_qty > 0, "spent order resting in book");
                    assert!(order.remaining_qty <= order.quantity);
                    assert_eq!(order.side, side.side());
                    assert_eq!(order.price, price);
                    assert_eq!(
                        state.index.get(&order.order_id),
                        Some(&(order.side, order.price)),
                        "index locator mismatch for order {}",
                        order.order_id
                    );
                    aggregate += u64::from(order.remaining_qty);

                    let arrival = order.timestamp.expect("resting order unstamped");
                    if let Some(prev) = prev_arrival {
                        assert!(prev <= arrival, "FIFO arrival order violated");
                    }
                    prev_arrival = Some(arrival);
                }
                assert_eq!(aggregate, level.resting_qty(), "level aggregate drifted");
            }
        }
        assert_eq!(seen, state.index.len(), "index size disagrees with book");

        if let (Some(bid), Some(ask)) = (state.bids.best_price(), state.asks.best_price()) {
            assert!(bid < ask, "book is crossed: {bid} >= {ask}");
        }
    }
}
