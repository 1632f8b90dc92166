use std::collections::BTreeMap;

use crate::level::PriceLevel;
use crate::order::{Order, OrderId, Price, Side};

/// One side of the book: price levels iterable best-first.
///
/// Bids yield the highest price first, asks the lowest. Empty levels are
/// removed eagerly so `best()` never returns a hollow level.
#[derive(Debug)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Price, PriceLevel>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn best_price(&self) -> Option<Price> {
        match self.side {
            Side::Buy => self.levels.keys().next_back().copied(),
            Side::Sell => self.levels.keys().next().copied(),
        }
    }

    pub fn best(&self) -> Option<(Price, &PriceLevel)> {
        match self.side {
            Side::Buy => self.levels.iter().next_back().map(|(p, l)| (*p, l)),
            Side::Sell => self.levels.iter().next().map(|(p, l)| (*p, l)),
        }
    }

    /// Level at `price`, created on demand for a resting insert.
    pub fn level_mut(&mut self, price: Price) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    pub fn level_at_mut(&mut self, price: Price) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    pub fn level_at(&self, price: Price) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub fn remove_if_empty(&mut self, price: Price) {
        if self.levels.get(&price).is_some_and(PriceLevel::is_empty) {
            self.levels.remove(&price);
        }
    }

    /// Targeted cancel: drop `order_id` from the level at `price`, removing
    /// the level if that left it empty.
    pub fn remove_order(&mut self, price: Price, order_id: OrderId) -> bool {
        let Some(level) = self.levels.get_mut(&price) else {
            return false;
        };
        let removed = level.remove_by_id(order_id);
        if level.is_empty() {
            self.levels.remove(&price);
        }
        removed
    }

    /// Best-first (price, resting quantity) pairs, at most `depth` of them.
    pub fn depth(&self, depth: usize) -> Vec<(Price, u64)> {
        self.levels_from_best()
            .take(depth)
            .map(|(price, level)| (price, level.resting_qty()))
            .collect()
    }

    pub fn levels_from_best(&self) -> Box<dyn Iterator<Item = (Price, &PriceLevel)> + '_> {
        match self.side {
            Side::Buy => Box::new(self.levels.iter().rev().map(|(p, l)| (*p, l))),
            Side::Sell => Box::new(self.levels.iter().map(|(p, l)| (*p, l))),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn order_count(&self) -> usize {
        self.levels.values().map(PriceLevel::len).sum()
    }

    pub fn orders(&self) -> impl Iterator<Item = &Order> {
        self.levels.values().flat_map(PriceLevel::iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::order::OrderType;
    use rust_decimal_macros::dec;

    fn order(id: OrderId, side: Side, price: Price, qty: u32) -> Order {
        Order::new(id, 0, "AAPL", OrderType::Limit, side, price, qty)
    }

    #[test]
    fn bids_iterate_highest_first() {
        let mut bids = BookSide::new(Side::Buy);
        for (id, price) in [(1, dec!(99)), (2, dec!(101)), (3, dec!(100))] {
            bids.level_mut(price).push_back(order(id, Side::Buy, price, 10));
        }

        assert_eq!(bids.best_price(), Some(dec!(101)));
        let prices: Vec<_> = bids.levels_from_best().map(|(p, _)| p).collect();
        assert_eq!(prices, vec![dec!(101), dec!(100), dec!(99)]);
    }

    #[test]
    fn asks_iterate_lowest_first() {
        let mut asks = BookSide::new(Side::Sell);
        for (id, price) in [(1, dec!(102)), (2, dec!(100)), (3, dec!(101))] {
            asks.level_mut(price).push_back(order(id, Side::Sell, price, 10));
        }

        assert_eq!(asks.best_price(), Some(dec!(100)));
        let prices: Vec<_> = asks.levels_from_best().map(|(p, _)| p).collect();
        assert_eq!(prices, vec![dec!(100), dec!(101), dec!(102)]);
    }

    #[test]
    fn remove_order_drops_empty_level() {
        let mut bids = BookSide::new(Side::Buy);
        bids.level_mut(dec!(100)).push_back(order(1, Side::Buy, dec!(100), 10));

        assert!(bids.remove_order(dec!(100), 1));
        assert!(bids.is_empty());
        assert!(!bids.remove_order(dec!(100), 1));
    }

    #[test]
    fn depth_reports_best_first_aggregates() {
        let mut asks = BookSide::new(Side::Sell);
        asks.level_mut(dec!(101)).push_back(order(1, Side::Sell, dec!(101), 5));
        asks.level_mut(dec!(101)).push_back(order(2, Side::Sell, dec!(101), 7));
        asks.level_mut(dec!(102)).push_back(order(3, Side::Sell, dec!(102), 3));

        assert_eq!(asks.depth(5), vec![(dec!(101), 12), (dec!(102), 3)]);
        assert_eq!(asks.depth(1), vec![(dec!(101), 12)]);
        assert_eq!(asks.order_count(), 3);
    }

    #[test]
    fn empty_side_has_no_best() {
        let bids = BookSide::new(Side::Buy);
        assert_eq!(bids.best_price(), None);
        assert!(bids.best().is_none());
        assert_eq!(bids.depth(5), vec![]);
    }
}
