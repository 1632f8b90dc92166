//! Price-time priority limit order book and matching engine.
//!
//! Two subsystems carry the semantics:
//!
//! - [`OrderBook`]: two price-ordered sides (`BTreeMap` of FIFO levels), an
//!   id locator index for O(1) cancel lookup, and the crossing walk that
//!   fills aggressors against resting liquidity at the maker's price.
//! - [`Matcher`]: a multi-producer / single-consumer ingress queue whose one
//!   worker thread applies every book mutation, turning concurrent
//!   submissions into a total order with monotonic arrival stamps.
//!
//! Prices are exact decimals so levels can be keyed on equality; callers
//! round to tick size before submission.

pub mod book;
pub mod level;
pub mod matcher;
pub mod order;
pub mod side;
pub mod trade;

pub use book::{OrderBook, TradeCallback};
pub use level::PriceLevel;
pub use matcher::Matcher;
pub use order::{ClientId, Order, OrderId, OrderType, Price, Quantity, Side};
pub use side::BookSide;
pub use trade::Trade;
