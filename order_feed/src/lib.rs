//! Ingress plumbing around the matching core: text-format order parsing,
//! an append-only trade journal, and line-oriented data feeds (file replay
//! and seeded random simulation).

pub mod feed;
pub mod journal;
pub mod parser;

pub use feed::{DataFeed, FeedError};
pub use journal::{Journal, JournalError};
pub use parser::{parse, ParseError};
