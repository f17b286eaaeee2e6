//! Interfaces to external collaborators.

pub mod channels;
pub mod market_data;

pub use channels::{BroadcastTarget, DirectChannel, LogChannel};
pub use market_data::{MarketDataSource, PlaceholderMarketDataSource};
