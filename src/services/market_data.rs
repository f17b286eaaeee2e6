//! Market data source interface.
//!
//! The real network client lives outside this crate; the engine only sees
//! this trait. Sources report "no data" with an empty snapshot, never an
//! error.

use async_trait::async_trait;

use crate::error::MarketDataError;
use crate::models::market::MarketSnapshot;

#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Fetch up to `lookback_bars` of history for a symbol, oldest first.
    async fn fetch(
        &self,
        symbol: &str,
        lookback_bars: usize,
    ) -> Result<MarketSnapshot, MarketDataError>;
}

/// Stand-in source that always reports "no data". Useful for wiring the
/// service before a real feed is attached.
pub struct PlaceholderMarketDataSource;

#[async_trait]
impl MarketDataSource for PlaceholderMarketDataSource {
    async fn fetch(
        &self,
        symbol: &str,
        _lookback_bars: usize,
    ) -> Result<MarketSnapshot, MarketDataError> {
        Ok(MarketSnapshot::empty(symbol))
    }
}
