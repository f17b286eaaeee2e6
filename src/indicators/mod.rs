//! Technical indicator engine.
//!
//! Computes the configured indicator set from a market snapshot. Each
//! indicator degrades independently: too little history turns that one
//! indicator into `None` instead of failing the whole set.

pub mod momentum;
pub mod trend;
pub mod volatility;

pub use momentum::*;
pub use trend::*;
pub use volatility::*;

use crate::models::indicators::IndicatorSet;
use crate::models::market::MarketSnapshot;

/// Indicator window parameters, read once at startup.
#[derive(Debug, Clone)]
pub struct IndicatorConfig {
    pub rsi_period: usize,
    pub macd_fast: usize,
    pub macd_slow: usize,
    pub macd_signal: usize,
    pub bollinger_period: usize,
    pub bollinger_std_dev: f64,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            bollinger_period: 20,
            bollinger_std_dev: 2.0,
        }
    }
}

/// Computes an [`IndicatorSet`] from a snapshot.
pub struct IndicatorEngine {
    config: IndicatorConfig,
}

impl IndicatorEngine {
    pub fn new(config: IndicatorConfig) -> Self {
        Self { config }
    }

    /// Latest indicator values for the snapshot, or `None` when the
    /// snapshot carries no bars at all.
    pub fn compute(&self, snapshot: &MarketSnapshot) -> Option<IndicatorSet> {
        let latest = snapshot.latest()?;
        let candles = &snapshot.candles;
        let (ema_fast, ema_slow) = trend::calculate_ema_pair(candles);

        Some(
            IndicatorSet::new(snapshot.symbol.clone(), latest.timestamp, latest.close)
                .with_rsi(momentum::calculate_rsi(candles, self.config.rsi_period))
                .with_macd(momentum::calculate_macd(
                    candles,
                    self.config.macd_fast,
                    self.config.macd_slow,
                    self.config.macd_signal,
                ))
                .with_bollinger(volatility::calculate_bollinger_bands(
                    candles,
                    self.config.bollinger_period,
                    self.config.bollinger_std_dev,
                ))
                .with_emas(ema_fast, ema_slow),
        )
    }
}
