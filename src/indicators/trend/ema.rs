//! EMA (Exponential Moving Average) indicator.

use crate::common::math;
use crate::models::market::Candle;

/// Fast leg of the crossover pair, fixed at 20 bars.
pub const EMA_FAST_PERIOD: usize = 20;
/// Slow leg of the crossover pair, fixed at 50 bars.
pub const EMA_SLOW_PERIOD: usize = 50;

/// Calculate the EMA of closing prices for one period.
pub fn calculate_ema(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period {
        return None;
    }
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    math::ema(&closes, period)
}

/// The 20/50 crossover pair. Either leg is `None` when the series is too
/// short for its window.
pub fn calculate_ema_pair(candles: &[Candle]) -> (Option<f64>, Option<f64>) {
    (
        calculate_ema(candles, EMA_FAST_PERIOD),
        calculate_ema(candles, EMA_SLOW_PERIOD),
    )
}
