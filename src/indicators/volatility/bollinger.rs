//! Bollinger Bands indicator.

use crate::common::math;
use crate::models::indicators::BollingerBands;
use crate::models::market::Candle;

/// Calculate Bollinger Bands.
///
/// Middle = SMA(period), Upper/Lower = Middle ± std_dev × σ(period).
pub fn calculate_bollinger_bands(
    candles: &[Candle],
    period: usize,
    std_dev: f64,
) -> Option<BollingerBands> {
    if period == 0 || candles.len() < period {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let middle = math::sma(&closes, period)?;
    let sigma = math::standard_deviation(&closes, period)?;

    Some(BollingerBands {
        upper: middle + std_dev * sigma,
        middle,
        lower: middle - std_dev * sigma,
    })
}
