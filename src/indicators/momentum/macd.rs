//! MACD (Moving Average Convergence Divergence) indicator.

use crate::common::math;
use crate::models::indicators::MacdIndicator;
use crate::models::market::Candle;

/// Calculate MACD line, signal line and histogram.
///
/// MACD = EMA(fast) - EMA(slow), Signal = EMA(signal) of the MACD series,
/// Histogram = MACD - Signal. Needs at least `slow + signal` bars so the
/// signal line has a full seed window.
pub fn calculate_macd(
    candles: &[Candle],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Option<MacdIndicator> {
    if fast == 0 || slow <= fast || signal == 0 || candles.len() < slow + signal {
        return None;
    }

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    // Roll both EMAs across the series, emitting a MACD point once the slow
    // EMA is seeded.
    let mut fast_ema: Option<f64> = None;
    let mut slow_ema: Option<f64> = None;
    let mut macd_values = Vec::with_capacity(closes.len() - slow + 1);
    for (i, close) in closes.iter().enumerate() {
        if i + 1 == fast {
            fast_ema = math::sma(&closes[..fast], fast);
        } else if i + 1 > fast {
            fast_ema = fast_ema.map(|prev| math::ema_from_previous(*close, prev, fast));
        }
        if i + 1 == slow {
            slow_ema = math::sma(&closes[..slow], slow);
        } else if i + 1 > slow {
            slow_ema = slow_ema.map(|prev| math::ema_from_previous(*close, prev, slow));
        }
        if let (Some(f), Some(s)) = (fast_ema, slow_ema) {
            macd_values.push(f - s);
        }
    }

    let line = *macd_values.last()?;
    let signal_line = math::ema(&macd_values, signal)?;

    Some(MacdIndicator {
        line,
        signal: signal_line,
        histogram: line - signal_line,
    })
}
