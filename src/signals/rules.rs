//! The four signal rules, evaluated in fixed order.
//!
//! Each rule consults the indicator set and yields at most one candidate.
//! A rule whose required indicators are absent stays silent.

use crate::models::indicators::IndicatorSet;
use crate::models::signal::{SignalCandidate, SignalDirection, SignalStrength};

/// RSI below this is a strong (not just medium) oversold reading.
pub const RSI_STRONG_OVERSOLD: f64 = 20.0;
/// RSI above this is a strong overbought reading.
pub const RSI_STRONG_OVERBOUGHT: f64 = 80.0;

/// Rule thresholds, read once at startup.
#[derive(Debug, Clone)]
pub struct SignalConfig {
    pub rsi_oversold: f64,
    pub rsi_overbought: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            rsi_oversold: 30.0,
            rsi_overbought: 70.0,
        }
    }
}

fn candidate(
    set: &IndicatorSet,
    direction: SignalDirection,
    strategy: &str,
    strength: SignalStrength,
    rationale: String,
) -> SignalCandidate {
    SignalCandidate {
        symbol: set.symbol.clone(),
        direction,
        strategy: strategy.to_string(),
        strength,
        rationale,
        price: set.close,
    }
}

/// RSI extremes: oversold buys, overbought sells.
pub fn rsi_rule(set: &IndicatorSet, config: &SignalConfig) -> Option<SignalCandidate> {
    let rsi = set.rsi?;
    if rsi < config.rsi_oversold {
        let strength = if rsi < RSI_STRONG_OVERSOLD {
            SignalStrength::Strong
        } else {
            SignalStrength::Medium
        };
        Some(candidate(
            set,
            SignalDirection::Buy,
            "RSI Oversold",
            strength,
            format!(
                "RSI ({:.2}) below oversold threshold ({})",
                rsi, config.rsi_oversold
            ),
        ))
    } else if rsi > config.rsi_overbought {
        let strength = if rsi > RSI_STRONG_OVERBOUGHT {
            SignalStrength::Strong
        } else {
            SignalStrength::Medium
        };
        Some(candidate(
            set,
            SignalDirection::Sell,
            "RSI Overbought",
            strength,
            format!(
                "RSI ({:.2}) above overbought threshold ({})",
                rsi, config.rsi_overbought
            ),
        ))
    } else {
        None
    }
}

/// MACD line/signal agreement. Deliberately stricter than a plain
/// crossover: both the line/signal ordering and the histogram sign must
/// agree, so mixed readings stay silent.
pub fn macd_rule(set: &IndicatorSet) -> Option<SignalCandidate> {
    let macd = set.macd?;
    if macd.line > macd.signal && macd.histogram > 0.0 {
        Some(candidate(
            set,
            SignalDirection::Buy,
            "MACD Bullish",
            SignalStrength::Medium,
            format!(
                "MACD ({:.4}) above signal line ({:.4})",
                macd.line, macd.signal
            ),
        ))
    } else if macd.line < macd.signal && macd.histogram < 0.0 {
        Some(candidate(
            set,
            SignalDirection::Sell,
            "MACD Bearish",
            SignalStrength::Medium,
            format!(
                "MACD ({:.4}) below signal line ({:.4})",
                macd.line, macd.signal
            ),
        ))
    } else {
        None
    }
}

/// Bollinger band breaches: close at or beyond a band.
pub fn bollinger_rule(set: &IndicatorSet) -> Option<SignalCandidate> {
    let bands = set.bollinger?;
    if set.close <= bands.lower {
        Some(candidate(
            set,
            SignalDirection::Buy,
            "Bollinger Bands",
            SignalStrength::Medium,
            format!(
                "Price ({:.2}) at or below lower Bollinger Band ({:.2})",
                set.close, bands.lower
            ),
        ))
    } else if set.close >= bands.upper {
        Some(candidate(
            set,
            SignalDirection::Sell,
            "Bollinger Bands",
            SignalStrength::Medium,
            format!(
                "Price ({:.2}) at or above upper Bollinger Band ({:.2})",
                set.close, bands.upper
            ),
        ))
    } else {
        None
    }
}

/// EMA 20/50 crossover. The weakest opinion: it fires on any separation
/// of the pair, so it only wins a cycle when nothing else speaks.
pub fn ema_rule(set: &IndicatorSet) -> Option<SignalCandidate> {
    let fast = set.ema_fast?;
    let slow = set.ema_slow?;
    if fast > slow {
        Some(candidate(
            set,
            SignalDirection::Buy,
            "EMA Crossover",
            SignalStrength::Weak,
            format!("EMA 20 ({:.2}) above EMA 50 ({:.2})", fast, slow),
        ))
    } else if fast < slow {
        Some(candidate(
            set,
            SignalDirection::Sell,
            "EMA Crossover",
            SignalStrength::Weak,
            format!("EMA 20 ({:.2}) below EMA 50 ({:.2})", fast, slow),
        ))
    } else {
        None
    }
}
