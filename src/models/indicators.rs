//! Indicator value types produced by the indicator engine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// MACD line, signal line and histogram (line minus signal).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdIndicator {
    pub line: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Bollinger Bands around the middle moving average.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BollingerBands {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Latest indicator values for one symbol at one point in time.
///
/// Every field is optional: a `None` means the snapshot was too short for
/// that indicator and must read as "no opinion", never as zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub symbol: String,
    pub timestamp: DateTime<Utc>,
    /// Closing price of the latest bar.
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rsi: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdIndicator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bollinger: Option<BollingerBands>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_fast: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ema_slow: Option<f64>,
}

impl IndicatorSet {
    pub fn new(symbol: impl Into<String>, timestamp: DateTime<Utc>, close: f64) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            close,
            rsi: None,
            macd: None,
            bollinger: None,
            ema_fast: None,
            ema_slow: None,
        }
    }

    pub fn with_rsi(mut self, rsi: Option<f64>) -> Self {
        self.rsi = rsi;
        self
    }

    pub fn with_macd(mut self, macd: Option<MacdIndicator>) -> Self {
        self.macd = macd;
        self
    }

    pub fn with_bollinger(mut self, bollinger: Option<BollingerBands>) -> Self {
        self.bollinger = bollinger;
        self
    }

    pub fn with_emas(mut self, fast: Option<f64>, slow: Option<f64>) -> Self {
        self.ema_fast = fast;
        self.ema_slow = slow;
        self
    }
}
