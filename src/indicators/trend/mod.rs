//! Trend indicators: EMA.

pub mod ema;

pub use ema::*;
