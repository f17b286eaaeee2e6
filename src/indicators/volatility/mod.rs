//! Volatility indicators: Bollinger Bands.

pub mod bollinger;

pub use bollinger::*;
