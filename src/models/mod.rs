//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod market;
pub mod signal;
pub mod subscriber;

pub use indicators::{BollingerBands, IndicatorSet, MacdIndicator};
pub use market::{Candle, MarketSnapshot};
pub use signal::{Signal, SignalCandidate, SignalDirection, SignalStrength, TradeOutcome};
pub use subscriber::{
    NotificationCategory, NotificationRecord, Subscriber, Subscription, SubscriptionStatus,
};
