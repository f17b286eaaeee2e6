//! Error taxonomy shared across the engine layers.
//!
//! Failures inside one unit of work (one asset, one recipient) are contained
//! where they happen and never surface as these types to a whole cycle; only
//! store and configuration failures can abort anything larger.

use thiserror::Error;

/// Startup configuration problems. Always fatal: the process must not start.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("invalid value {value:?} for {name}: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Market data could not be produced for a symbol.
///
/// An *empty* snapshot is not an error: sources report "no data" by
/// returning an empty series and callers treat that as a skip condition.
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("market data source failed for {symbol}: {message}")]
    Source { symbol: String, message: String },
}

/// An outbound send to the broadcast target or a single recipient failed.
///
/// Never retried within the same cycle; logged and contained to the one
/// delivery that failed.
#[derive(Debug, Error)]
#[error("send failed: {0}")]
pub struct SendError(pub String);

/// Persistence layer failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Failure of a whole scheduled trigger run.
///
/// Store trouble is the only thing that aborts a cycle's writes; the
/// scheduler logs it and still fires the next tick.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
