//! Signalpost: scheduled technical analysis with subscriber distribution.
//!
//! Candles come in through a pluggable market data source, the indicator
//! and rule engines turn them into at most one signal per asset, and the
//! distribution pipeline persists each signal and fans it out to the
//! broadcast channel plus every eligible subscriber. A single scheduler
//! task drives the hourly analysis cycle and the daily subscription
//! expiry sweep.

pub mod common;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
pub mod store;
pub mod subscriptions;
