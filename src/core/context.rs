//! Shared dependencies handed to every scheduled task.

use std::sync::Arc;

use crate::dispatch::DistributionPipeline;
use crate::metrics::Metrics;
use crate::signals::SignalEngine;
use crate::store::Store;
use crate::subscriptions::SubscriptionLedger;

/// Everything a cycle needs, wired once at startup.
///
/// Tasks get read-only access; nothing in here is mutated after boot.
pub struct AppContext {
    pub engine: SignalEngine,
    pub pipeline: DistributionPipeline,
    pub ledger: Arc<SubscriptionLedger>,
    pub store: Arc<dyn Store>,
    pub metrics: Arc<Metrics>,
    /// Days-ahead window for the daily expiry warnings.
    pub warning_days: i64,
}

impl AppContext {
    pub fn new(
        engine: SignalEngine,
        pipeline: DistributionPipeline,
        ledger: Arc<SubscriptionLedger>,
        store: Arc<dyn Store>,
        metrics: Arc<Metrics>,
        warning_days: i64,
    ) -> Self {
        Self {
            engine,
            pipeline,
            ledger,
            store,
            metrics,
            warning_days,
        }
    }
}
