//! Distribution pipeline: persist a signal, post it to the broadcast
//! channel, then fan it out to every eligible subscriber.
//!
//! Failure handling is deliberately uneven. Store errors abort the cycle;
//! a failed channel post or a failed per-recipient delivery is logged,
//! counted, and skipped so one bad recipient never starves the rest.

pub mod message;

use std::sync::Arc;
use std::time::Duration;

use tracing::{error, info};

use crate::error::{CycleError, SendError};
use crate::metrics::Metrics;
use crate::models::signal::{Signal, SignalCandidate};
use crate::models::subscriber::{NotificationCategory, Subscriber};
use crate::services::{BroadcastTarget, DirectChannel};
use crate::store::Store;
use crate::subscriptions::SubscriptionLedger;

pub struct DistributionPipeline {
    store: Arc<dyn Store>,
    ledger: Arc<SubscriptionLedger>,
    broadcast: Arc<dyn BroadcastTarget>,
    direct: Arc<dyn DirectChannel>,
    metrics: Arc<Metrics>,
    pacing: Duration,
}

impl DistributionPipeline {
    pub fn new(
        store: Arc<dyn Store>,
        ledger: Arc<SubscriptionLedger>,
        broadcast: Arc<dyn BroadcastTarget>,
        direct: Arc<dyn DirectChannel>,
        metrics: Arc<Metrics>,
        pacing: Duration,
    ) -> Self {
        Self {
            store,
            ledger,
            broadcast,
            direct,
            metrics,
            pacing,
        }
    }

    /// Run the full pipeline for one candidate: persist, broadcast, fan out.
    ///
    /// Returns the persisted [`Signal`]. Only store failures surface as
    /// errors; delivery failures are absorbed here.
    pub async fn distribute(&self, candidate: &SignalCandidate) -> Result<Signal, CycleError> {
        let signal = self.store.insert_signal(candidate).await?;
        info!(
            signal_id = signal.id,
            symbol = %signal.symbol,
            direction = signal.direction.as_str(),
            strategy = %signal.strategy,
            "persisted signal {} for {}",
            signal.id,
            signal.symbol
        );

        let channel_text = message::channel_message(candidate, signal.created_at);
        if let Err(e) = self.broadcast.send(&channel_text).await {
            self.metrics.delivery_failures_total.inc();
            error!(
                signal_id = signal.id,
                symbol = %signal.symbol,
                error = %e,
                "failed to post signal {} to broadcast channel",
                signal.id
            );
        }

        let recipients = self.ledger.list_eligible_for_broadcast().await?;
        let subscriber_text = message::subscriber_message(candidate, signal.created_at);
        let mut delivered = 0usize;
        for subscriber in &recipients {
            if self
                .send_direct(subscriber, &subscriber_text, NotificationCategory::Signal)
                .await?
            {
                delivered += 1;
            }
        }

        self.metrics.signals_distributed_total.inc();
        info!(
            signal_id = signal.id,
            symbol = %signal.symbol,
            recipients = recipients.len(),
            delivered = delivered,
            "distributed signal {} to {}/{} subscribers",
            signal.id,
            delivered,
            recipients.len()
        );
        Ok(signal)
    }

    /// Distribute a batch in order, pausing between consecutive signals so
    /// downstream transports are not hammered.
    pub async fn distribute_all(
        &self,
        candidates: &[SignalCandidate],
    ) -> Result<Vec<Signal>, CycleError> {
        let mut signals = Vec::with_capacity(candidates.len());
        for (index, candidate) in candidates.iter().enumerate() {
            signals.push(self.distribute(candidate).await?);
            if index + 1 < candidates.len() {
                tokio::time::sleep(self.pacing).await;
            }
        }
        Ok(signals)
    }

    /// Send one direct message and record it. A transport refusal is not an
    /// error to the caller: it logs, counts, and reports `false`, and no
    /// notification record is written.
    pub async fn send_direct(
        &self,
        subscriber: &Subscriber,
        text: &str,
        category: NotificationCategory,
    ) -> Result<bool, CycleError> {
        match self.direct.send(&subscriber.recipient_id, text).await {
            Ok(()) => {
                self.store
                    .append_notification(subscriber.id, text, category)
                    .await?;
                self.metrics.deliveries_total.inc();
                Ok(true)
            }
            Err(SendError(reason)) => {
                self.metrics.delivery_failures_total.inc();
                error!(
                    subscriber_id = subscriber.id,
                    recipient_id = %subscriber.recipient_id,
                    error = %reason,
                    "failed to deliver message to subscriber {}",
                    subscriber.id
                );
                Ok(false)
            }
        }
    }
}
