//! In-memory store used by tests and the default service wiring.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::signal::{Signal, SignalCandidate, TradeOutcome};
use crate::models::subscriber::{
    NotificationCategory, NotificationRecord, Subscriber, Subscription, SubscriptionStatus,
};
use crate::store::Store;

/// Map- and vec-backed [`Store`]. Each method takes a single lock, which
/// gives the per-entity atomicity the trait requires.
#[derive(Default)]
pub struct MemoryStore {
    subscribers: RwLock<HashMap<i64, Subscriber>>,
    subscriptions: RwLock<HashMap<i64, Subscription>>,
    signals: RwLock<Vec<Signal>>,
    notifications: RwLock<Vec<NotificationRecord>>,
    next_subscriber_id: AtomicI64,
    next_signal_id: AtomicI64,
    next_notification_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(counter: &AtomicI64) -> i64 {
        counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_subscriber(
        &self,
        recipient_id: &str,
        handle: Option<String>,
    ) -> Result<Subscriber, StoreError> {
        let mut subscribers = self.subscribers.write().await;
        let subscriber = Subscriber {
            id: Self::next_id(&self.next_subscriber_id),
            recipient_id: recipient_id.to_string(),
            handle,
            joined_at: Utc::now(),
        };
        subscribers.insert(subscriber.id, subscriber.clone());
        Ok(subscriber)
    }

    async fn subscriber(&self, id: i64) -> Result<Option<Subscriber>, StoreError> {
        Ok(self.subscribers.read().await.get(&id).cloned())
    }

    async fn subscriber_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Option<Subscriber>, StoreError> {
        Ok(self
            .subscribers
            .read()
            .await
            .values()
            .find(|s| s.recipient_id == recipient_id)
            .cloned())
    }

    async fn subscription(&self, subscriber_id: i64) -> Result<Option<Subscription>, StoreError> {
        Ok(self.subscriptions.read().await.get(&subscriber_id).cloned())
    }

    async fn put_subscription(&self, subscription: &Subscription) -> Result<(), StoreError> {
        self.subscriptions
            .write()
            .await
            .insert(subscription.subscriber_id, subscription.clone());
        Ok(())
    }

    async fn subscriptions_with_status(
        &self,
        statuses: &[SubscriptionStatus],
    ) -> Result<Vec<(Subscriber, Subscription)>, StoreError> {
        let subscriptions = self.subscriptions.read().await;
        let subscribers = self.subscribers.read().await;
        let mut matched: Vec<(Subscriber, Subscription)> = subscriptions
            .values()
            .filter(|sub| statuses.contains(&sub.status))
            .filter_map(|sub| {
                subscribers
                    .get(&sub.subscriber_id)
                    .map(|s| (s.clone(), sub.clone()))
            })
            .collect();
        matched.sort_by_key(|(s, _)| s.id);
        Ok(matched)
    }

    async fn insert_signal(&self, candidate: &SignalCandidate) -> Result<Signal, StoreError> {
        let mut signals = self.signals.write().await;
        let signal = Signal {
            id: Self::next_id(&self.next_signal_id),
            symbol: candidate.symbol.clone(),
            direction: candidate.direction,
            strategy: candidate.strategy.clone(),
            strength: candidate.strength,
            rationale: candidate.rationale.clone(),
            entry_price: candidate.price,
            created_at: Utc::now(),
            outcome: TradeOutcome::Pending,
            profit_loss: None,
            closed_at: None,
        };
        signals.push(signal.clone());
        Ok(signal)
    }

    async fn update_signal_outcome(
        &self,
        id: i64,
        outcome: TradeOutcome,
        profit_loss: Option<f64>,
    ) -> Result<Signal, StoreError> {
        let mut signals = self.signals.write().await;
        let signal = signals
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(StoreError::NotFound {
                entity: "signal",
                id,
            })?;
        signal.outcome = outcome;
        signal.profit_loss = profit_loss;
        if outcome != TradeOutcome::Pending {
            signal.closed_at = Some(Utc::now());
        }
        Ok(signal.clone())
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>, StoreError> {
        let signals = self.signals.read().await;
        Ok(signals.iter().rev().take(limit).cloned().collect())
    }

    async fn append_notification(
        &self,
        subscriber_id: i64,
        message: &str,
        category: NotificationCategory,
    ) -> Result<NotificationRecord, StoreError> {
        let mut notifications = self.notifications.write().await;
        let record = NotificationRecord {
            id: Self::next_id(&self.next_notification_id),
            subscriber_id,
            message: message.to_string(),
            category,
            sent_at: Utc::now(),
        };
        notifications.push(record.clone());
        Ok(record)
    }

    async fn notifications_for(
        &self,
        subscriber_id: i64,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        Ok(self
            .notifications
            .read()
            .await
            .iter()
            .filter(|n| n.subscriber_id == subscriber_id)
            .cloned()
            .collect())
    }
}
