//! Persistence interface.
//!
//! Durable storage is an external collaborator; the engine depends only on
//! this trait. Implementations must make every method atomic over the one
//! entity it touches (no call spans multiple subscribers) and must treat
//! signal/notification inserts as append-only.

pub mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::signal::{Signal, SignalCandidate, TradeOutcome};
use crate::models::subscriber::{
    NotificationCategory, NotificationRecord, Subscriber, Subscription, SubscriptionStatus,
};

#[async_trait]
pub trait Store: Send + Sync {
    /// Register a subscriber at first contact.
    async fn create_subscriber(
        &self,
        recipient_id: &str,
        handle: Option<String>,
    ) -> Result<Subscriber, StoreError>;

    async fn subscriber(&self, id: i64) -> Result<Option<Subscriber>, StoreError>;

    async fn subscriber_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Option<Subscriber>, StoreError>;

    /// The subscriber's subscription, if one was ever created.
    async fn subscription(&self, subscriber_id: i64) -> Result<Option<Subscription>, StoreError>;

    /// Atomic single-entity upsert of one subscription.
    async fn put_subscription(&self, subscription: &Subscription) -> Result<(), StoreError>;

    /// Subscriber/subscription pairs whose status is in `statuses`.
    async fn subscriptions_with_status(
        &self,
        statuses: &[SubscriptionStatus],
    ) -> Result<Vec<(Subscriber, Subscription)>, StoreError>;

    /// Append the chosen candidate as a new Pending signal.
    async fn insert_signal(&self, candidate: &SignalCandidate) -> Result<Signal, StoreError>;

    /// Atomic outcome update used by out-of-band reconciliation. Sets
    /// `closed_at` whenever the outcome leaves Pending.
    async fn update_signal_outcome(
        &self,
        id: i64,
        outcome: TradeOutcome,
        profit_loss: Option<f64>,
    ) -> Result<Signal, StoreError>;

    /// Most recent signals, newest first.
    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>, StoreError>;

    /// Append one delivery record to the audit trail.
    async fn append_notification(
        &self,
        subscriber_id: i64,
        message: &str,
        category: NotificationCategory,
    ) -> Result<NotificationRecord, StoreError>;

    /// Audit trail for one subscriber in append order.
    async fn notifications_for(
        &self,
        subscriber_id: i64,
    ) -> Result<Vec<NotificationRecord>, StoreError>;
}
