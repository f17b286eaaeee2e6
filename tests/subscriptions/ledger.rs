//! Unit tests for the subscription ledger

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use signalpost::error::StoreError;
use signalpost::metrics::Metrics;
use signalpost::models::signal::{Signal, SignalCandidate, TradeOutcome};
use signalpost::models::subscriber::{
    NotificationCategory, NotificationRecord, Subscriber, Subscription, SubscriptionStatus,
};
use signalpost::store::{MemoryStore, Store};
use signalpost::subscriptions::SubscriptionLedger;

/// Store wrapper that counts subscription writes, so tests can prove the
/// lazy expiry transition is persisted exactly once.
struct CountingStore {
    inner: MemoryStore,
    puts: AtomicUsize,
}

impl CountingStore {
    fn new() -> Self {
        Self {
            inner: MemoryStore::new(),
            puts: AtomicUsize::new(0),
        }
    }

    fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Store for CountingStore {
    async fn create_subscriber(
        &self,
        recipient_id: &str,
        handle: Option<String>,
    ) -> Result<Subscriber, StoreError> {
        self.inner.create_subscriber(recipient_id, handle).await
    }

    async fn subscriber(&self, id: i64) -> Result<Option<Subscriber>, StoreError> {
        self.inner.subscriber(id).await
    }

    async fn subscriber_by_recipient(
        &self,
        recipient_id: &str,
    ) -> Result<Option<Subscriber>, StoreError> {
        self.inner.subscriber_by_recipient(recipient_id).await
    }

    async fn subscription(&self, subscriber_id: i64) -> Result<Option<Subscription>, StoreError> {
        self.inner.subscription(subscriber_id).await
    }

    async fn put_subscription(&self, subscription: &Subscription) -> Result<(), StoreError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put_subscription(subscription).await
    }

    async fn subscriptions_with_status(
        &self,
        statuses: &[SubscriptionStatus],
    ) -> Result<Vec<(Subscriber, Subscription)>, StoreError> {
        self.inner.subscriptions_with_status(statuses).await
    }

    async fn insert_signal(&self, candidate: &SignalCandidate) -> Result<Signal, StoreError> {
        self.inner.insert_signal(candidate).await
    }

    async fn update_signal_outcome(
        &self,
        id: i64,
        outcome: TradeOutcome,
        profit_loss: Option<f64>,
    ) -> Result<Signal, StoreError> {
        self.inner.update_signal_outcome(id, outcome, profit_loss).await
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>, StoreError> {
        self.inner.recent_signals(limit).await
    }

    async fn append_notification(
        &self,
        subscriber_id: i64,
        message: &str,
        category: NotificationCategory,
    ) -> Result<NotificationRecord, StoreError> {
        self.inner
            .append_notification(subscriber_id, message, category)
            .await
    }

    async fn notifications_for(
        &self,
        subscriber_id: i64,
    ) -> Result<Vec<NotificationRecord>, StoreError> {
        self.inner.notifications_for(subscriber_id).await
    }
}

fn ledger_over(store: Arc<dyn Store>) -> SubscriptionLedger {
    let metrics = Arc::new(Metrics::new().expect("metrics initialization"));
    SubscriptionLedger::new(store, metrics)
}

async fn seed_subscriber(store: &dyn Store, recipient: &str) -> Subscriber {
    store
        .create_subscriber(recipient, None)
        .await
        .expect("create subscriber")
}

async fn seed_subscription(
    store: &dyn Store,
    subscriber_id: i64,
    status: SubscriptionStatus,
    ends_in_hours: i64,
) {
    let now = Utc::now();
    store
        .put_subscription(&Subscription {
            subscriber_id,
            status,
            start_date: now - Duration::days(3),
            end_date: Some(now + Duration::hours(ends_in_hours)),
            payment_amount: 0.0,
            payment_method: None,
        })
        .await
        .expect("seed subscription");
}

#[tokio::test]
async fn create_trial_starts_a_trial_window() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    let subscriber = seed_subscriber(store.as_ref(), "tg:1").await;

    let sub = ledger.create_trial(subscriber.id, 3).await.unwrap();
    assert_eq!(sub.status, SubscriptionStatus::Trial);
    assert_eq!(sub.payment_amount, 0.0);
    assert!(sub.payment_method.is_none());
    // whole days truncate, so a just-created 3-day trial reads as 2
    assert_eq!(ledger.days_remaining(&sub), 2);
    assert!(ledger.is_eligible(subscriber.id).await.unwrap());
}

#[tokio::test]
async fn activate_creates_an_active_subscription_from_nothing() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    let subscriber = seed_subscriber(store.as_ref(), "tg:1").await;

    let sub = ledger
        .activate(subscriber.id, 49.99, "card", 30)
        .await
        .unwrap();
    assert_eq!(sub.status, SubscriptionStatus::Active);
    assert_eq!(sub.payment_amount, 49.99);
    assert_eq!(sub.payment_method.as_deref(), Some("card"));
    assert_eq!(ledger.days_remaining(&sub), 29);
}

#[tokio::test]
async fn activate_is_the_way_back_from_expired() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    let subscriber = seed_subscriber(store.as_ref(), "tg:1").await;
    seed_subscription(store.as_ref(), subscriber.id, SubscriptionStatus::Expired, -24).await;

    assert!(!ledger.is_eligible(subscriber.id).await.unwrap());

    ledger.activate(subscriber.id, 20.0, "crypto", 30).await.unwrap();
    assert!(ledger.is_eligible(subscriber.id).await.unwrap());
}

#[tokio::test]
async fn eligibility_without_subscription_is_false() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());
    let subscriber = seed_subscriber(store.as_ref(), "tg:1").await;

    assert!(!ledger.is_eligible(subscriber.id).await.unwrap());
}

#[tokio::test]
async fn lazy_expiry_persists_exactly_once() {
    let store = Arc::new(CountingStore::new());
    let ledger = ledger_over(store.clone());
    let subscriber = seed_subscriber(store.as_ref(), "tg:1").await;
    seed_subscription(store.as_ref(), subscriber.id, SubscriptionStatus::Trial, -2).await;
    let writes_before = store.put_count();

    assert!(!ledger.is_eligible(subscriber.id).await.unwrap());
    assert_eq!(store.put_count(), writes_before + 1, "first read commits the transition");

    assert!(!ledger.is_eligible(subscriber.id).await.unwrap());
    assert_eq!(store.put_count(), writes_before + 1, "second read must not write");

    let stored = store.subscription(subscriber.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Expired);
}

#[tokio::test]
async fn suspended_subscription_never_becomes_eligible() {
    let store = Arc::new(CountingStore::new());
    let ledger = ledger_over(store.clone());
    let subscriber = seed_subscriber(store.as_ref(), "tg:1").await;
    seed_subscription(store.as_ref(), subscriber.id, SubscriptionStatus::Suspended, 100).await;
    let writes_before = store.put_count();

    assert!(!ledger.is_eligible(subscriber.id).await.unwrap());
    assert_eq!(store.put_count(), writes_before, "terminal status never writes");
}

#[tokio::test]
async fn broadcast_list_drops_stale_subscriptions_on_read() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());

    let fresh = seed_subscriber(store.as_ref(), "tg:fresh").await;
    seed_subscription(store.as_ref(), fresh.id, SubscriptionStatus::Trial, 48).await;

    let stale = seed_subscriber(store.as_ref(), "tg:stale").await;
    seed_subscription(store.as_ref(), stale.id, SubscriptionStatus::Active, -1).await;

    let expired = seed_subscriber(store.as_ref(), "tg:expired").await;
    seed_subscription(store.as_ref(), expired.id, SubscriptionStatus::Expired, 48).await;

    let eligible = ledger.list_eligible_for_broadcast().await.unwrap();
    let ids: Vec<i64> = eligible.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![fresh.id]);

    // the stale row was transitioned while listing
    let stored = store.subscription(stale.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Expired);
}

#[tokio::test]
async fn expiring_window_is_inclusive_of_the_cutoff_day_only() {
    let store = Arc::new(MemoryStore::new());
    let ledger = ledger_over(store.clone());

    let soon = seed_subscriber(store.as_ref(), "tg:soon").await;
    seed_subscription(store.as_ref(), soon.id, SubscriptionStatus::Active, 12).await;

    let later = seed_subscriber(store.as_ref(), "tg:later").await;
    seed_subscription(store.as_ref(), later.id, SubscriptionStatus::Active, 36).await;

    let lapsed = seed_subscriber(store.as_ref(), "tg:lapsed").await;
    seed_subscription(store.as_ref(), lapsed.id, SubscriptionStatus::Trial, -2).await;

    let expiring = ledger.list_expiring_within(1).await.unwrap();
    let ids: Vec<i64> = expiring.iter().map(|(s, _)| s.id).collect();
    assert_eq!(ids, vec![soon.id], "only the within-window, still-eligible row");

    // the lapsed row fell out by expiring on read, not by the window check
    let stored = store.subscription(lapsed.id).await.unwrap().unwrap();
    assert_eq!(stored.status, SubscriptionStatus::Expired);
}
