//! Subscription ledger: the only owner of status transitions.
//!
//! Eligibility is lazy: Trial/Active subscriptions past their end date are
//! moved to Expired the first time eligibility is evaluated, and that
//! transition is persisted right there. The decision itself is the pure
//! [`Subscription::evaluate_at`]; this module adds the persist step.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::info;

use crate::error::StoreError;
use crate::metrics::Metrics;
use crate::models::subscriber::{Subscriber, Subscription, SubscriptionStatus};
use crate::store::Store;

pub struct SubscriptionLedger {
    store: Arc<dyn Store>,
    metrics: Arc<Metrics>,
}

impl SubscriptionLedger {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    /// Whether the subscriber may receive distributions right now.
    ///
    /// Reads the current row, evaluates it, and persists the Expired
    /// transition when one is due, so a repeat call finds the terminal
    /// status and writes nothing. No subscription at all reads as false.
    pub async fn is_eligible(&self, subscriber_id: i64) -> Result<bool, StoreError> {
        let Some(subscription) = self.store.subscription(subscriber_id).await? else {
            return Ok(false);
        };

        let (new_status, eligible) = subscription.evaluate_at(Utc::now());
        if new_status != subscription.status {
            let mut updated = subscription.clone();
            updated.status = new_status;
            self.store.put_subscription(&updated).await?;
            self.metrics.subscriptions_expired_total.inc();
            info!(
                subscriber_id = subscriber_id,
                from = subscription.status.as_str(),
                to = new_status.as_str(),
                "subscription for {} lapsed to {}",
                subscriber_id,
                new_status.as_str()
            );
        }
        Ok(eligible)
    }

    /// Whole days until expiry, floored at zero. Never transitions status.
    pub fn days_remaining(&self, subscription: &Subscription) -> i64 {
        subscription.days_remaining_at(Utc::now())
    }

    /// Start (or restart) a paid subscription. The only path out of
    /// Expired or Suspended; works whether or not a row existed before.
    pub async fn activate(
        &self,
        subscriber_id: i64,
        amount_paid: f64,
        method: &str,
        duration_days: i64,
    ) -> Result<Subscription, StoreError> {
        let now = Utc::now();
        let previous = self.store.subscription(subscriber_id).await?;
        let subscription = Subscription {
            subscriber_id,
            status: SubscriptionStatus::Active,
            start_date: now,
            end_date: Some(now + Duration::days(duration_days)),
            payment_amount: amount_paid,
            payment_method: Some(method.to_string()),
        };
        self.store.put_subscription(&subscription).await?;
        info!(
            subscriber_id = subscriber_id,
            amount = amount_paid,
            duration_days = duration_days,
            previous_status = previous.map(|p| p.status.as_str()).unwrap_or("none"),
            "activated subscription for {}",
            subscriber_id
        );
        Ok(subscription)
    }

    /// Create the free trial at first contact. Callers invoke this exactly
    /// once per subscriber, before any other subscription exists.
    pub async fn create_trial(
        &self,
        subscriber_id: i64,
        trial_days: i64,
    ) -> Result<Subscription, StoreError> {
        let now = Utc::now();
        let subscription = Subscription {
            subscriber_id,
            status: SubscriptionStatus::Trial,
            start_date: now,
            end_date: Some(now + Duration::days(trial_days)),
            payment_amount: 0.0,
            payment_method: None,
        };
        self.store.put_subscription(&subscription).await?;
        info!(
            subscriber_id = subscriber_id,
            trial_days = trial_days,
            "created trial subscription for {}",
            subscriber_id
        );
        Ok(subscription)
    }

    /// Everyone currently entitled to the signal fan-out. The lazy expiry
    /// check runs on each candidate, so stale Trial/Active rows fall out
    /// here (and get persisted as Expired) rather than receiving mail.
    pub async fn list_eligible_for_broadcast(&self) -> Result<Vec<Subscriber>, StoreError> {
        let candidates = self
            .store
            .subscriptions_with_status(&[SubscriptionStatus::Trial, SubscriptionStatus::Active])
            .await?;

        let mut eligible = Vec::with_capacity(candidates.len());
        for (subscriber, _) in candidates {
            if self.is_eligible(subscriber.id).await? {
                eligible.push(subscriber);
            }
        }
        Ok(eligible)
    }

    /// Still-eligible subscribers whose subscription ends within `days`.
    /// Returned with their subscription so callers can word the warning.
    pub async fn list_expiring_within(
        &self,
        days: i64,
    ) -> Result<Vec<(Subscriber, Subscription)>, StoreError> {
        let cutoff = Utc::now() + Duration::days(days);
        let candidates = self
            .store
            .subscriptions_with_status(&[SubscriptionStatus::Trial, SubscriptionStatus::Active])
            .await?;

        let mut expiring = Vec::new();
        for (subscriber, subscription) in candidates {
            let ends_soon = subscription.end_date.is_some_and(|end| end <= cutoff);
            if ends_soon && self.is_eligible(subscriber.id).await? {
                expiring.push((subscriber, subscription));
            }
        }
        Ok(expiring)
    }
}
