//! Subscriber, subscription lifecycle and notification audit types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A person receiving distributions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscriber {
    pub id: i64,
    /// Stable transport address used by the direct channel.
    pub recipient_id: String,
    /// Display handle, if the transport knows one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    pub joined_at: DateTime<Utc>,
}

/// Lifecycle status of a subscription.
///
/// `Expired` and `Suspended` are terminal for eligibility: nothing but an
/// explicit [`activate`](crate::subscriptions::SubscriptionLedger::activate)
/// moves a subscription out of them. `Suspended` is only ever set by manual
/// administrative action through the store; no engine code produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trial,
    Active,
    Expired,
    Suspended,
}

impl SubscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatus::Trial => "trial",
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Suspended => "suspended",
        }
    }
}

/// At most one per subscriber. All status transitions go through the
/// subscription ledger; no other component mutates `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    pub subscriber_id: i64,
    pub status: SubscriptionStatus,
    pub start_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub payment_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
}

impl Subscription {
    /// Pure eligibility evaluation: returns the status the subscription
    /// should have at `now` and whether it is eligible.
    ///
    /// Does not mutate anything; the ledger persists the transition when
    /// the returned status differs from the stored one.
    pub fn evaluate_at(&self, now: DateTime<Utc>) -> (SubscriptionStatus, bool) {
        match self.status {
            SubscriptionStatus::Expired | SubscriptionStatus::Suspended => (self.status, false),
            SubscriptionStatus::Trial | SubscriptionStatus::Active => match self.end_date {
                Some(end) if now > end => (SubscriptionStatus::Expired, false),
                _ => (self.status, true),
            },
        }
    }

    /// Whole days until `end_date`, floored at zero. No end date reads as 0.
    /// Pure: never triggers the lazy expiry transition.
    pub fn days_remaining_at(&self, now: DateTime<Utc>) -> i64 {
        match self.end_date {
            Some(end) => (end - now).num_days().max(0),
            None => 0,
        }
    }
}

/// Category of a recorded notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationCategory {
    Signal,
    Subscription,
    Broadcast,
    System,
}

impl NotificationCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Signal => "signal",
            NotificationCategory::Subscription => "subscription",
            NotificationCategory::Broadcast => "broadcast",
            NotificationCategory::System => "system",
        }
    }
}

/// Append-only audit record of one delivered message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub id: i64,
    pub subscriber_id: i64,
    pub message: String,
    pub category: NotificationCategory,
    pub sent_at: DateTime<Utc>,
}
