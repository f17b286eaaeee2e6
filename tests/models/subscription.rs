//! Unit tests for the pure subscription lifecycle evaluation

use chrono::{Duration, Utc};
use signalpost::models::subscriber::{Subscription, SubscriptionStatus};

fn subscription(status: SubscriptionStatus, ends_in_hours: Option<i64>) -> Subscription {
    let now = Utc::now();
    Subscription {
        subscriber_id: 1,
        status,
        start_date: now - Duration::days(10),
        end_date: ends_in_hours.map(|h| now + Duration::hours(h)),
        payment_amount: 50.0,
        payment_method: Some("card".to_string()),
    }
}

#[test]
fn trial_within_window_is_eligible() {
    let sub = subscription(SubscriptionStatus::Trial, Some(24));
    let (status, eligible) = sub.evaluate_at(Utc::now());
    assert_eq!(status, SubscriptionStatus::Trial);
    assert!(eligible);
}

#[test]
fn trial_past_end_transitions_to_expired() {
    let sub = subscription(SubscriptionStatus::Trial, Some(-1));
    let (status, eligible) = sub.evaluate_at(Utc::now());
    assert_eq!(status, SubscriptionStatus::Expired);
    assert!(!eligible);
}

#[test]
fn active_past_end_transitions_to_expired() {
    let sub = subscription(SubscriptionStatus::Active, Some(-48));
    let (status, eligible) = sub.evaluate_at(Utc::now());
    assert_eq!(status, SubscriptionStatus::Expired);
    assert!(!eligible);
}

#[test]
fn expired_is_terminal_even_with_future_end_date() {
    // a stale end date must never resurrect an expired subscription
    let sub = subscription(SubscriptionStatus::Expired, Some(100));
    let (status, eligible) = sub.evaluate_at(Utc::now());
    assert_eq!(status, SubscriptionStatus::Expired);
    assert!(!eligible);
}

#[test]
fn suspended_is_never_eligible() {
    let sub = subscription(SubscriptionStatus::Suspended, Some(100));
    let (status, eligible) = sub.evaluate_at(Utc::now());
    assert_eq!(status, SubscriptionStatus::Suspended);
    assert!(!eligible);
}

#[test]
fn active_without_end_date_runs_indefinitely() {
    let sub = subscription(SubscriptionStatus::Active, None);
    let (status, eligible) = sub.evaluate_at(Utc::now());
    assert_eq!(status, SubscriptionStatus::Active);
    assert!(eligible);
}

#[test]
fn exactly_at_end_date_is_still_eligible() {
    let now = Utc::now();
    let mut sub = subscription(SubscriptionStatus::Active, None);
    sub.end_date = Some(now);
    let (status, eligible) = sub.evaluate_at(now);
    assert_eq!(status, SubscriptionStatus::Active);
    assert!(eligible, "expiry requires now strictly after end");
}

#[test]
fn days_remaining_counts_whole_days() {
    let sub = subscription(SubscriptionStatus::Active, Some(36));
    assert_eq!(sub.days_remaining_at(Utc::now()), 1);
    let sub = subscription(SubscriptionStatus::Active, Some(12));
    assert_eq!(sub.days_remaining_at(Utc::now()), 0);
}

#[test]
fn days_remaining_floors_at_zero() {
    let sub = subscription(SubscriptionStatus::Active, Some(-72));
    assert_eq!(sub.days_remaining_at(Utc::now()), 0);
    let sub = subscription(SubscriptionStatus::Active, None);
    assert_eq!(sub.days_remaining_at(Utc::now()), 0);
}
