//! Outbound message templates.
//!
//! Plain markdown with the direction emoji up front; transports decide
//! how (or whether) to render the markup.

use chrono::{DateTime, Utc};

use crate::models::signal::{SignalCandidate, SignalDirection};

fn direction_emoji(direction: SignalDirection) -> &'static str {
    match direction {
        SignalDirection::Buy => "\u{1F7E2}",
        SignalDirection::Sell => "\u{1F534}",
    }
}

fn signal_body(candidate: &SignalCandidate, at: DateTime<Utc>) -> String {
    format!(
        "**Asset:** {}\n\
         **Strategy:** {}\n\
         **Price:** ${:.2}\n\
         **Strength:** {}\n\n\
         **Reason:**\n{}\n\n\
         \u{23F0} {}",
        candidate.symbol,
        candidate.strategy,
        candidate.price,
        candidate.strength.as_str(),
        candidate.rationale,
        at.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// Message posted to the shared broadcast channel.
pub fn channel_message(candidate: &SignalCandidate, at: DateTime<Utc>) -> String {
    format!(
        "{} **{} SIGNAL**\n\n{}",
        direction_emoji(candidate.direction),
        candidate.direction.as_str(),
        signal_body(candidate, at),
    )
}

/// Message sent to each eligible subscriber directly.
pub fn subscriber_message(candidate: &SignalCandidate, at: DateTime<Utc>) -> String {
    format!(
        "{} **NEW SIGNAL**\n\n{}",
        direction_emoji(candidate.direction),
        signal_body(candidate, at),
    )
}

/// Operator announcement pushed to every eligible subscriber.
pub fn broadcast_notice(text: &str) -> String {
    format!("\u{1F4E2} **Broadcast Message**\n\n{}", text)
}

/// Warning sent ahead of a subscription lapsing.
pub fn expiry_warning(days_left: i64) -> String {
    format!(
        "\u{26A0}\u{FE0F} **Subscription Expiring Soon**\n\n\
         Your subscription will expire in {} day(s).\n\n\
         To continue receiving premium signals, please renew your subscription.\n\n\
         Thank you for using our service!",
        days_left,
    )
}
