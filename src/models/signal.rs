//! Signal types: rule candidates and the persisted signal record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction of a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Buy,
    Sell,
}

impl SignalDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalDirection::Buy => "BUY",
            SignalDirection::Sell => "SELL",
        }
    }
}

/// Signal strength tier. Total order: Weak < Medium < Strong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStrength {
    Weak,
    Medium,
    Strong,
}

impl SignalStrength {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalStrength::Weak => "Weak",
            SignalStrength::Medium => "Medium",
            SignalStrength::Strong => "Strong",
        }
    }
}

/// Outcome of a persisted signal, reconciled later by collaborators
/// outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeOutcome {
    Pending,
    Win,
    Loss,
}

/// One rule's verdict for one asset in one cycle.
///
/// Candidates are ephemeral: only the strongest per asset survives selection
/// and is persisted as a [`Signal`]; the rest are dropped.
#[derive(Debug, Clone, Serialize)]
pub struct SignalCandidate {
    pub symbol: String,
    pub direction: SignalDirection,
    /// Label of the rule that produced this candidate, e.g. "RSI Oversold".
    pub strategy: String,
    pub strength: SignalStrength,
    /// Human-readable explanation of why the rule fired.
    pub rationale: String,
    /// Closing price at the time the rule fired.
    pub price: f64,
}

/// A persisted trading signal: the strongest candidate of one asset in one
/// cycle, with identity and lifecycle fields owned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    pub id: i64,
    pub symbol: String,
    pub direction: SignalDirection,
    pub strategy: String,
    pub strength: SignalStrength,
    pub rationale: String,
    pub entry_price: f64,
    pub created_at: DateTime<Utc>,
    pub outcome: TradeOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closed_at: Option<DateTime<Utc>>,
}
