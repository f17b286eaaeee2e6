//! Outbound delivery channels.
//!
//! The chat transport is an external collaborator; the pipeline only sees
//! these traits. Implementations own addressing, formatting quirks and
//! transport retries. The pipeline never retries within a cycle.

use async_trait::async_trait;
use tracing::info;

use crate::error::SendError;

/// The shared broadcast destination (e.g. a public channel).
#[async_trait]
pub trait BroadcastTarget: Send + Sync {
    async fn send(&self, text: &str) -> Result<(), SendError>;
}

/// Per-recipient delivery.
#[async_trait]
pub trait DirectChannel: Send + Sync {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), SendError>;
}

/// Channel that only logs. Default wiring until a real transport is
/// attached; every send succeeds.
pub struct LogChannel {
    channel_id: String,
}

impl LogChannel {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
        }
    }
}

#[async_trait]
impl BroadcastTarget for LogChannel {
    async fn send(&self, text: &str) -> Result<(), SendError> {
        info!(channel = %self.channel_id, bytes = text.len(), "broadcast: {}", text);
        Ok(())
    }
}

#[async_trait]
impl DirectChannel for LogChannel {
    async fn send(&self, recipient_id: &str, text: &str) -> Result<(), SendError> {
        info!(recipient = %recipient_id, bytes = text.len(), "direct to {}: {}", recipient_id, text);
        Ok(())
    }
}
