//! Task messages accepted by the scheduler's queue, plus the summaries
//! each task reports back.

use serde::Serialize;
use tokio::sync::oneshot;

use crate::error::CycleError;

/// Outcome of one analysis cycle.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub symbols_analyzed: usize,
    pub signals_generated: usize,
    pub signals_distributed: usize,
}

/// Outcome of one expiry sweep.
#[derive(Debug, Clone, Serialize)]
pub struct ExpirySummary {
    pub subscriptions_checked: usize,
    pub warnings_sent: usize,
}

/// Outcome of one operator announcement fan-out.
#[derive(Debug, Clone, Serialize)]
pub struct BroadcastSummary {
    pub recipients: usize,
    pub delivered: usize,
}

/// A manually requested run. Scheduled runs never pass through the queue;
/// these come from the ops API, with an optional reply channel so the
/// caller can wait for the outcome.
pub enum ScheduledTask {
    RunAnalysis {
        reply: Option<oneshot::Sender<Result<AnalysisSummary, CycleError>>>,
    },
    RunExpirySweep {
        reply: Option<oneshot::Sender<Result<ExpirySummary, CycleError>>>,
    },
    SendAnnouncement {
        message: String,
        reply: Option<oneshot::Sender<Result<BroadcastSummary, CycleError>>>,
    },
}
