//! The two scheduled task bodies: the hourly analysis cycle and the daily
//! expiry sweep. Both take the shared context and report a summary.
//! Failures bubble up to the caller that triggered the run.

use std::time::Instant;

use tracing::info;

use crate::core::context::AppContext;
use crate::core::tasks::{AnalysisSummary, BroadcastSummary, ExpirySummary};
use crate::dispatch::message;
use crate::error::CycleError;
use crate::models::subscriber::NotificationCategory;

/// One full analysis pass over the watch list.
///
/// Per-symbol market data failures are absorbed inside the engine; only
/// store failures abort the cycle.
pub async fn run_analysis_cycle(ctx: &AppContext) -> Result<AnalysisSummary, CycleError> {
    let start = Instant::now();
    let symbols_analyzed = ctx.engine.watch_list().len();
    info!(
        symbols = symbols_analyzed,
        "starting analysis cycle over {} symbols", symbols_analyzed
    );

    let candidates = ctx.engine.analyze_all().await;
    ctx.metrics
        .signals_generated_total
        .inc_by(candidates.len() as u64);

    let signals = ctx.pipeline.distribute_all(&candidates).await?;

    let duration = start.elapsed();
    ctx.metrics
        .analysis_cycle_duration_seconds
        .observe(duration.as_secs_f64());
    ctx.metrics.analysis_cycles_total.inc();
    info!(
        symbols = symbols_analyzed,
        signals = signals.len(),
        duration_ms = duration.as_millis(),
        "analysis cycle complete: {} signals from {} symbols",
        signals.len(),
        symbols_analyzed
    );

    Ok(AnalysisSummary {
        symbols_analyzed,
        signals_generated: candidates.len(),
        signals_distributed: signals.len(),
    })
}

/// Warn every still-eligible subscriber whose subscription ends within the
/// configured window. Runs once a day.
pub async fn run_expiry_sweep(ctx: &AppContext) -> Result<ExpirySummary, CycleError> {
    let expiring = ctx.ledger.list_expiring_within(ctx.warning_days).await?;
    let mut warnings_sent = 0usize;

    for (subscriber, subscription) in &expiring {
        let days_left = ctx.ledger.days_remaining(subscription);
        let text = message::expiry_warning(days_left);
        if ctx
            .pipeline
            .send_direct(subscriber, &text, NotificationCategory::Subscription)
            .await?
        {
            warnings_sent += 1;
            ctx.metrics.expiry_warnings_total.inc();
        }
    }

    info!(
        checked = expiring.len(),
        warned = warnings_sent,
        "expiry sweep complete: warned {}/{} subscribers",
        warnings_sent,
        expiring.len()
    );
    Ok(ExpirySummary {
        subscriptions_checked: expiring.len(),
        warnings_sent,
    })
}

/// Push an operator announcement to every eligible subscriber.
pub async fn run_announcement(ctx: &AppContext, text: &str) -> Result<BroadcastSummary, CycleError> {
    let recipients = ctx.ledger.list_eligible_for_broadcast().await?;
    let notice = message::broadcast_notice(text);
    let mut delivered = 0usize;

    for subscriber in &recipients {
        if ctx
            .pipeline
            .send_direct(subscriber, &notice, NotificationCategory::Broadcast)
            .await?
        {
            delivered += 1;
        }
    }

    info!(
        recipients = recipients.len(),
        delivered = delivered,
        "announcement delivered to {}/{} subscribers",
        delivered,
        recipients.len()
    );
    Ok(BroadcastSummary {
        recipients: recipients.len(),
        delivered,
    })
}
