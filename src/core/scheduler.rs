//! Cron-and-interval scheduler that owns task execution.
//!
//! One spawned task drives everything: the recurring analysis interval,
//! the daily expiry sweep, and manual runs arriving over the task queue.
//! Running the cycles inline in that task is what makes triggers safe to
//! overlap: an interval tick that lands while a cycle is mid-flight is
//! dropped by the interval's skip policy, and a sweep whose wall-clock
//! moment passes during a long cycle fires late instead of vanishing.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use cron::Schedule;
use std::str::FromStr;
use tokio::sync::{mpsc, watch, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::core::context::AppContext;
use crate::core::runner::{run_analysis_cycle, run_announcement, run_expiry_sweep};
use crate::core::tasks::ScheduledTask;
use crate::error::ConfigError;

pub struct Scheduler {
    context: Arc<AppContext>,
    analysis_interval: Duration,
    sweep_schedule: Schedule,
    tasks: Mutex<Option<mpsc::Receiver<ScheduledTask>>>,
    shutdown: watch::Sender<bool>,
    handle: Arc<RwLock<Option<tokio::task::JoinHandle<()>>>>,
}

impl Scheduler {
    /// Build a scheduler firing analysis every `analysis_interval` and the
    /// expiry sweep daily at `sweep_hour:sweep_minute` UTC.
    pub fn new(
        context: Arc<AppContext>,
        analysis_interval: Duration,
        sweep_hour: u32,
        sweep_minute: u32,
        tasks: mpsc::Receiver<ScheduledTask>,
    ) -> Result<Self, ConfigError> {
        // second minute hour day month weekday
        let cron_expr = format!("0 {} {} * * *", sweep_minute, sweep_hour);
        let sweep_schedule = Schedule::from_str(&cron_expr).map_err(|e| ConfigError::Invalid {
            name: "EXPIRY_SWEEP_TIME",
            value: cron_expr.clone(),
            reason: e.to_string(),
        })?;

        info!(
            interval_secs = analysis_interval.as_secs(),
            sweep_cron = %cron_expr,
            "scheduler configured: analysis every {}s, sweep at {:02}:{:02} UTC",
            analysis_interval.as_secs(),
            sweep_hour,
            sweep_minute
        );

        Ok(Self {
            context,
            analysis_interval,
            sweep_schedule,
            tasks: Mutex::new(Some(tasks)),
            shutdown: watch::Sender::new(false),
            handle: Arc::new(RwLock::new(None)),
        })
    }

    /// Spawn the scheduler loop. A second call is a no-op.
    pub async fn start(&self) {
        let Some(mut tasks) = self.tasks.lock().ok().and_then(|mut t| t.take()) else {
            warn!("scheduler already started, ignoring");
            return;
        };

        let context = self.context.clone();
        let schedule = self.sweep_schedule.clone();
        let period = self.analysis_interval;
        let mut shutdown = self.shutdown.subscribe();

        let handle = tokio::spawn(async move {
            let mut interval =
                tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut next_sweep = schedule.upcoming(Utc).next();
            info!("scheduler started");

            loop {
                let sweep_delay = delay_until(next_sweep);
                tokio::select! {
                    _ = interval.tick() => {
                        if let Err(e) = run_analysis_cycle(&context).await {
                            error!(error = %e, "scheduled analysis cycle failed: {}", e);
                        }
                    }
                    _ = tokio::time::sleep(sweep_delay) => {
                        if next_sweep.is_some() {
                            if let Err(e) = run_expiry_sweep(&context).await {
                                error!(error = %e, "scheduled expiry sweep failed: {}", e);
                            }
                        }
                        next_sweep = schedule.upcoming(Utc).next();
                    }
                    maybe_task = tasks.recv() => {
                        match maybe_task {
                            Some(task) => run_manual(&context, task).await,
                            None => {
                                info!("task queue closed, scheduler stopping");
                                break;
                            }
                        }
                    }
                    _ = shutdown.changed() => {
                        if *shutdown.borrow() {
                            info!("shutdown requested, scheduler stopping");
                            break;
                        }
                    }
                }
            }
        });

        let mut slot = self.handle.write().await;
        *slot = Some(handle);
        info!("scheduler task spawned");
    }

    /// Signal the loop to stop and wait for it to finish its current work.
    pub async fn stop(&self) {
        let _ = self.shutdown.send(true);
        let handle = { self.handle.write().await.take() };
        if let Some(h) = handle {
            if let Err(e) = h.await {
                error!(error = %e, "scheduler task ended abnormally: {}", e);
            }
            info!("scheduler stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.handle.read().await.is_some()
    }
}

/// Time from now until the given instant, zero if it already passed.
fn delay_until(at: Option<DateTime<Utc>>) -> Duration {
    match at {
        Some(at) => (at - Utc::now()).to_std().unwrap_or(Duration::ZERO),
        // A schedule with no upcoming fire date; check back in a day.
        None => Duration::from_secs(86_400),
    }
}

async fn run_manual(context: &AppContext, task: ScheduledTask) {
    match task {
        ScheduledTask::RunAnalysis { reply } => {
            info!("running manually requested analysis cycle");
            let result = run_analysis_cycle(context).await;
            if let Err(ref e) = result {
                error!(error = %e, "manual analysis cycle failed: {}", e);
            }
            if let Some(tx) = reply {
                if tx.send(result).is_err() {
                    warn!("manual analysis requester went away before the result");
                }
            }
        }
        ScheduledTask::RunExpirySweep { reply } => {
            info!("running manually requested expiry sweep");
            let result = run_expiry_sweep(context).await;
            if let Err(ref e) = result {
                error!(error = %e, "manual expiry sweep failed: {}", e);
            }
            if let Some(tx) = reply {
                if tx.send(result).is_err() {
                    warn!("manual sweep requester went away before the result");
                }
            }
        }
        ScheduledTask::SendAnnouncement { message, reply } => {
            info!("sending operator announcement");
            let result = run_announcement(context, &message).await;
            if let Err(ref e) = result {
                error!(error = %e, "announcement failed: {}", e);
            }
            if let Some(tx) = reply {
                if tx.send(result).is_err() {
                    warn!("announcement requester went away before the result");
                }
            }
        }
    }
}
