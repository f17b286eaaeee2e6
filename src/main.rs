//! Signalpost service entrypoint.
//!
//! Wires stores, channels, and engines into the shared context, then runs
//! the scheduler and the ops HTTP server until interrupted.

use std::sync::Arc;
use std::time::Instant;

use dotenvy::dotenv;
use tokio::signal;
use tokio::sync::{mpsc, watch, RwLock};
use tracing::{error, info};

use signalpost::config::{get_environment, Config};
use signalpost::core::context::AppContext;
use signalpost::core::http::{start_server, AppState, HealthStatus};
use signalpost::core::scheduler::Scheduler;
use signalpost::dispatch::DistributionPipeline;
use signalpost::indicators::{IndicatorConfig, IndicatorEngine};
use signalpost::logging;
use signalpost::metrics::Metrics;
use signalpost::services::{
    BroadcastTarget, DirectChannel, LogChannel, MarketDataSource, PlaceholderMarketDataSource,
};
use signalpost::signals::{SignalConfig, SignalEngine};
use signalpost::store::{MemoryStore, Store};
use signalpost::subscriptions::SubscriptionLedger;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    logging::init_logging();

    let config = Config::from_env()?;
    info!(environment = %get_environment(), "Starting Signalpost");
    info!(
        symbols = ?config.watch_list,
        interval_secs = config.analysis_interval.as_secs(),
        "Watching {} symbols",
        config.watch_list.len()
    );

    let metrics = Arc::new(Metrics::new()?);
    let store: Arc<dyn Store> = Arc::new(MemoryStore::default());

    let channel = Arc::new(LogChannel::new(config.broadcast_channel_id.clone()));
    let broadcast: Arc<dyn BroadcastTarget> = channel.clone();
    let direct: Arc<dyn DirectChannel> = channel;
    let source: Arc<dyn MarketDataSource> = Arc::new(PlaceholderMarketDataSource);

    let indicator_config = IndicatorConfig {
        rsi_period: config.rsi_period,
        macd_fast: config.macd_fast,
        macd_slow: config.macd_slow,
        macd_signal: config.macd_signal,
        bollinger_period: config.bollinger_period,
        bollinger_std_dev: config.bollinger_std_dev,
    };
    let signal_config = SignalConfig {
        rsi_oversold: config.rsi_oversold,
        rsi_overbought: config.rsi_overbought,
    };
    let engine = SignalEngine::new(
        source,
        IndicatorEngine::new(indicator_config),
        signal_config,
        config.watch_list.clone(),
        config.lookback_bars,
    );

    let ledger = Arc::new(SubscriptionLedger::new(store.clone(), metrics.clone()));
    let pipeline = DistributionPipeline::new(
        store.clone(),
        ledger.clone(),
        broadcast,
        direct,
        metrics.clone(),
        config.signal_pacing,
    );
    let context = Arc::new(AppContext::new(
        engine,
        pipeline,
        ledger,
        store.clone(),
        metrics.clone(),
        config.warning_days,
    ));

    let (task_tx, task_rx) = mpsc::channel(4);
    let scheduler = Scheduler::new(
        context,
        config.analysis_interval,
        config.sweep_hour,
        config.sweep_minute,
        task_rx,
    )?;
    scheduler.start().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let state = AppState {
        health: Arc::new(RwLock::new(HealthStatus::default())),
        metrics: metrics.clone(),
        start_time: Arc::new(Instant::now()),
        tasks: task_tx,
        store,
    };
    let http_port = config.http_port;
    let server = tokio::spawn(async move {
        if let Err(e) = start_server(state, http_port, shutdown_rx).await {
            error!(error = %e, "HTTP server exited with error: {}", e);
        }
    });

    info!("Signalpost started, waiting for shutdown signal...");
    signal::ctrl_c().await?;
    info!("Shutting down...");

    scheduler.stop().await;
    let _ = shutdown_tx.send(true);
    let _ = server.await;
    info!("Signalpost stopped");

    Ok(())
}
