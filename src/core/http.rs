//! Ops HTTP surface: health, metrics, and manual task triggers.

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, oneshot, watch, RwLock};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, Level};

use crate::core::tasks::ScheduledTask;
use crate::metrics::Metrics;
use crate::store::Store;

#[derive(Clone)]
pub struct AppState {
    pub health: Arc<RwLock<HealthStatus>>,
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub tasks: mpsc::Sender<ScheduledTask>,
    pub store: Arc<dyn Store>,
}

#[derive(Clone, Debug)]
pub struct HealthStatus {
    pub status: String,
}

impl Default for HealthStatus {
    fn default() -> Self {
        Self {
            status: "healthy".to_string(),
        }
    }
}

pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let health = state.health.read().await;
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": health.status,
        "uptime_seconds": uptime_seconds,
        "service": "signalpost"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state
        .metrics
        .export()
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();

    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();

    state.metrics.http_requests_in_flight.dec();
    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

/// Queue an analysis cycle and wait for its summary.
///
/// 503 means the task queue is full, i.e. enough runs are already queued
/// behind whatever is executing.
async fn run_analysis(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let (tx, rx) = oneshot::channel();
    state
        .tasks
        .try_send(ScheduledTask::RunAnalysis { reply: Some(tx) })
        .map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => StatusCode::SERVICE_UNAVAILABLE,
            mpsc::error::TrySendError::Closed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    let summary = rx
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|e| {
            error!(error = %e, "manual analysis run failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(json!({
        "status": "completed",
        "symbols_analyzed": summary.symbols_analyzed,
        "signals_generated": summary.signals_generated,
        "signals_distributed": summary.signals_distributed,
    })))
}

/// Queue an expiry sweep and wait for its summary.
async fn run_expiry_sweep(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let (tx, rx) = oneshot::channel();
    state
        .tasks
        .try_send(ScheduledTask::RunExpirySweep { reply: Some(tx) })
        .map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => StatusCode::SERVICE_UNAVAILABLE,
            mpsc::error::TrySendError::Closed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    let summary = rx
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|e| {
            error!(error = %e, "manual expiry sweep failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(json!({
        "status": "completed",
        "subscriptions_checked": summary.subscriptions_checked,
        "warnings_sent": summary.warnings_sent,
    })))
}

#[derive(Debug, Deserialize)]
struct BroadcastRequest {
    message: String,
}

/// Queue an announcement to every eligible subscriber and wait for the
/// delivery counts.
async fn send_broadcast(
    State(state): State<AppState>,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<Value>, StatusCode> {
    if request.message.trim().is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let (tx, rx) = oneshot::channel();
    state
        .tasks
        .try_send(ScheduledTask::SendAnnouncement {
            message: request.message,
            reply: Some(tx),
        })
        .map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => StatusCode::SERVICE_UNAVAILABLE,
            mpsc::error::TrySendError::Closed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        })?;

    let summary = rx
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .map_err(|e| {
            error!(error = %e, "announcement failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(json!({
        "status": "completed",
        "recipients": summary.recipients,
        "delivered": summary.delivered,
    })))
}

#[derive(Debug, Deserialize)]
struct SignalsQuery {
    limit: Option<usize>,
}

/// Most recently persisted signals, newest first.
async fn list_signals(
    State(state): State<AppState>,
    Query(params): Query<SignalsQuery>,
) -> Result<Json<Value>, StatusCode> {
    let limit = params.limit.unwrap_or(10);
    let signals = state.store.recent_signals(limit).await.map_err(|e| {
        error!(error = %e, "Failed to load recent signals");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(json!(signals)))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/run-analysis", post(run_analysis))
        .route("/api/run-expiry-sweep", post(run_expiry_sweep))
        .route("/api/broadcast", post(send_broadcast))
        .route("/api/signals", get(list_signals))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Bind and serve until the shutdown flag flips.
pub async fn start_server(
    state: AppState,
    port: u16,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            while shutdown.changed().await.is_ok() {
                if *shutdown.borrow() {
                    break;
                }
            }
        })
        .await?;

    Ok(())
}
