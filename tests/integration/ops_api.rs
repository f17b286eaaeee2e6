//! Integration tests for the ops HTTP surface.

#[path = "test_utils.rs"]
mod test_utils;

use serde_json::Value;

use signalpost::core::http::create_router;
use signalpost::models::subscriber::{NotificationCategory, SubscriptionStatus};
use signalpost::store::Store;

use test_utils::{state_with_stuffed_queue, TestApp, TestContext};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApp::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "signalpost");
}

#[tokio::test]
async fn metrics_endpoint_exposes_pipeline_metrics() {
    let app = TestApp::new().await;
    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "analysis_cycles_total",
        "signals_generated_total",
        "deliveries_total",
        "subscriptions_expired_total",
        "http_requests_total",
        "http_request_duration_seconds",
    ] {
        assert!(body.contains(name), "expected {} in exposition", name);
    }
}

#[tokio::test]
async fn run_analysis_endpoint_executes_a_full_cycle() {
    let app = TestApp::new().await;
    app.bench
        .seed_subscriber("tg:a", SubscriptionStatus::Active, 48)
        .await;

    let response = app.server.post("/api/run-analysis").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["symbols_analyzed"], 2);
    assert_eq!(body["signals_generated"], 2);
    assert_eq!(body["signals_distributed"], 2);

    assert_eq!(app.bench.store.recent_signals(10).await.unwrap().len(), 2);
    assert_eq!(app.bench.direct.deliveries().len(), 2);
}

#[tokio::test]
async fn run_expiry_sweep_endpoint_reports_warnings() {
    let app = TestApp::new().await;
    app.bench
        .seed_subscriber("tg:soon", SubscriptionStatus::Trial, 12)
        .await;

    let response = app.server.post("/api/run-expiry-sweep").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["subscriptions_checked"], 1);
    assert_eq!(body["warnings_sent"], 1);
}

#[tokio::test]
async fn broadcast_endpoint_fans_out_to_eligible_subscribers() {
    let app = TestApp::new().await;
    let a = app
        .bench
        .seed_subscriber("tg:a", SubscriptionStatus::Active, 48)
        .await;
    app.bench
        .seed_subscriber("tg:b", SubscriptionStatus::Trial, 48)
        .await;
    app.bench
        .seed_subscriber("tg:gone", SubscriptionStatus::Expired, 48)
        .await;

    let response = app
        .server
        .post("/api/broadcast")
        .json(&serde_json::json!({ "message": "maintenance at 18:00 UTC" }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "completed");
    assert_eq!(body["recipients"], 2);
    assert_eq!(body["delivered"], 2);

    let deliveries = app.bench.direct.deliveries();
    assert_eq!(deliveries.len(), 2);
    assert!(deliveries[0].1.contains("**Broadcast Message**"));
    assert!(deliveries[0].1.contains("maintenance at 18:00 UTC"));

    let audit = app.bench.store.notifications_for(a.id).await.unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].category, NotificationCategory::Broadcast);
}

#[tokio::test]
async fn broadcast_endpoint_rejects_an_empty_message() {
    let app = TestApp::new().await;
    let response = app
        .server
        .post("/api/broadcast")
        .json(&serde_json::json!({ "message": "   " }))
        .await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn signals_endpoint_honors_the_limit() {
    let app = TestApp::new().await;
    let _ = app.server.post("/api/run-analysis").await;

    let response = app.server.get("/api/signals?limit=1").await;
    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    let listed = body.as_array().expect("json array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["strategy"], "RSI Overbought");
}

#[tokio::test]
async fn run_analysis_returns_503_when_the_queue_is_full() {
    let bench = TestContext::new(std::sync::Arc::new(test_utils::TrendingSource));
    let (state, _task_rx) = state_with_stuffed_queue(&bench);
    let server = axum_test::TestServer::new(create_router(state)).expect("start test server");

    let response = server.post("/api/run-analysis").await;
    assert_eq!(response.status_code(), 503);
}
