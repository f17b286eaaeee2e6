//! Prometheus metrics for the analysis and distribution pipeline.

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};

pub struct Metrics {
    registry: Registry,

    // Analysis cycle
    pub analysis_cycles_total: IntCounter,
    pub analysis_cycle_duration_seconds: Histogram,
    pub signals_generated_total: IntCounter,

    // Distribution
    pub signals_distributed_total: IntCounter,
    pub deliveries_total: IntCounter,
    pub delivery_failures_total: IntCounter,

    // Subscriptions
    pub subscriptions_expired_total: IntCounter,
    pub expiry_warnings_total: IntCounter,

    // HTTP
    pub http_requests_total: IntCounter,
    pub http_requests_in_flight: IntGauge,
    pub http_request_duration_seconds: Histogram,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let analysis_cycles_total = IntCounter::with_opts(Opts::new(
            "analysis_cycles_total",
            "Completed market analysis cycles",
        ))?;
        let analysis_cycle_duration_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "analysis_cycle_duration_seconds",
                "Wall time of one full analysis cycle",
            )
            .buckets(prometheus::exponential_buckets(0.1, 2.0, 10)?),
        )?;
        let signals_generated_total = IntCounter::with_opts(Opts::new(
            "signals_generated_total",
            "Signal candidates produced by the rule engine",
        ))?;
        let signals_distributed_total = IntCounter::with_opts(Opts::new(
            "signals_distributed_total",
            "Signals that went through persist and fan-out",
        ))?;
        let deliveries_total = IntCounter::with_opts(Opts::new(
            "deliveries_total",
            "Successful per-recipient deliveries",
        ))?;
        let delivery_failures_total = IntCounter::with_opts(Opts::new(
            "delivery_failures_total",
            "Per-recipient deliveries that failed",
        ))?;
        let subscriptions_expired_total = IntCounter::with_opts(Opts::new(
            "subscriptions_expired_total",
            "Subscriptions transitioned to expired",
        ))?;
        let expiry_warnings_total = IntCounter::with_opts(Opts::new(
            "expiry_warnings_total",
            "Expiry warning messages sent",
        ))?;
        let http_requests_total = IntCounter::with_opts(Opts::new(
            "http_requests_total",
            "HTTP requests received",
        ))?;
        let http_requests_in_flight = IntGauge::with_opts(Opts::new(
            "http_requests_in_flight",
            "HTTP requests currently being served",
        ))?;
        let http_request_duration_seconds = Histogram::with_opts(HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency",
        ))?;

        registry.register(Box::new(analysis_cycles_total.clone()))?;
        registry.register(Box::new(analysis_cycle_duration_seconds.clone()))?;
        registry.register(Box::new(signals_generated_total.clone()))?;
        registry.register(Box::new(signals_distributed_total.clone()))?;
        registry.register(Box::new(deliveries_total.clone()))?;
        registry.register(Box::new(delivery_failures_total.clone()))?;
        registry.register(Box::new(subscriptions_expired_total.clone()))?;
        registry.register(Box::new(expiry_warnings_total.clone()))?;
        registry.register(Box::new(http_requests_total.clone()))?;
        registry.register(Box::new(http_requests_in_flight.clone()))?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        Ok(Self {
            registry,
            analysis_cycles_total,
            analysis_cycle_duration_seconds,
            signals_generated_total,
            signals_distributed_total,
            deliveries_total,
            delivery_failures_total,
            subscriptions_expired_total,
            expiry_warnings_total,
            http_requests_total,
            http_requests_in_flight,
            http_request_duration_seconds,
        })
    }

    /// Render every registered metric in the Prometheus text format.
    pub fn export(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
