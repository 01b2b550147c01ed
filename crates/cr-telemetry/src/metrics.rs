//! Prometheus metrics for content routing.
//!
//! All metrics follow the naming convention: `cr_<area>_<metric>_<unit>`
//!
//! ## Metric Types
//!
//! - **Counter**: Monotonically increasing value (e.g., provides_announced_total)
//! - **Gauge**: Value that can go up or down (e.g., active query operations)
//! - **Histogram**: Distribution of values (e.g., provide duration)

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Gauge, Histogram, HistogramOpts, Opts,
    Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Metrics registry for this workspace
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // PROVIDE
    // =========================================================================

    /// Identifiers announced to the routing backend
    pub static ref PROVIDES_ANNOUNCED: Counter = Counter::new(
        "cr_provide_announced_total",
        "Total identifiers announced to the routing backend"
    ).expect("metric creation failed");

    /// Failed provide calls by failure class
    pub static ref PROVIDE_FAILURES: CounterVec = CounterVec::new(
        Opts::new("cr_provide_failures_total", "Total failed provide calls"),
        &["reason"]  // reason: precondition/resolve/traversal/announce/cancelled
    ).expect("metric creation failed");

    /// Identifiers reached by recursive traversal
    pub static ref NODES_TRAVERSED: Counter = Counter::new(
        "cr_traversal_nodes_total",
        "Total distinct identifiers reached by graph traversal"
    ).expect("metric creation failed");

    /// Provide call duration
    pub static ref PROVIDE_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "cr_provide_duration_seconds",
            "Time spent in provide calls"
        ).buckets(exponential_buckets(0.001, 2.0, 15).expect("valid buckets"))
    ).expect("metric creation failed");

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Query events consumed by result-stream bridges, by kind
    pub static ref QUERY_EVENTS: CounterVec = CounterVec::new(
        Opts::new("cr_query_events_total", "Query events consumed by result bridges"),
        &["kind"]
    ).expect("metric creation failed");

    /// Results forwarded to callers, by operation
    pub static ref RESULTS_STREAMED: CounterVec = CounterVec::new(
        Opts::new("cr_query_results_streamed_total", "Results forwarded to callers"),
        &["operation"]  // operation: find_peer/find_providers
    ).expect("metric creation failed");

    /// Query operations whose driver task is still running
    pub static ref ACTIVE_QUERIES: Gauge = Gauge::new(
        "cr_query_active",
        "Query operations with a running driver task"
    ).expect("metric creation failed");
}

/// Handle returned once metrics are registered.
pub struct MetricsHandle {
    registered: usize,
}

impl MetricsHandle {
    /// Number of metric families registered.
    #[must_use]
    pub fn registered(&self) -> usize {
        self.registered
    }
}

/// Register every metric with [`REGISTRY`].
///
/// Fails if called twice.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(PROVIDES_ANNOUNCED.clone()),
        Box::new(PROVIDE_FAILURES.clone()),
        Box::new(NODES_TRAVERSED.clone()),
        Box::new(PROVIDE_DURATION.clone()),
        Box::new(QUERY_EVENTS.clone()),
        Box::new(RESULTS_STREAMED.clone()),
        Box::new(ACTIVE_QUERIES.clone()),
    ];

    let registered = metrics.len();
    for metric in metrics {
        REGISTRY
            .register(metric)
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    }

    Ok(MetricsHandle { registered })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

/// Guard that keeps [`ACTIVE_QUERIES`] raised while held.
pub struct ActiveQueryGuard(());

impl ActiveQueryGuard {
    /// Raise the gauge until the guard is dropped.
    pub fn enter() -> Self {
        ACTIVE_QUERIES.inc();
        Self(())
    }
}

impl Drop for ActiveQueryGuard {
    fn drop(&mut self) {
        ACTIVE_QUERIES.dec();
    }
}

/// Start timing for a histogram. Observation happens on drop.
#[macro_export]
macro_rules! time_histogram {
    ($histogram:expr) => {
        $crate::metrics::HistogramTimer::new(&$histogram)
    };
}
