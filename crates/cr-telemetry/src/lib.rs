//! # Content Routing Telemetry
//!
//! Logging and metrics for the content-routing workspace.
//!
//! ## Components
//!
//! - **Logs**: `tracing` subscriber with `EnvFilter`, pretty or JSON output
//! - **Metrics**: Prometheus counters, gauges and histograms for provide and
//!   query activity, exported as text via [`encode_metrics`]
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cr_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `content-routing` | Service name in log lines |
//! | `CR_LOG_LEVEL` | `info` | Log level filter |
//! | `CR_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `CR_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use metrics::{
    encode_metrics, register_metrics, ActiveQueryGuard, HistogramTimer, MetricsHandle,
    ACTIVE_QUERIES, NODES_TRAVERSED, PROVIDES_ANNOUNCED, PROVIDE_DURATION, PROVIDE_FAILURES,
    QUERY_EVENTS, RESULTS_STREAMED,
};
pub use tracing_setup::{env_filter, init_tracing};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed, or installing failed.
    #[error("Failed to initialize tracing: {0}")]
    TracingInit(String),

    /// Metric registration or encoding failed.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// The log filter could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that must be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    init_tracing(&config)?;

    Ok(TelemetryGuard {
        _metrics: metrics,
        config,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _metrics: MetricsHandle,
    config: TelemetryConfig,
}

impl TelemetryGuard {
    /// The configuration telemetry was started with.
    #[must_use]
    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.config.service_name, "Shutting down telemetry");
    }
}
