//! # NS Telemetry
//!
//! Logging and Prometheus metrics for the registration composer.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ns_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     init_telemetry(&TelemetryConfig::from_env()).expect("telemetry");
//!     // Logs and metrics are now being collected
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `NS_SERVICE_NAME` | `ns-registration` | Service name in logs |
//! | `NS_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `NS_JSON_LOGS` | `false` (`true` in containers) | JSON log lines |
//! | `NS_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `NS_NETWORK` | `testnet` | Network label |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging};
pub use metrics::{
    gather_metrics, register_metrics, HistogramTimer, ATTEMPTS, COMPOSE_DURATION,
    OPERATIONS_APPENDED, ORACLE_FETCHES,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Subscriber could not be installed
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metric registration or encoding failed
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    /// Bad filter directive or other configuration problem
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics, then install the log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
