//! Prometheus metrics for the registration composer.
//!
//! All metrics follow the naming convention: `ns_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, Opts, Registry,
    TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Attempts by outcome
    pub static ref ATTEMPTS: CounterVec = CounterVec::new(
        Opts::new("ns_attempts_total", "Registration attempts by outcome"),
        &["outcome"]  // outcome: finalized/aborted/submitted/rejected
    ).expect("metric creation failed");

    /// Oracle round-trips by outcome
    pub static ref ORACLE_FETCHES: CounterVec = CounterVec::new(
        Opts::new("ns_oracle_fetches_total", "Price service round-trips by outcome"),
        &["outcome"]  // outcome: ok/failed
    ).expect("metric creation failed");

    /// Operations appended across all attempts
    pub static ref OPERATIONS_APPENDED: Counter = Counter::new(
        "ns_operations_appended_total",
        "Operations appended to transaction contexts"
    ).expect("metric creation failed");

    /// End-to-end compose duration
    pub static ref COMPOSE_DURATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "ns_compose_duration_seconds",
            "Time spent composing one attempt, oracle round-trip included"
        ).buckets(exponential_buckets(0.001, 2.0, 14).expect("valid buckets"))
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call repeatedly.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(ATTEMPTS.clone()),
        Box::new(ORACLE_FETCHES.clone()),
        Box::new(OPERATIONS_APPENDED.clone()),
        Box::new(COMPOSE_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all metrics as Prometheus text format.
pub fn gather_metrics() -> Result<String, TelemetryError> {
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
