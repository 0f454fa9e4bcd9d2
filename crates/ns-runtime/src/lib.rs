//! # Registration Runtime
//!
//! Wires the composer to its production collaborators:
//!
//! - configuration from `NS_*` environment variables
//! - [`HermesPriceService`] for quotes
//! - [`DryRunSubmitter`] in place of a wallet (key management is out of scope)
//! - Prometheus counters from `ns-telemetry`
//!
//! One run composes and submits one attempt described by `NS_REQUEST_JSON`.

use std::sync::Arc;

use anyhow::{Context, Result};
use ns_registration::{
    DryRunSubmitter, HermesPriceService, MetricsSnapshot, RegistrationApi, RegistrationConfig,
    RegistrationOutcome, RegistrationRequest, RegistrationService, SystemClock,
};
use ns_telemetry::{
    metric_inc, HistogramTimer, ATTEMPTS, COMPOSE_DURATION, OPERATIONS_APPENDED, ORACLE_FETCHES,
};
use tracing::{info, warn};

/// Environment variable carrying the request as JSON.
pub const REQUEST_ENV: &str = "NS_REQUEST_JSON";

/// Parse a request from JSON.
pub fn parse_request(json: &str) -> Result<RegistrationRequest> {
    serde_json::from_str(json).context("Failed to parse registration request")
}

/// Load the request from [`REQUEST_ENV`].
pub fn load_request() -> Result<RegistrationRequest> {
    let json = std::env::var(REQUEST_ENV).with_context(|| format!("{REQUEST_ENV} is not set"))?;
    parse_request(&json)
}

/// The runtime owning one registration service.
pub struct RegistrationRuntime {
    service: Arc<dyn RegistrationApi>,
}

impl RegistrationRuntime {
    /// Build with production adapters from environment configuration.
    pub fn from_env() -> Result<Self> {
        let config = RegistrationConfig::from_env().context("Failed to load configuration")?;
        info!("Creating registration runtime for {}", config.network);

        let oracle = HermesPriceService::new(config.hermes_endpoint.clone(), config.oracle_timeout())
            .context("Failed to create price service client")?;
        let service = RegistrationService::new(
            config,
            Arc::new(oracle),
            Arc::new(DryRunSubmitter),
            Arc::new(SystemClock),
        )
        .context("Failed to create registration service")?;

        Ok(Self::with_service(Arc::new(service)))
    }

    /// Build around an existing service.
    pub fn with_service(service: Arc<dyn RegistrationApi>) -> Self {
        Self { service }
    }

    /// Compose and submit one attempt, updating the Prometheus counters.
    pub async fn run_once(&self, request: RegistrationRequest) -> Result<RegistrationOutcome> {
        let before = self.service.metrics();
        let result = {
            let _timer = HistogramTimer::new(&COMPOSE_DURATION);
            self.service.register(request).await
        };
        record_oracle_delta(&before, &self.service.metrics());

        match result {
            Ok(outcome) => {
                metric_inc!(ATTEMPTS, &["submitted"]);
                OPERATIONS_APPENDED.inc_by(outcome.operations as f64);
                info!(
                    "Attempt {} submitted: {} ({} operations)",
                    outcome.attempt_id, outcome.effects.digest, outcome.operations
                );
                Ok(outcome)
            }
            Err(e) => {
                let label = if e.is_validation() { "rejected" } else { "aborted" };
                metric_inc!(ATTEMPTS, &[label]);
                if e.is_retryable() {
                    warn!("Attempt failed, rebuild and retry later: {}", e);
                }
                Err(e).context("Registration attempt failed")
            }
        }
    }

    /// Service counters.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.service.metrics()
    }
}

fn record_oracle_delta(before: &MetricsSnapshot, after: &MetricsSnapshot) {
    let ok = after.oracle_fetches.saturating_sub(before.oracle_fetches);
    let failed = after.oracle_failures.saturating_sub(before.oracle_failures);
    if ok > 0 {
        ORACLE_FETCHES.with_label_values(&["ok"]).inc_by(ok as f64);
    }
    if failed > 0 {
        ORACLE_FETCHES.with_label_values(&["failed"]).inc_by(failed as f64);
    }
}
