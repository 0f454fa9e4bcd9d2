//! Registration Service Implementation
//!
//! Concrete [`RegistrationApi`] used by the runtime. Each call builds a fresh
//! attempt with its own context; nothing is shared between attempts except
//! the collaborators and the metrics collector.

use crate::{
    attempt::RegistrationAttempt,
    config::RegistrationConfig,
    domain::{RegistrationError, RegistrationRequest, Result, SealedTransaction},
    metrics::{Metrics, MetricsSnapshot},
    ports::{Clock, PriceService, RegistrationApi, RegistrationOutcome, SubmissionService},
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

/// Concrete implementation of [`RegistrationApi`]
pub struct RegistrationService {
    /// Validated configuration
    config: Arc<RegistrationConfig>,

    /// Price oracle
    oracle: Arc<dyn PriceService>,

    /// Signing and submission
    submitter: Arc<dyn SubmissionService>,

    /// Time source for quote freshness
    clock: Arc<dyn Clock>,

    /// Counters
    metrics: Arc<Metrics>,
}

impl RegistrationService {
    /// Create a new service; the configuration is validated first.
    pub fn new(
        config: RegistrationConfig,
        oracle: Arc<dyn PriceService>,
        submitter: Arc<dyn SubmissionService>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        info!("[ns-reg] Initializing Registration Service");
        info!("  Network: {}", config.network);
        info!("  Base asset: {}", config.base_asset);
        info!("  Assets: {}", config.assets.len());
        info!("  Max quote age: {}s", config.max_quote_age_secs);

        Ok(Self {
            config: Arc::new(config),
            oracle,
            submitter,
            clock,
            metrics: Arc::new(Metrics::new()),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &RegistrationConfig {
        &self.config
    }

    /// Shared metrics collector.
    pub fn metrics_handle(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// Start a new attempt without running it.
    pub fn begin(&self, request: RegistrationRequest) -> Result<RegistrationAttempt> {
        self.metrics.record_attempt_started();
        match RegistrationAttempt::new(Arc::clone(&self.config), request) {
            Ok(attempt) => Ok(attempt.with_metrics(Arc::clone(&self.metrics))),
            Err(e) => {
                self.metrics.record_attempt_aborted();
                Err(e)
            }
        }
    }
}

#[async_trait]
impl RegistrationApi for RegistrationService {
    async fn compose(&self, request: RegistrationRequest) -> Result<SealedTransaction> {
        let mut attempt = self.begin(request)?;
        attempt
            .compose(self.oracle.as_ref(), self.clock.as_ref())
            .await?;
        attempt.seal()
    }

    async fn register(&self, request: RegistrationRequest) -> Result<RegistrationOutcome> {
        let sealed = self.compose(request).await?;
        let attempt_id = sealed.id;
        let operations = sealed.operations.len();

        let effects = match self.submitter.sign_and_submit(sealed).await {
            Ok(effects) => effects,
            Err(e) => {
                self.metrics.record_submission(false);
                error!("[ns-reg] Submission of {} failed: {}", attempt_id, e);
                return Err(match e {
                    RegistrationError::SubmissionFailure(_) => e,
                    other => RegistrationError::SubmissionFailure(other.to_string()),
                });
            }
        };

        if !effects.success {
            self.metrics.record_submission(false);
            error!(
                "[ns-reg] Transaction {} failed on chain: {}",
                effects.digest, effects.status
            );
            return Err(RegistrationError::SubmissionFailure(effects.status));
        }

        self.metrics.record_submission(true);
        info!(
            "[ns-reg] Attempt {} submitted as {}",
            attempt_id, effects.digest
        );
        Ok(RegistrationOutcome {
            attempt_id,
            operations,
            effects,
        })
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
