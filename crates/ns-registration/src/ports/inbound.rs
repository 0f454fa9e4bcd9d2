//! # Inbound Ports
//!
//! API trait defining what the registration composer can do.

use crate::domain::{RegistrationRequest, Result, SealedTransaction};
use crate::metrics::MetricsSnapshot;
use crate::ports::outbound::SubmissionEffects;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a submitted attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationOutcome {
    /// Attempt (and context) id
    pub attempt_id: Uuid,
    /// Number of operations submitted
    pub operations: usize,
    /// Effects reported by the submission service
    pub effects: SubmissionEffects,
}

/// Registration API - inbound port.
#[async_trait]
pub trait RegistrationApi: Send + Sync {
    /// Compose the full transaction for `request` without submitting it.
    async fn compose(&self, request: RegistrationRequest) -> Result<SealedTransaction>;

    /// Compose and submit exactly once.
    async fn register(&self, request: RegistrationRequest) -> Result<RegistrationOutcome>;

    /// Counters since start.
    fn metrics(&self) -> MetricsSnapshot;
}
