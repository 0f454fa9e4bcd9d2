//! Submission Adapters
//!
//! Signing and broadcasting are outside this crate. These adapters stand in
//! for the wallet: one records what it was given, the other renders it.

use crate::domain::{RegistrationError, Result, SealedTransaction};
use crate::ports::outbound::{SubmissionEffects, SubmissionService};
use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::{debug, info};

/// SHA-256 over the JSON rendering, hex encoded.
pub fn transaction_digest(transaction: &SealedTransaction) -> Result<String> {
    let json = serde_json::to_vec(transaction)
        .map_err(|e| RegistrationError::SubmissionFailure(format!("serialization: {e}")))?;
    Ok(hex::encode(Sha256::digest(&json)))
}

/// Keeps every submitted transaction; can be told to fail.
#[derive(Default)]
pub struct RecordingSubmitter {
    submitted: Mutex<Vec<SealedTransaction>>,
    failure: Option<String>,
}

impl RecordingSubmitter {
    /// Submitter that accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Submitter that rejects everything with `status`.
    pub fn failing(status: impl Into<String>) -> Self {
        Self {
            submitted: Mutex::new(Vec::new()),
            failure: Some(status.into()),
        }
    }

    /// Transactions accepted so far.
    pub fn submitted(&self) -> Vec<SealedTransaction> {
        self.submitted.lock().clone()
    }
}

#[async_trait]
impl SubmissionService for RecordingSubmitter {
    async fn sign_and_submit(&self, transaction: SealedTransaction) -> Result<SubmissionEffects> {
        if let Some(status) = &self.failure {
            return Err(RegistrationError::SubmissionFailure(status.clone()));
        }
        let digest = transaction_digest(&transaction)?;
        self.submitted.lock().push(transaction);
        Ok(SubmissionEffects {
            digest,
            success: true,
            status: "success".to_string(),
        })
    }
}

/// Logs the transaction instead of broadcasting it.
#[derive(Clone, Copy, Debug, Default)]
pub struct DryRunSubmitter;

#[async_trait]
impl SubmissionService for DryRunSubmitter {
    async fn sign_and_submit(&self, transaction: SealedTransaction) -> Result<SubmissionEffects> {
        let digest = transaction_digest(&transaction)?;
        info!(
            "[ns-reg] Dry run {}: {} operations, {} inputs",
            digest,
            transaction.operations.len(),
            transaction.inputs.len()
        );
        debug!("[ns-reg] {}", transaction.to_json()?);
        Ok(SubmissionEffects {
            digest,
            success: true,
            status: "dry-run".to_string(),
        })
    }
}
