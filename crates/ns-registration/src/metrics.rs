//! Metrics collection for the registration composer

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for registration attempts
#[derive(Debug, Default)]
pub struct Metrics {
    /// Attempts started
    pub attempts_started: AtomicU64,

    /// Attempts that reached `Finalized`
    pub attempts_finalized: AtomicU64,

    /// Attempts that ended in `Aborted`
    pub attempts_aborted: AtomicU64,

    /// Oracle round-trips that produced a usable quote
    pub oracle_fetches: AtomicU64,

    /// Oracle round-trips that failed, timed out or returned a bad quote
    pub oracle_failures: AtomicU64,

    /// Operations appended across all attempts
    pub operations_appended: AtomicU64,

    /// Transactions handed to the submission service
    pub submissions: AtomicU64,

    /// Submissions that failed
    pub submission_failures: AtomicU64,
}

/// Point-in-time copy of [`Metrics`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Attempts started
    pub attempts_started: u64,
    /// Attempts finalized
    pub attempts_finalized: u64,
    /// Attempts aborted
    pub attempts_aborted: u64,
    /// Successful oracle fetches
    pub oracle_fetches: u64,
    /// Failed oracle fetches
    pub oracle_failures: u64,
    /// Operations appended
    pub operations_appended: u64,
    /// Submissions
    pub submissions: u64,
    /// Failed submissions
    pub submission_failures: u64,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a started attempt
    pub fn record_attempt_started(&self) {
        self.attempts_started.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a finalized attempt and its operation count
    pub fn record_attempt_finalized(&self, operations: usize) {
        self.attempts_finalized.fetch_add(1, Ordering::Relaxed);
        self.operations_appended
            .fetch_add(operations as u64, Ordering::Relaxed);
    }

    /// Record an aborted attempt
    pub fn record_attempt_aborted(&self) {
        self.attempts_aborted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an oracle round-trip
    pub fn record_oracle_fetch(&self, ok: bool) {
        if ok {
            self.oracle_fetches.fetch_add(1, Ordering::Relaxed);
        } else {
            self.oracle_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Record a submission
    pub fn record_submission(&self, ok: bool) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.submission_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Share of started attempts that were finalized
    pub fn get_finalize_ratio(&self) -> f64 {
        let started = self.attempts_started.load(Ordering::Relaxed);
        if started == 0 {
            return 0.0;
        }
        let finalized = self.attempts_finalized.load(Ordering::Relaxed);
        finalized as f64 / started as f64
    }

    /// Copy all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            attempts_started: self.attempts_started.load(Ordering::Relaxed),
            attempts_finalized: self.attempts_finalized.load(Ordering::Relaxed),
            attempts_aborted: self.attempts_aborted.load(Ordering::Relaxed),
            oracle_fetches: self.oracle_fetches.load(Ordering::Relaxed),
            oracle_failures: self.oracle_failures.load(Ordering::Relaxed),
            operations_appended: self.operations_appended.load(Ordering::Relaxed),
            submissions: self.submissions.load(Ordering::Relaxed),
            submission_failures: self.submission_failures.load(Ordering::Relaxed),
        }
    }
}
