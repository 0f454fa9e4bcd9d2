//! # Outbound Ports
//!
//! Traits for external dependencies (price oracle, submission, time).

use crate::domain::{RegistrationError, Result, SealedTransaction};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Latest signed price for one feed, as returned by the price service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceUpdate {
    /// Hex price id of the feed
    pub price_id: String,
    /// Price mantissa
    pub price: i64,
    /// Confidence interval
    pub conf: u64,
    /// Decimal exponent
    pub expo: i32,
    /// Publish time, unix seconds
    pub publish_time: u64,
    /// Signed update payload, registered on chain as-is
    pub update_data: Vec<u8>,
}

/// Price oracle - outbound port.
#[async_trait]
pub trait PriceService: Send + Sync {
    /// Fetch the latest signed update for `price_id` (32-byte hex).
    async fn fetch_update(&self, price_id: &str) -> Result<PriceUpdate>;
}

/// Result of signing and submitting a sealed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionEffects {
    /// Transaction digest
    pub digest: String,
    /// Whether execution succeeded
    pub success: bool,
    /// Execution status message
    pub status: String,
}

/// Signing and submission - outbound port.
#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Sign and submit; returns the execution effects.
    async fn sign_and_submit(&self, transaction: SealedTransaction) -> Result<SubmissionEffects>;
}

/// Wall clock - outbound port.
pub trait Clock: Send + Sync {
    /// Current unix time in seconds.
    fn now_secs(&self) -> u64;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Scripted price service.
#[derive(Clone, Default)]
pub struct MockPriceService {
    updates: Arc<Mutex<HashMap<String, PriceUpdate>>>,
    calls: Arc<AtomicUsize>,
    /// Artificial latency per call
    pub delay: Option<Duration>,
    /// Should fail?
    pub should_fail: bool,
}

impl MockPriceService {
    /// Empty mock; every fetch fails with `UnknownFeed` until scripted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the answer for `price_id`.
    pub fn with_update(self, update: PriceUpdate) -> Self {
        self.updates.lock().insert(update.price_id.clone(), update);
        self
    }

    /// Delay every call by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail every call.
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceService for MockPriceService {
    async fn fetch_update(&self, price_id: &str) -> Result<PriceUpdate> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            return Err(RegistrationError::OracleUnavailable("Mock failure".to_string()));
        }
        self.updates
            .lock()
            .get(price_id)
            .cloned()
            .ok_or_else(|| RegistrationError::UnknownFeed(price_id.to_string()))
    }
}

/// Settable clock.
#[derive(Debug, Default)]
pub struct MockClock {
    now: AtomicU64,
}

impl MockClock {
    /// Clock frozen at `secs`.
    pub fn at(secs: u64) -> Self {
        Self {
            now: AtomicU64::new(secs),
        }
    }

    /// Move forward by `secs`.
    pub fn advance(&self, secs: u64) {
        self.now.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for MockClock {
    fn now_secs(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
