//! Shared test fixtures.
//!
//! The scripted oracle quotes USDC at $1.00 and NS at $0.50, both published
//! at [`NOW`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ns_registration::domain::{Argument, Input, ObjectId, PureValue};
use ns_registration::{
    FeedId, MockClock, MockPriceService, PriceService, PriceUpdate, RecordingSubmitter,
    RegistrationConfig, RegistrationRequest, RegistrationService, Result, SealedTransaction,
    SuiAddress,
};
use parking_lot::Mutex;

/// Frozen wall clock for every fixture.
pub const NOW: u64 = 1_700_000_000;

/// One whole USDC.
pub const USDC: u64 = 1_000_000;

/// Test configuration: SUI base, USDC and NS oracle-priced.
pub fn config() -> RegistrationConfig {
    RegistrationConfig::for_testing()
}

/// Beneficiary used by every request.
pub fn recipient() -> SuiAddress {
    SuiAddress::new([0xee; 32])
}

/// A caller-owned coin object.
pub fn coin() -> ObjectId {
    SuiAddress::new([0xc0; 32])
}

/// An owned registration NFT.
pub fn nft() -> ObjectId {
    SuiAddress::new([0xaf; 32])
}

/// Signed update for `feed` as the price service would return it.
pub fn price_update(feed: &str, price: i64, expo: i32, publish_time: u64) -> PriceUpdate {
    let config = config();
    let price_id = config
        .feed_price_id(&FeedId::new(feed))
        .expect("feed configured for testing")
        .to_string();
    PriceUpdate {
        price_id,
        price,
        conf: 10_000,
        expo,
        publish_time,
        update_data: format!("vaa:{feed}:{publish_time}").into_bytes(),
    }
}

/// Oracle scripted with fresh USDC and NS quotes.
pub fn oracle() -> MockPriceService {
    MockPriceService::new()
        .with_update(price_update("USDC/USD", 100_000_000, -8, NOW))
        .with_update(price_update("NS/USD", 50_000_000, -8, NOW))
}

/// Service over the given oracle and submitter, clock frozen at [`NOW`].
pub fn service_with(
    oracle: Arc<dyn PriceService>,
    submitter: Arc<RecordingSubmitter>,
) -> RegistrationService {
    RegistrationService::new(config(), oracle, submitter, Arc::new(MockClock::at(NOW)))
        .expect("testing config is valid")
}

/// Service over the scripted oracle with a recording submitter.
pub fn service() -> (RegistrationService, MockPriceService, Arc<RecordingSubmitter>) {
    let oracle = oracle();
    let submitter = Arc::new(RecordingSubmitter::new());
    let service = service_with(Arc::new(oracle.clone()), submitter.clone());
    (service, oracle, submitter)
}

/// Scenario A: `alice.sui`, one year, base asset from gas.
pub fn alice_base() -> RegistrationRequest {
    RegistrationRequest::register(
        "alice.sui",
        1,
        "SUI",
        ns_registration::FundingSource::Gas,
        recipient(),
    )
}

/// Scenario B: `bob.sui`, two years, USDC from a coin object.
pub fn bob_usdc() -> RegistrationRequest {
    RegistrationRequest::register(
        "bob.sui",
        2,
        "USDC",
        ns_registration::FundingSource::Coin(coin()),
        recipient(),
    )
}

/// Pure value behind `argument`, if it is a pure input.
pub fn pure_value(tx: &SealedTransaction, argument: &Argument) -> Option<PureValue> {
    match argument {
        Argument::Input(index) => match tx.inputs.get(usize::from(*index))? {
            Input::Pure { value } => Some(value.clone()),
            Input::Object { .. } => None,
        },
        _ => None,
    }
}

/// Price service that tracks how many fetches are in flight at once.
pub struct GaugedOracle {
    inner: MockPriceService,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl GaugedOracle {
    /// Wrap `inner`; each fetch holds its slot for `inner`'s delay.
    pub fn new(inner: MockPriceService) -> Self {
        Self {
            inner,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Highest number of concurrent fetches observed.
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Price ids requested, in arrival order.
    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().clone()
    }
}

#[async_trait]
impl PriceService for GaugedOracle {
    async fn fetch_update(&self, price_id: &str) -> Result<PriceUpdate> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.seen.lock().push(price_id.to_string());
        let result = self.inner.fetch_update(price_id).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Delay used by slow oracle scripts.
pub const SLOW_ORACLE: Duration = Duration::from_millis(20);
