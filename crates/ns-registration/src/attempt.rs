//! # Registration Attempt
//!
//! Drives one attempt through
//! `Initialized -> IntentCreated -> PriceComputed -> [QuoteFetched] -> Settled -> Finalized`,
//! owning the attempt's [`TransactionContext`] exclusively. Any failure moves the
//! attempt to `Aborted`; an aborted context stays inspectable but can never be
//! sealed.

use crate::algorithms::{
    apply_discount, build_intent, compute_amount, convert_amount, estimate_spend,
    fetch_and_register, finalize, settle, Settlement,
};
use crate::config::RegistrationConfig;
use crate::domain::{
    AmountKind, AttemptState, Discount, FundingPath, FundingSource, Handle, IntentRef,
    PaymentAsset, QuoteRef, ReceiptKind, RegistrationError, RegistrationRequest, Result,
    SealedTransaction, TransactionContext,
};
use crate::metrics::Metrics;
use crate::ports::{Clock, PriceService};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// One registration or renewal attempt.
pub struct RegistrationAttempt {
    config: Arc<RegistrationConfig>,
    metrics: Arc<Metrics>,
    request: RegistrationRequest,
    asset: PaymentAsset,
    path: FundingPath,
    state: AttemptState,
    ctx: TransactionContext,
    intent: Option<IntentRef>,
    amount: Option<Handle<AmountKind>>,
    quote: Option<QuoteRef>,
    estimated: Option<u64>,
    receipt: Option<Handle<ReceiptKind>>,
    failure: Option<RegistrationError>,
}

impl RegistrationAttempt {
    /// Start an attempt. The funding path is selected here and never changes.
    pub fn new(config: Arc<RegistrationConfig>, request: RegistrationRequest) -> Result<Self> {
        let asset = config.asset(&request.asset)?.clone();
        if matches!(request.funding, FundingSource::Gas) && !asset.coin_type.is_native_sui() {
            return Err(RegistrationError::InvalidFunding {
                asset: asset.name,
                reason: "the gas coin can only pay in SUI".to_string(),
            });
        }
        let max_spend = request
            .max_spend
            .unwrap_or_else(|| config.default_max_spend(&asset));
        let path = FundingPath::select(&asset, max_spend);

        Ok(Self {
            config,
            metrics: Arc::new(Metrics::new()),
            request,
            asset,
            path,
            state: AttemptState::Initialized,
            ctx: TransactionContext::new(),
            intent: None,
            amount: None,
            quote: None,
            estimated: None,
            receipt: None,
            failure: None,
        })
    }

    /// Report into a shared collector.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Attempt id (equal to the context id).
    pub fn id(&self) -> Uuid {
        self.ctx.id()
    }

    /// Current state.
    pub fn state(&self) -> AttemptState {
        self.state
    }

    /// Selected funding path.
    pub fn path(&self) -> &FundingPath {
        &self.path
    }

    /// Context built so far.
    pub fn context(&self) -> &TransactionContext {
        &self.ctx
    }

    /// Error that aborted the attempt.
    pub fn failure(&self) -> Option<&RegistrationError> {
        self.failure.as_ref()
    }

    /// Quote used, on the oracle-priced path.
    pub fn quote(&self) -> Option<&QuoteRef> {
        self.quote.as_ref()
    }

    /// Local spend estimate, on the oracle-priced path.
    pub fn estimated_spend(&self) -> Option<u64> {
        self.estimated
    }

    fn ensure(&self, next: AttemptState) -> Result<()> {
        if !self
            .state
            .can_transition_to(next, self.path.is_oracle_priced())
        {
            return Err(RegistrationError::InvalidTransition {
                from: self.state.to_string(),
                to: next.to_string(),
            });
        }
        Ok(())
    }

    fn abort(&mut self, error: &RegistrationError) {
        if self.state.is_terminal() {
            return;
        }
        warn!(
            "[ns-reg] Attempt {} aborted in {}: {}",
            self.id(),
            self.state,
            error
        );
        self.state = AttemptState::Aborted;
        self.failure = Some(error.clone());
        self.metrics.record_attempt_aborted();
    }

    fn record<T>(&mut self, result: Result<T>) -> Result<T> {
        if let Err(error) = &result {
            self.abort(error);
        }
        result
    }

    fn missing(what: &str) -> RegistrationError {
        RegistrationError::IncompleteFlow(format!("{what} missing"))
    }

    /// Append the intent and any discount.
    pub fn create_intent(&mut self) -> Result<()> {
        let result = self.try_create_intent();
        self.record(result)
    }

    fn try_create_intent(&mut self) -> Result<()> {
        self.ensure(AttemptState::IntentCreated)?;
        let intent = build_intent(
            &mut self.ctx,
            &self.config.contracts,
            &self.request.target,
            self.request.years,
            self.config.max_years,
        )?;
        apply_discount(
            &mut self.ctx,
            &self.config.contracts,
            &intent,
            &self.request.discount,
        )?;
        self.intent = Some(intent);
        self.state = AttemptState::IntentCreated;
        Ok(())
    }

    /// Append the discounted amount.
    pub fn compute_price(&mut self) -> Result<()> {
        let result = self.try_compute_price();
        self.record(result)
    }

    fn try_compute_price(&mut self) -> Result<()> {
        self.ensure(AttemptState::PriceComputed)?;
        let intent = self.intent.as_ref().ok_or_else(|| Self::missing("intent"))?;
        let amount = compute_amount(&mut self.ctx, &self.config.contracts, intent, &self.asset)?;
        self.amount = Some(amount);
        self.state = AttemptState::PriceComputed;
        Ok(())
    }

    /// Fetch and register the quote, then convert the amount with it.
    pub async fn fetch_quote(&mut self, oracle: &dyn PriceService, clock: &dyn Clock) -> Result<()> {
        let result = self.try_fetch_quote(oracle, clock).await;
        self.record(result)
    }

    async fn try_fetch_quote(&mut self, oracle: &dyn PriceService, clock: &dyn Clock) -> Result<()> {
        self.ensure(AttemptState::QuoteFetched)?;
        let feed = match &self.path {
            FundingPath::OraclePriced { feed, .. } => feed.clone(),
            FundingPath::Base => return Err(Self::missing("price feed")),
        };

        let fetched = fetch_and_register(&mut self.ctx, oracle, clock, &self.config, &feed).await;
        self.metrics.record_oracle_fetch(fetched.is_ok());
        let quote = fetched?;

        let intent = self.intent.as_ref().ok_or_else(|| Self::missing("intent"))?;
        let amount = self.amount.as_ref().ok_or_else(|| Self::missing("amount"))?;
        let estimated = estimate_spend(&self.config, &intent.intent, &self.asset, &quote.quote)?;
        let converted = convert_amount(&mut self.ctx, &self.config.contracts, amount, &self.asset, &quote)?;

        info!(
            "[ns-reg] {} quoted at {}e{}, estimated spend {} {}",
            feed, quote.quote.price, quote.quote.expo, estimated, self.asset.name
        );
        self.amount = Some(converted);
        self.estimated = Some(estimated);
        self.quote = Some(quote);
        self.state = AttemptState::QuoteFetched;
        Ok(())
    }

    /// Append split and settle.
    pub fn settle(&mut self) -> Result<()> {
        let result = self.try_settle();
        self.record(result)
    }

    fn try_settle(&mut self) -> Result<()> {
        self.ensure(AttemptState::Settled)?;
        // coupon and holding discounts are resolved on chain, so a discounted
        // estimate is only an upper bound and the settle call enforces the ceiling
        let checked = match self.request.discount {
            Discount::None => self.estimated,
            _ => None,
        };
        let settlement = Settlement::for_path(&self.path, self.quote.clone(), checked)?;
        let intent = self.intent.as_ref().ok_or_else(|| Self::missing("intent"))?;
        let amount = self.amount.as_ref().ok_or_else(|| Self::missing("amount"))?;
        let receipt = settle(
            &mut self.ctx,
            &self.config.contracts,
            intent,
            amount,
            &self.asset,
            self.request.funding,
            &settlement,
        )?;
        self.receipt = Some(receipt);
        self.state = AttemptState::Settled;
        Ok(())
    }

    /// Append the claim (and transfer for new registrations).
    pub fn finalize(&mut self) -> Result<()> {
        let result = self.try_finalize();
        self.record(result)
    }

    fn try_finalize(&mut self) -> Result<()> {
        self.ensure(AttemptState::Finalized)?;
        let intent = self.intent.as_ref().ok_or_else(|| Self::missing("intent"))?;
        finalize(
            &mut self.ctx,
            &self.config.contracts,
            &intent.intent,
            self.receipt.as_ref(),
            self.request.recipient,
        )?;
        self.state = AttemptState::Finalized;
        self.metrics.record_attempt_finalized(self.ctx.len());
        info!(
            "[ns-reg] Attempt {} finalized with {} operations",
            self.id(),
            self.ctx.len()
        );
        Ok(())
    }

    /// Run every step in order. The oracle step runs only on the
    /// oracle-priced path.
    #[instrument(name = "registration_attempt", skip_all, fields(attempt_id = %self.id()))]
    pub async fn compose(&mut self, oracle: &dyn PriceService, clock: &dyn Clock) -> Result<()> {
        info!(
            "[ns-reg] Composing {} for {} years in {}",
            self.request.target.domain(),
            self.request.years,
            self.asset.name
        );
        self.create_intent()?;
        self.compute_price()?;
        if self.path.is_oracle_priced() {
            self.fetch_quote(oracle, clock).await?;
        }
        self.settle()?;
        self.finalize()
    }

    /// Seal the finalized context for submission.
    pub fn seal(self) -> Result<SealedTransaction> {
        if self.state != AttemptState::Finalized {
            return Err(RegistrationError::IncompleteFlow(format!(
                "cannot seal attempt in state {}",
                self.state
            )));
        }
        Ok(self.ctx.seal())
    }
}
