//! # Oracle Price Fetcher
//!
//! The single suspension point of an attempt: one round-trip to the price
//! service, validated, then folded into the context as a registered price
//! update. Nothing is appended unless the quote is usable.

use crate::config::{ContractIds, RegistrationConfig};
use crate::domain::{
    invariant_quote_fresh, AssetQuote, FeedId, MoveTarget, OperationKind, PureValue, QuoteRef,
    RegistrationError, Result, TransactionContext,
};
use crate::ports::{Clock, PriceService, PriceUpdate};
use tracing::{debug, warn};

/// A validated quote and the signed payload it came with.
#[derive(Clone, Debug)]
pub struct FetchedQuote {
    /// Local copy of the price values
    pub quote: AssetQuote,
    /// Signed update payload
    pub update_data: Vec<u8>,
}

fn normalize(id: &str) -> String {
    id.trim_start_matches("0x").to_ascii_lowercase()
}

fn validate_update(feed: &FeedId, price_id: &str, update: &PriceUpdate) -> Result<()> {
    let invalid = |reason: String| RegistrationError::InvalidQuote {
        feed: feed.to_string(),
        reason,
    };
    if normalize(&update.price_id) != normalize(price_id) {
        return Err(invalid(format!("answered for {}", update.price_id)));
    }
    if update.price <= 0 {
        return Err(invalid(format!("non-positive price {}", update.price)));
    }
    if update.update_data.is_empty() {
        return Err(invalid("empty update payload".to_string()));
    }
    Ok(())
}

/// Fetch and validate the latest quote for `feed`.
pub async fn fetch_quote(
    oracle: &dyn PriceService,
    clock: &dyn Clock,
    config: &RegistrationConfig,
    feed: &FeedId,
) -> Result<FetchedQuote> {
    let price_id = config.feed_price_id(feed)?;
    debug!("[ns-reg] Fetching {} ({})", feed, price_id);

    let update = match tokio::time::timeout(config.oracle_timeout(), oracle.fetch_update(price_id)).await {
        Ok(result) => result?,
        Err(_) => {
            warn!(
                "[ns-reg] Price service timed out after {}ms for {}",
                config.oracle_timeout_ms, feed
            );
            return Err(RegistrationError::OracleUnavailable(format!(
                "{feed}: timed out after {}ms",
                config.oracle_timeout_ms
            )));
        }
    };

    validate_update(feed, price_id, &update)?;
    invariant_quote_fresh(
        feed.as_str(),
        update.publish_time,
        clock.now_secs(),
        config.max_quote_age_secs,
    )?;

    Ok(FetchedQuote {
        quote: AssetQuote {
            feed: feed.clone(),
            price: update.price,
            conf: update.conf,
            expo: update.expo,
            publish_time: update.publish_time,
        },
        update_data: update.update_data,
    })
}

/// Append the call registering `fetched` on chain.
pub fn register_quote(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    fetched: FetchedQuote,
) -> Result<QuoteRef> {
    let pyth_state = ctx.object(contracts.pyth_state)?;
    let wormhole_state = ctx.object(contracts.wormhole_state)?;
    let payload = ctx.pure(PureValue::Bytes(fetched.update_data))?;
    let clock = ctx.clock()?;
    let handle = ctx.move_call(
        OperationKind::RegisterPriceUpdate,
        MoveTarget::new(contracts.pyth_package, "pyth", "update_single_price_feed"),
        vec![pyth_state, wormhole_state, payload, clock],
        vec![],
    )?;
    debug!(
        "[ns-reg] Price update for {} registered at op {}",
        fetched.quote.feed,
        handle.index()
    );
    Ok(QuoteRef {
        quote: fetched.quote,
        handle,
    })
}

/// Fetch, validate and register a quote in one step.
pub async fn fetch_and_register(
    ctx: &mut TransactionContext,
    oracle: &dyn PriceService,
    clock: &dyn Clock,
    config: &RegistrationConfig,
    feed: &FeedId,
) -> Result<QuoteRef> {
    let fetched = fetch_quote(oracle, clock, config, feed).await?;
    register_quote(ctx, &config.contracts, fetched)
}
