//! # Payment Settler
//!
//! Carves the computed amount out of the funding source and feeds it into
//! the settle call selected for the attempt's funding path.

use crate::config::ContractIds;
use crate::domain::{
    invariant_within_ceiling, AmountKind, Argument, FundingPath, FundingSource, Handle, IntentRef,
    MoveTarget, OperationKind, PaymentAsset, PureValue, QuoteRef, ReceiptKind, RegistrationError,
    Result, TransactionContext,
};
use tracing::debug;

/// Branch-specific settlement inputs.
///
/// Built from the attempt's [`FundingPath`]; a base settlement can never carry
/// a quote and an oracle-priced one can never lack one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    /// `handle_base_payment`
    Base,
    /// `handle_payment` with the quote and ceiling
    OraclePriced {
        /// Registered quote
        quote: QuoteRef,
        /// Local estimate checked against the ceiling before the split.
        /// `None` leaves the ceiling to the settle call alone.
        estimated: Option<u64>,
        /// Ceiling in the asset's smallest unit
        max_spend: u64,
    },
}

impl Settlement {
    /// Pair the selected path with what the attempt gathered so far.
    pub fn for_path(path: &FundingPath, quote: Option<QuoteRef>, estimated: Option<u64>) -> Result<Self> {
        match (path, quote) {
            (FundingPath::Base, None) => Ok(Self::Base),
            (FundingPath::OraclePriced { max_spend, .. }, Some(quote)) => {
                Ok(Self::OraclePriced {
                    quote,
                    estimated,
                    max_spend: *max_spend,
                })
            }
            (FundingPath::Base, Some(_)) => Err(RegistrationError::IncompleteFlow(
                "base settlement cannot use a quote".to_string(),
            )),
            (FundingPath::OraclePriced { .. }, None) => Err(RegistrationError::IncompleteFlow(
                "oracle-priced settlement requires a quote".to_string(),
            )),
        }
    }
}

fn funding_argument(ctx: &mut TransactionContext, funding: FundingSource) -> Result<Argument> {
    match funding {
        FundingSource::Gas => Ok(ctx.gas()),
        FundingSource::Coin(id) => ctx.object(id),
    }
}

/// Append split + settle, returning the receipt handle.
///
/// On the oracle-priced branch a supplied estimate is checked against the
/// ceiling first, so a rejected attempt never contains a split.
pub fn settle(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    intent: &IntentRef,
    amount: &Handle<AmountKind>,
    asset: &PaymentAsset,
    funding: FundingSource,
    settlement: &Settlement,
) -> Result<Handle<ReceiptKind>> {
    if let Settlement::OraclePriced {
        estimated: Some(estimated),
        max_spend,
        ..
    } = settlement
    {
        invariant_within_ceiling(*estimated, *max_spend)?;
    }

    let source = funding_argument(ctx, funding)?;
    let amount_arg = ctx.arg(amount)?;
    let payment = ctx
        .split_coins(source, vec![amount_arg])?
        .into_iter()
        .next()
        .ok_or_else(|| RegistrationError::IncompleteFlow("split produced no coin".to_string()))?;

    let suins = ctx.object(contracts.suins_object)?;
    let intent_arg = ctx.arg(&intent.handle)?;
    let payment_arg = ctx.arg(&payment)?;
    let type_arguments = vec![asset.coin_type.to_string()];

    let receipt = match settlement {
        Settlement::Base => ctx.move_call(
            OperationKind::SettleBase,
            MoveTarget::new(contracts.payments_package, "payments", "handle_base_payment"),
            vec![suins, intent_arg, payment_arg],
            type_arguments,
        )?,
        Settlement::OraclePriced {
            quote, max_spend, ..
        } => {
            let clock = ctx.clock()?;
            let price_info = ctx.arg(&quote.handle)?;
            let ceiling = ctx.pure(PureValue::U64(*max_spend))?;
            ctx.move_call(
                OperationKind::SettleOracle,
                MoveTarget::new(contracts.payments_package, "payments", "handle_payment"),
                vec![suins, intent_arg, payment_arg, clock, price_info, ceiling],
                type_arguments,
            )?
        }
    };

    debug!(
        "[ns-reg] Settled {} in {} at op {}",
        intent.intent.domain,
        asset.name,
        receipt.index()
    );
    Ok(receipt)
}
