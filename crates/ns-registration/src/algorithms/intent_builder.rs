//! # Payment Intent Builder
//!
//! Appends the `init_registration` / `init_renewal` call that every attempt
//! starts with. Inputs are validated before the context is touched.

use crate::config::ContractIds;
use crate::domain::{
    DomainName, IntentRef, MoveTarget, OperationKind, PaymentIntent, PureValue,
    RegistrationTarget, RegistrationYears, Result, TransactionContext,
};
use tracing::debug;

const PAYMENT_MODULE: &str = "payment";

/// Validate the target and duration without appending anything.
pub fn validate_intent(target: &RegistrationTarget, years: u8, max_years: u8) -> Result<PaymentIntent> {
    let domain = DomainName::parse(target.domain())?;
    let years = RegistrationYears::new(years, max_years)?;
    let renewal_of = match target {
        RegistrationTarget::Register { .. } => None,
        RegistrationTarget::Renew { nft, .. } => Some(*nft),
    };
    Ok(PaymentIntent {
        domain,
        years,
        renewal_of,
    })
}

/// Append the init call for an already validated intent.
pub fn append_intent(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    intent: PaymentIntent,
) -> Result<IntentRef> {
    let suins = ctx.object(contracts.suins_object)?;
    let handle = match intent.renewal_of {
        None => {
            let domain = ctx.pure(PureValue::String(intent.domain.to_string()))?;
            let years = ctx.pure(PureValue::U8(intent.years.get()))?;
            ctx.move_call(
                OperationKind::InitRegistration,
                MoveTarget::new(contracts.suins_package, PAYMENT_MODULE, "init_registration"),
                vec![suins, domain, years],
                vec![],
            )?
        }
        Some(nft) => {
            let nft = ctx.object(nft)?;
            let years = ctx.pure(PureValue::U8(intent.years.get()))?;
            ctx.move_call(
                OperationKind::InitRenewal,
                MoveTarget::new(contracts.suins_package, PAYMENT_MODULE, "init_renewal"),
                vec![suins, nft, years],
                vec![],
            )?
        }
    };

    debug!(
        "[ns-reg] Intent for {} ({} years) at op {}",
        intent.domain,
        intent.years.get(),
        handle.index()
    );
    Ok(IntentRef { intent, handle })
}

/// Validate, then append the init call.
pub fn build_intent(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    target: &RegistrationTarget,
    years: u8,
    max_years: u8,
) -> Result<IntentRef> {
    let intent = validate_intent(target, years, max_years)?;
    append_intent(ctx, contracts, intent)
}
