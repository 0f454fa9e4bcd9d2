//! # Price Calculator
//!
//! Discount application, the amount owed, its conversion through a quote,
//! and the local estimate of what a conversion will spend.

use crate::config::{ContractIds, RegistrationConfig};
use crate::domain::{
    convert_to_asset_units, AmountKind, AssetQuote, Discount, Handle, IntentRef, MoveTarget,
    OperationKind, PaymentAsset, PaymentIntent, PureValue, QuoteRef, Result, TransactionContext,
    UnitKind,
};
use tracing::debug;

const PAYMENTS_MODULE: &str = "payments";

/// Append the discount call for `discount`, if any.
///
/// With no discount nothing is appended: the always-present
/// `calculate_price_after_discount` call then prices the intent unchanged.
pub fn apply_discount(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    intent: &IntentRef,
    discount: &Discount,
) -> Result<()> {
    match discount {
        Discount::None => Ok(()),
        Discount::Coupon { code } => {
            let suins = ctx.object(contracts.suins_object)?;
            let intent_arg = ctx.arg(&intent.handle)?;
            let code = ctx.pure(PureValue::String(code.clone()))?;
            let clock = ctx.clock()?;
            let _: Handle<UnitKind> = ctx.move_call(
                OperationKind::ApplyCoupon,
                MoveTarget::new(contracts.coupons_package, "coupon_house", "apply_coupon"),
                vec![suins, intent_arg, code, clock],
                vec![],
            )?;
            debug!("[ns-reg] Coupon applied to {}", intent.intent.domain);
            Ok(())
        }
        Discount::TokenHolding {
            object,
            object_type,
        } => {
            let house = ctx.object(contracts.discount_house)?;
            let intent_arg = ctx.arg(&intent.handle)?;
            let suins = ctx.object(contracts.suins_object)?;
            let held = ctx.object(*object)?;
            let _: Handle<UnitKind> = ctx.move_call(
                OperationKind::ApplyHoldingDiscount,
                MoveTarget::new(contracts.discounts_package, "discounts", "apply_percentage_discount"),
                vec![house, intent_arg, suins, held],
                vec![object_type.clone()],
            )?;
            debug!("[ns-reg] Holding discount applied to {}", intent.intent.domain);
            Ok(())
        }
    }
}

/// Append `calculate_price_after_discount<T>` for the intent.
pub fn compute_amount(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    intent: &IntentRef,
    asset: &PaymentAsset,
) -> Result<Handle<AmountKind>> {
    let suins = ctx.object(contracts.suins_object)?;
    let intent_arg = ctx.arg(&intent.handle)?;
    ctx.move_call(
        OperationKind::CalculatePrice,
        MoveTarget::new(contracts.payments_package, PAYMENTS_MODULE, "calculate_price_after_discount"),
        vec![suins, intent_arg],
        vec![asset.coin_type.to_string()],
    )
}

/// Append `calculate_price<T>` converting `amount` with the registered quote.
pub fn convert_amount(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    amount: &Handle<AmountKind>,
    asset: &PaymentAsset,
    quote: &QuoteRef,
) -> Result<Handle<AmountKind>> {
    let suins = ctx.object(contracts.suins_object)?;
    let amount_arg = ctx.arg(amount)?;
    let clock = ctx.clock()?;
    let price_info = ctx.arg(&quote.handle)?;
    ctx.move_call(
        OperationKind::ConvertPrice,
        MoveTarget::new(contracts.payments_package, PAYMENTS_MODULE, "calculate_price"),
        vec![suins, amount_arg, clock, price_info],
        vec![asset.coin_type.to_string()],
    )
}

/// Expected spend in the asset's smallest unit.
///
/// Coupon and holding discounts are not known locally, so this is an upper
/// bound of what the settle call will take.
pub fn estimate_spend(
    config: &RegistrationConfig,
    intent: &PaymentIntent,
    asset: &PaymentAsset,
    quote: &AssetQuote,
) -> Result<u64> {
    let list = config.price_list_for(intent.renewal_of.is_some());
    let total = list.discounted_total(intent.domain.label_len(), intent.years.get(), asset.discount_bps)?;
    convert_to_asset_units(total, config.pricing_decimals, asset, quote)
}
