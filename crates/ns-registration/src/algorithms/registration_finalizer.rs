//! # Registration Finalizer
//!
//! Exchanges the settlement receipt for the registered name. New
//! registrations are transferred to the recipient; renewals extend the
//! existing NFT in place.

use crate::config::ContractIds;
use crate::domain::{
    Handle, MoveTarget, NftKind, OperationKind, PaymentIntent, ReceiptKind, RegistrationError,
    Result, SuiAddress, TransactionContext, UnitKind,
};
use tracing::debug;

/// Append the claim (and transfer) consuming `receipt`.
pub fn finalize(
    ctx: &mut TransactionContext,
    contracts: &ContractIds,
    intent: &PaymentIntent,
    receipt: Option<&Handle<ReceiptKind>>,
    recipient: SuiAddress,
) -> Result<()> {
    let receipt = receipt.ok_or_else(|| {
        RegistrationError::IncompleteFlow("finalize called without a settlement receipt".to_string())
    })?;
    let receipt_arg = ctx.arg(receipt)?;
    let suins = ctx.object(contracts.suins_object)?;

    match intent.renewal_of {
        None => {
            let clock = ctx.clock()?;
            let nft: Handle<NftKind> = ctx.move_call(
                OperationKind::Claim,
                MoveTarget::new(contracts.suins_package, "payment", "register"),
                vec![receipt_arg, suins, clock],
                vec![],
            )?;
            let nft_arg = ctx.arg(&nft)?;
            ctx.transfer_objects(vec![nft_arg], recipient)?;
            debug!("[ns-reg] {} claimed for {}", intent.domain, recipient);
        }
        Some(existing) => {
            let nft = ctx.object(existing)?;
            let clock = ctx.clock()?;
            let _: Handle<UnitKind> = ctx.move_call(
                OperationKind::Renew,
                MoveTarget::new(contracts.suins_package, "payment", "renew"),
                vec![receipt_arg, suins, nft, clock],
                vec![],
            )?;
            debug!("[ns-reg] {} renewed in place", intent.domain);
        }
    }
    Ok(())
}
