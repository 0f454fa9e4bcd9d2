//! # Pricing
//!
//! Local mirror of the on-chain price rules, used to estimate what an
//! oracle-priced payment will spend before any funds are split.
//!
//! List prices are denominated in pricing units (`pricing_decimals`, micro-USD
//! by default). Conversion follows the on-chain formula with checked `u128`
//! arithmetic and rounds up so the estimate never under-states the spend.

use super::entities::{AssetQuote, PaymentAsset};
use super::errors::{RegistrationError, Result};
use serde::{Deserialize, Serialize};

/// Basis points in 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Yearly list price by label length.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceList {
    /// 3-character labels
    pub three_char: u64,
    /// 4-character labels
    pub four_char: u64,
    /// 5 or more characters
    pub five_plus: u64,
}

impl Default for PriceList {
    fn default() -> Self {
        Self {
            three_char: 500_000_000, // $500
            four_char: 100_000_000,  // $100
            five_plus: 20_000_000,   // $20
        }
    }
}

impl PriceList {
    /// Yearly price for a label of `label_len` characters.
    pub fn yearly_price(&self, label_len: usize) -> u64 {
        match label_len {
            0..=3 => self.three_char,
            4 => self.four_char,
            _ => self.five_plus,
        }
    }

    /// Total list price for `years`, after the asset's coin-type discount.
    pub fn discounted_total(&self, label_len: usize, years: u8, discount_bps: u16) -> Result<u64> {
        let gross = u128::from(self.yearly_price(label_len))
            .checked_mul(u128::from(years))
            .ok_or(RegistrationError::ArithmeticOverflow)?;
        let kept = BPS_DENOMINATOR.saturating_sub(u128::from(discount_bps));
        let net = gross
            .checked_mul(kept)
            .ok_or(RegistrationError::ArithmeticOverflow)?
            / BPS_DENOMINATOR;
        u64::try_from(net).map_err(|_| RegistrationError::ArithmeticOverflow)
    }
}

fn pow10(exp: u32) -> Result<u128> {
    10u128
        .checked_pow(exp)
        .ok_or(RegistrationError::ArithmeticOverflow)
}

/// Convert `amount` pricing units into the smallest unit of `asset` at `quote`.
///
/// `quote.price * 10^quote.expo` is the pricing-currency value of one whole
/// unit of the asset.
pub fn convert_to_asset_units(
    amount: u64,
    pricing_decimals: u8,
    asset: &PaymentAsset,
    quote: &AssetQuote,
) -> Result<u64> {
    if quote.price <= 0 {
        return Err(RegistrationError::InvalidQuote {
            feed: quote.feed.to_string(),
            reason: format!("non-positive price {}", quote.price),
        });
    }
    let price = quote.price as u128;

    let mut numerator = u128::from(amount)
        .checked_mul(pow10(u32::from(asset.decimals))?)
        .ok_or(RegistrationError::ArithmeticOverflow)?;
    let mut denominator = price
        .checked_mul(pow10(u32::from(pricing_decimals))?)
        .ok_or(RegistrationError::ArithmeticOverflow)?;

    let shift = pow10(quote.expo.unsigned_abs())?;
    if quote.expo < 0 {
        numerator = numerator
            .checked_mul(shift)
            .ok_or(RegistrationError::ArithmeticOverflow)?;
    } else {
        denominator = denominator
            .checked_mul(shift)
            .ok_or(RegistrationError::ArithmeticOverflow)?;
    }

    let units = numerator.div_ceil(denominator);
    u64::try_from(units).map_err(|_| RegistrationError::ArithmeticOverflow)
}
