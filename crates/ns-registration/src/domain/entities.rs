//! # Domain Entities
//!
//! Entities born and consumed within a single attempt.

use super::context::{Handle, IntentKind, PriceInfoKind};
use super::value_objects::{CoinType, DomainName, FeedId, ObjectId, RegistrationYears, SuiAddress};
use serde::{Deserialize, Serialize};

/// A coin accepted as payment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAsset {
    /// Short name used in requests (e.g. `USDC`).
    pub name: String,
    /// Move coin type.
    pub coin_type: CoinType,
    /// Decimals of the coin's smallest unit.
    pub decimals: u8,
    /// Price feed; `None` marks the base asset, which needs no conversion.
    #[serde(default)]
    pub feed: Option<FeedId>,
    /// Coin-type discount applied on chain, in basis points.
    #[serde(default)]
    pub discount_bps: u16,
}

impl PaymentAsset {
    /// Whether paying with this asset requires an oracle quote.
    pub fn needs_conversion(&self) -> bool {
        self.feed.is_some()
    }
}

/// What the attempt registers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegistrationTarget {
    /// A new registration.
    Register {
        /// Name to register
        domain: String,
    },
    /// Renewal of an existing registration.
    Renew {
        /// Name being renewed (drives the price tier)
        domain: String,
        /// The registration NFT
        nft: ObjectId,
    },
}

impl RegistrationTarget {
    /// Name as supplied.
    pub fn domain(&self) -> &str {
        match self {
            Self::Register { domain } | Self::Renew { domain, .. } => domain,
        }
    }

    /// Whether this is a renewal.
    pub fn is_renewal(&self) -> bool {
        matches!(self, Self::Renew { .. })
    }
}

/// "Domain X requests registration/renewal for N years".
///
/// Logically immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PaymentIntent {
    /// Validated name
    pub domain: DomainName,
    /// Validated duration
    pub years: RegistrationYears,
    /// NFT being renewed, if any
    pub renewal_of: Option<ObjectId>,
}

/// Validated, time-bounded price reference for one asset pair.
///
/// Lives only as long as the attempt that fetched it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetQuote {
    /// Feed symbol
    pub feed: FeedId,
    /// Price mantissa
    pub price: i64,
    /// Confidence interval (same exponent)
    pub conf: u64,
    /// Decimal exponent
    pub expo: i32,
    /// Publish time, unix seconds
    pub publish_time: u64,
}

/// A quote together with its registration in the context.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuoteRef {
    /// Local copy of the price values
    pub quote: AssetQuote,
    /// Price info object produced in the context
    pub handle: Handle<PriceInfoKind>,
}

/// Where the payment is carved from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "coin", rename_all = "snake_case")]
pub enum FundingSource {
    /// A specific coin object the caller owns.
    Coin(ObjectId),
    /// The caller's gas coin.
    Gas,
}

/// Optional discount applied to the intent before pricing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Discount {
    /// No discount; pricing is unchanged.
    #[default]
    None,
    /// Coupon code redeemed against the coupon house.
    Coupon {
        /// Coupon code
        code: String,
    },
    /// Discount granted for holding a qualifying object.
    TokenHolding {
        /// Held object proving eligibility
        object: ObjectId,
        /// Move type of the held object
        object_type: String,
    },
}

/// Settlement branch, selected once at the start of an attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FundingPath {
    /// Paying in the base asset; no quote, `handle_base_payment`.
    Base,
    /// Paying in another asset; quote required, `handle_payment`.
    OraclePriced {
        /// Feed to quote
        feed: FeedId,
        /// Maximum spend in the asset's smallest unit
        max_spend: u64,
    },
}

impl FundingPath {
    /// Select the branch for `asset`.
    pub fn select(asset: &PaymentAsset, max_spend: u64) -> Self {
        match &asset.feed {
            Some(feed) => Self::OraclePriced {
                feed: feed.clone(),
                max_spend,
            },
            None => Self::Base,
        }
    }

    /// Whether the oracle branch was selected.
    pub fn is_oracle_priced(&self) -> bool {
        matches!(self, Self::OraclePriced { .. })
    }
}

/// Caller's request for one attempt.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    /// Register or renew
    pub target: RegistrationTarget,
    /// Duration in years
    pub years: u8,
    /// Payment asset name (key into the configured asset table)
    pub asset: String,
    /// Funding source
    pub funding: FundingSource,
    /// Optional discount
    #[serde(default)]
    pub discount: Discount,
    /// Spend ceiling override in the asset's smallest unit
    #[serde(default)]
    pub max_spend: Option<u64>,
    /// Beneficiary of the registered NFT
    pub recipient: SuiAddress,
}

impl RegistrationRequest {
    /// New registration request without discount.
    pub fn register(
        domain: impl Into<String>,
        years: u8,
        asset: impl Into<String>,
        funding: FundingSource,
        recipient: SuiAddress,
    ) -> Self {
        Self {
            target: RegistrationTarget::Register {
                domain: domain.into(),
            },
            years,
            asset: asset.into(),
            funding,
            discount: Discount::None,
            max_spend: None,
            recipient,
        }
    }

    /// Renewal request without discount.
    pub fn renew(
        domain: impl Into<String>,
        nft: ObjectId,
        years: u8,
        asset: impl Into<String>,
        funding: FundingSource,
        recipient: SuiAddress,
    ) -> Self {
        Self {
            target: RegistrationTarget::Renew {
                domain: domain.into(),
                nft,
            },
            years,
            asset: asset.into(),
            funding,
            discount: Discount::None,
            max_spend: None,
            recipient,
        }
    }

    /// Set the discount.
    pub fn with_discount(mut self, discount: Discount) -> Self {
        self.discount = discount;
        self
    }

    /// Set the spend ceiling.
    pub fn with_max_spend(mut self, max_spend: u64) -> Self {
        self.max_spend = Some(max_spend);
        self
    }
}

/// Handle to the intent together with its logical value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IntentRef {
    /// Logical intent
    pub intent: PaymentIntent,
    /// Handle in the context
    pub handle: Handle<IntentKind>,
}
