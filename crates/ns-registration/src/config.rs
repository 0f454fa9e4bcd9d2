//! Configuration types for the registration composer

use crate::domain::{
    CoinType, FeedId, ObjectId, PaymentAsset, PriceList, RegistrationError, Result, SuiAddress,
};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{info, warn};

/// Default maximum registration duration in years.
pub const DEFAULT_MAX_YEARS: u8 = 5;

/// Default maximum quote age in seconds.
pub const DEFAULT_MAX_QUOTE_AGE_SECS: u64 = 60;

/// Default oracle round-trip timeout in milliseconds.
pub const DEFAULT_ORACLE_TIMEOUT_MS: u64 = 10_000;

/// Default spend ceiling in whole units of the paying asset.
pub const DEFAULT_MAX_SPEND_UNITS: u64 = 1_000;

/// Default price service endpoint.
pub const DEFAULT_HERMES_ENDPOINT: &str = "https://hermes-beta.pyth.network";

/// On-chain packages and shared objects the composed calls target.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ContractIds {
    /// Core package (`payment` module)
    pub suins_package: ObjectId,
    /// Payments package (`payments` module)
    pub payments_package: ObjectId,
    /// Coupons package (`coupon_house` module)
    pub coupons_package: ObjectId,
    /// Discounts package (`discounts` module)
    pub discounts_package: ObjectId,
    /// Oracle package (`pyth` module)
    pub pyth_package: ObjectId,
    /// Shared registry object
    pub suins_object: ObjectId,
    /// Shared discount house
    pub discount_house: ObjectId,
    /// Oracle state object
    pub pyth_state: ObjectId,
    /// Guardian-set state object used to verify price payloads
    pub wormhole_state: ObjectId,
}

/// Runtime configuration for the composer
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct RegistrationConfig {
    /// Network name (mainnet, testnet, devnet)
    pub network: String,

    /// Contract ids
    pub contracts: ContractIds,

    /// Name of the asset that needs no price conversion
    pub base_asset: String,

    /// Accepted payment assets
    pub assets: Vec<PaymentAsset>,

    /// Feed symbol -> 32-byte hex price id
    pub feeds: HashMap<String, String>,

    /// Registration list prices
    pub price_list: PriceList,

    /// Renewal list prices (registration prices when absent)
    pub renewal_price_list: Option<PriceList>,

    /// Decimals of the list-price unit (6 = micro-USD)
    pub pricing_decimals: u8,

    /// Maximum duration in years
    pub max_years: u8,

    /// Maximum quote age in seconds
    pub max_quote_age_secs: u64,

    /// Oracle round-trip timeout in milliseconds
    pub oracle_timeout_ms: u64,

    /// Price service base URL
    pub hermes_endpoint: String,

    /// Spend ceiling in whole units of the paying asset when the request has none
    pub default_max_spend_units: u64,
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            network: "testnet".to_string(),
            contracts: ContractIds::default(),
            base_asset: "USDC".to_string(),
            assets: vec![PaymentAsset {
                name: "USDC".to_string(),
                coin_type: CoinType::new("0x0::usdc::USDC"),
                decimals: 6,
                feed: None,
                discount_bps: 0,
            }],
            feeds: HashMap::new(),
            price_list: PriceList::default(),
            renewal_price_list: None,
            pricing_decimals: 6,
            max_years: DEFAULT_MAX_YEARS,
            max_quote_age_secs: DEFAULT_MAX_QUOTE_AGE_SECS,
            oracle_timeout_ms: DEFAULT_ORACLE_TIMEOUT_MS,
            hermes_endpoint: DEFAULT_HERMES_ENDPOINT.to_string(),
            default_max_spend_units: DEFAULT_MAX_SPEND_UNITS,
        }
    }
}

impl RegistrationConfig {
    /// Defaults overlaid with environment variables.
    ///
    /// - `NS_CONFIG_JSON`: complete configuration as JSON
    /// - `NS_NETWORK`: network name
    /// - `NS_HERMES_ENDPOINT`: price service URL
    /// - `NS_MAX_QUOTE_AGE_SECS`: maximum quote age
    /// - `NS_ORACLE_TIMEOUT_MS`: oracle timeout
    /// - `NS_DEFAULT_MAX_SPEND_UNITS`: default spend ceiling
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("NS_CONFIG_JSON") {
            Ok(json) => {
                info!("[ns-reg] Loading configuration from NS_CONFIG_JSON");
                serde_json::from_str(&json)
                    .map_err(|e| RegistrationError::InvalidConfig(format!("NS_CONFIG_JSON: {e}")))?
            }
            Err(_) => Self::default(),
        };

        if let Ok(network) = std::env::var("NS_NETWORK") {
            config.network = network;
        }
        if let Ok(endpoint) = std::env::var("NS_HERMES_ENDPOINT") {
            config.hermes_endpoint = endpoint;
        }
        if let Ok(value) = std::env::var("NS_MAX_QUOTE_AGE_SECS") {
            match value.parse() {
                Ok(v) => config.max_quote_age_secs = v,
                Err(_) => warn!("[ns-reg] Ignoring invalid NS_MAX_QUOTE_AGE_SECS={}", value),
            }
        }
        if let Ok(value) = std::env::var("NS_ORACLE_TIMEOUT_MS") {
            match value.parse() {
                Ok(v) => config.oracle_timeout_ms = v,
                Err(_) => warn!("[ns-reg] Ignoring invalid NS_ORACLE_TIMEOUT_MS={}", value),
            }
        }
        if let Ok(value) = std::env::var("NS_DEFAULT_MAX_SPEND_UNITS") {
            match value.parse() {
                Ok(v) => config.default_max_spend_units = v,
                Err(_) => warn!("[ns-reg] Ignoring invalid NS_DEFAULT_MAX_SPEND_UNITS={}", value),
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Configuration with distinct placeholder ids, SUI as base asset and
    /// two oracle-priced assets. Used by tests and benchmarks.
    pub fn for_testing() -> Self {
        let id = |b: u8| SuiAddress::new([b; 32]);
        let mut feeds = HashMap::new();
        feeds.insert("USDC/USD".to_string(), format!("0x{}", "aa".repeat(32)));
        feeds.insert("NS/USD".to_string(), format!("0x{}", "bb".repeat(32)));

        Self {
            network: "devnet".to_string(),
            contracts: ContractIds {
                suins_package: id(0x11),
                payments_package: id(0x12),
                coupons_package: id(0x13),
                discounts_package: id(0x14),
                pyth_package: id(0x15),
                suins_object: id(0x21),
                discount_house: id(0x22),
                pyth_state: id(0x23),
                wormhole_state: id(0x24),
            },
            base_asset: "SUI".to_string(),
            assets: vec![
                PaymentAsset {
                    name: "SUI".to_string(),
                    coin_type: CoinType::new("0x2::sui::SUI"),
                    decimals: 9,
                    feed: None,
                    discount_bps: 0,
                },
                PaymentAsset {
                    name: "USDC".to_string(),
                    coin_type: CoinType::new(format!("{}::usdc::USDC", id(0x31))),
                    decimals: 6,
                    feed: Some(FeedId::new("USDC/USD")),
                    discount_bps: 0,
                },
                PaymentAsset {
                    name: "NS".to_string(),
                    coin_type: CoinType::new(format!("{}::ns::NS", id(0x32))),
                    decimals: 6,
                    feed: Some(FeedId::new("NS/USD")),
                    discount_bps: 2_500,
                },
            ],
            feeds,
            ..Self::default()
        }
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<()> {
        let base = self.asset(&self.base_asset).map_err(|_| {
            RegistrationError::InvalidConfig(format!("base asset {} not configured", self.base_asset))
        })?;
        if base.feed.is_some() {
            return Err(RegistrationError::InvalidConfig(format!(
                "base asset {} must not have a price feed",
                self.base_asset
            )));
        }

        for asset in &self.assets {
            if asset.name != self.base_asset && asset.feed.is_none() {
                return Err(RegistrationError::InvalidConfig(format!(
                    "asset {} needs a price feed",
                    asset.name
                )));
            }
            if let Some(feed) = &asset.feed {
                self.feed_price_id(feed)?;
            }
            if asset.discount_bps > 10_000 {
                return Err(RegistrationError::InvalidConfig(format!(
                    "asset {} discount above 100%",
                    asset.name
                )));
            }
        }

        for (symbol, id) in &self.feeds {
            let digits = id.strip_prefix("0x").unwrap_or(id);
            if digits.len() != 64 || hex::decode(digits).is_err() {
                return Err(RegistrationError::InvalidConfig(format!(
                    "feed {symbol} id must be 32 bytes of hex"
                )));
            }
        }

        if self.max_years == 0 {
            return Err(RegistrationError::InvalidConfig("max_years must be at least 1".into()));
        }
        if self.oracle_timeout_ms == 0 {
            return Err(RegistrationError::InvalidConfig("oracle_timeout_ms must be positive".into()));
        }
        Ok(())
    }

    /// Look up a payment asset by name.
    pub fn asset(&self, name: &str) -> Result<&PaymentAsset> {
        self.assets
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| RegistrationError::UnknownAsset(name.to_string()))
    }

    /// Hex price id configured for a feed symbol.
    pub fn feed_price_id(&self, feed: &FeedId) -> Result<&str> {
        self.feeds
            .get(feed.as_str())
            .map(String::as_str)
            .ok_or_else(|| RegistrationError::UnknownFeed(feed.to_string()))
    }

    /// List prices for registrations or renewals.
    pub fn price_list_for(&self, renewal: bool) -> &PriceList {
        match (&self.renewal_price_list, renewal) {
            (Some(list), true) => list,
            _ => &self.price_list,
        }
    }

    /// Default spend ceiling for `asset` in its smallest unit.
    pub fn default_max_spend(&self, asset: &PaymentAsset) -> u64 {
        10u64
            .checked_pow(u32::from(asset.decimals))
            .and_then(|unit| unit.checked_mul(self.default_max_spend_units))
            .unwrap_or(u64::MAX)
    }

    /// Oracle timeout.
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_millis(self.oracle_timeout_ms)
    }
}
