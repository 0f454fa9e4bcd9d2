//! # Domain Value Objects
//!
//! Immutable, validated values used throughout an attempt.

use super::errors::{RegistrationError, Result};
use super::invariants::{invariant_domain_name, invariant_duration};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Well-known clock object.
pub const SUI_CLOCK_OBJECT_ID: SuiAddress = SuiAddress::from_low_byte(0x6);

/// 32-byte Sui address or object id.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SuiAddress([u8; 32]);

/// Object ids share the address representation.
pub type ObjectId = SuiAddress;

impl SuiAddress {
    /// Address length in bytes.
    pub const LENGTH: usize = 32;

    /// Create from raw bytes.
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    const fn from_low_byte(byte: u8) -> Self {
        let mut bytes = [0u8; 32];
        bytes[31] = byte;
        Self(bytes)
    }

    /// Parse `0x`-prefixed hex, left-padding short forms such as `0x6`.
    pub fn from_hex(value: &str) -> Result<Self> {
        let digits = value.strip_prefix("0x").unwrap_or(value);
        if digits.is_empty() || digits.len() > Self::LENGTH * 2 {
            return Err(RegistrationError::InvalidConfig(format!(
                "invalid address length: {value}"
            )));
        }
        let padded = format!("{:0>64}", digits);
        let decoded = hex::decode(&padded)
            .map_err(|e| RegistrationError::InvalidConfig(format!("invalid address {value}: {e}")))?;
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }

    /// Raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for SuiAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for SuiAddress {
    type Err = RegistrationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for SuiAddress {
    type Error = RegistrationError;

    fn try_from(value: String) -> Result<Self> {
        Self::from_hex(&value)
    }
}

impl From<SuiAddress> for String {
    fn from(value: SuiAddress) -> Self {
        value.to_string()
    }
}

/// A validated second-level `.sui` name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainName(String);

impl DomainName {
    /// Validate and wrap a name.
    pub fn parse(name: &str) -> Result<Self> {
        invariant_domain_name(name)?;
        Ok(Self(name.to_string()))
    }

    /// The label before the TLD.
    pub fn label(&self) -> &str {
        self.0.split('.').next().unwrap_or_default()
    }

    /// Label length in characters, which drives the list price.
    pub fn label_len(&self) -> usize {
        self.label().chars().count()
    }

    /// Full name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DomainName {
    type Error = RegistrationError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DomainName> for String {
    fn from(value: DomainName) -> Self {
        value.0
    }
}

/// Registration or renewal duration in years.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegistrationYears(u8);

impl RegistrationYears {
    /// Validate against the configured maximum.
    pub fn new(years: u8, max: u8) -> Result<Self> {
        invariant_duration(years, max)?;
        Ok(Self(years))
    }

    /// Number of years.
    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Symbolic price feed name, e.g. `SUI/USD`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeedId(String);

impl FeedId {
    /// Wrap a feed symbol.
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    /// Feed symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fully qualified Move coin type, e.g. `0x2::sui::SUI`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoinType(String);

impl CoinType {
    /// Wrap a type tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Type tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the native `0x2::sui::SUI`, the only coin the gas
    /// object can pay with. Long and short address forms both match.
    pub fn is_native_sui(&self) -> bool {
        match self.0.split_once("::") {
            Some((address, "sui::SUI")) => {
                SuiAddress::from_hex(address).map_or(false, |a| a == SuiAddress::from_low_byte(2))
            }
            _ => false,
        }
    }
}

impl fmt::Display for CoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `package::module::function` call target.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveTarget {
    /// Package id.
    pub package: ObjectId,
    /// Module name.
    pub module: String,
    /// Function name.
    pub function: String,
}

impl MoveTarget {
    /// Create a call target.
    pub fn new(package: ObjectId, module: &str, function: &str) -> Self {
        Self {
            package,
            module: module.to_string(),
            function: function.to_string(),
        }
    }
}

impl fmt::Display for MoveTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}::{}", self.package, self.module, self.function)
    }
}

/// Attempt-level state machine.
///
/// ```text
/// Initialized -> IntentCreated -> PriceComputed -> [QuoteFetched] -> Settled -> Finalized
///      \______________\________________\_______________\______________\-> Aborted
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttemptState {
    /// Nothing appended yet.
    #[default]
    Initialized,
    /// Intent (and any discount) appended.
    IntentCreated,
    /// Discounted amount appended.
    PriceComputed,
    /// Oracle update registered and amount converted (oracle-priced path only).
    QuoteFetched,
    /// Split and settle appended, receipt available.
    Settled,
    /// Claim appended; context ready to seal.
    Finalized,
    /// Failed; the context is discarded.
    Aborted,
}

impl AttemptState {
    /// Check if transition is valid. `oracle_priced` selects the branch.
    pub fn can_transition_to(&self, next: AttemptState, oracle_priced: bool) -> bool {
        match (self, next) {
            (Self::Initialized, Self::IntentCreated) => true,
            (Self::IntentCreated, Self::PriceComputed) => true,
            (Self::PriceComputed, Self::QuoteFetched) => oracle_priced,
            (Self::PriceComputed, Self::Settled) => !oracle_priced,
            (Self::QuoteFetched, Self::Settled) => oracle_priced,
            (Self::Settled, Self::Finalized) => true,
            (from, Self::Aborted) => !from.is_terminal(),
            _ => false,
        }
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized | Self::Aborted)
    }
}

impl fmt::Display for AttemptState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
