//! # Domain Errors
//!
//! Error taxonomy for a registration attempt. Every component fails fast;
//! nothing here describes a partially committed external effect because the
//! only externally visible step is the final atomic submission.

use thiserror::Error;

/// Result type alias for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

/// Registration composer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// Domain name is not a registrable SuiNS name.
    #[error("Invalid domain name '{name}': {reason}")]
    InvalidDomainName {
        /// Name as supplied by the caller
        name: String,
        /// Which rule was violated
        reason: String,
    },

    /// Duration outside `1..=max` years.
    #[error("Invalid duration: {years} years (allowed 1..={max})")]
    InvalidDuration {
        /// Requested years
        years: u8,
        /// Configured maximum
        max: u8,
    },

    /// Payment asset is not configured.
    #[error("Unknown payment asset: {0}")]
    UnknownAsset(String),

    /// Funding source cannot pay in the requested asset.
    #[error("Invalid funding for {asset}: {reason}")]
    InvalidFunding {
        /// Payment asset name
        asset: String,
        /// Why the source was rejected
        reason: String,
    },

    /// Price service unreachable, failed, or timed out.
    #[error("Oracle unavailable: {0}")]
    OracleUnavailable(String),

    /// Price service returned data older than the allowed age.
    #[error("Stale quote for {feed}: published at {publish_time}, now {now}, max age {max_age_secs}s")]
    StaleQuote {
        /// Feed symbol
        feed: String,
        /// Publish time reported by the service (unix seconds)
        publish_time: u64,
        /// Local time of the check (unix seconds)
        now: u64,
        /// Configured maximum age
        max_age_secs: u64,
    },

    /// Price service returned unusable data.
    #[error("Invalid quote for {feed}: {reason}")]
    InvalidQuote {
        /// Feed symbol
        feed: String,
        /// What was wrong with it
        reason: String,
    },

    /// Feed is not configured or not recognized by the price service.
    #[error("Unknown price feed: {0}")]
    UnknownFeed(String),

    /// Expected spend of the paying asset is above the caller's ceiling.
    #[error("Price ceiling exceeded: estimated {estimated}, ceiling {ceiling}")]
    PriceCeilingExceeded {
        /// Estimated spend in the asset's smallest unit
        estimated: u64,
        /// Ceiling in the asset's smallest unit
        ceiling: u64,
    },

    /// Price arithmetic overflowed.
    #[error("Arithmetic overflow while converting price")]
    ArithmeticOverflow,

    /// Steps invoked out of order or a required result is missing.
    #[error("Incomplete flow: {0}")]
    IncompleteFlow(String),

    /// A handle from another context, or one that points forward.
    #[error("Invalid handle: index {index} in context of {len} operations ({reason})")]
    InvalidHandle {
        /// Referenced index
        index: u16,
        /// Operations present in the context
        len: usize,
        /// Why the reference was rejected
        reason: String,
    },

    /// Invalid attempt state transition.
    #[error("Invalid attempt transition: {from} -> {to}")]
    InvalidTransition {
        /// Current state
        from: String,
        /// Attempted state
        to: String,
    },

    /// The submission collaborator rejected or failed the transaction.
    #[error("Submission failed: {0}")]
    SubmissionFailure(String),

    /// Configuration is inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RegistrationError {
    /// Rejected before any network call or context mutation.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidDomainName { .. }
                | Self::InvalidDuration { .. }
                | Self::UnknownAsset(_)
                | Self::InvalidFunding { .. }
        )
    }

    /// The caller may rebuild the attempt from scratch and try again.
    ///
    /// Nothing is retried internally.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::OracleUnavailable(_)
                | Self::StaleQuote { .. }
                | Self::UnknownFeed(_)
                | Self::SubmissionFailure(_)
        )
    }

    /// Programming error in the composition sequence, not user recoverable.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::IncompleteFlow(_)
                | Self::InvalidHandle { .. }
                | Self::InvalidTransition { .. }
                | Self::InvalidConfig(_)
        )
    }
}
