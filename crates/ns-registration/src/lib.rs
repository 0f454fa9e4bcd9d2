//! # NS Registration Composer
//!
//! Assembles one atomic transaction that registers (or renews) a `.sui` name.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Every attempt appends, in dependency order, into its own
//! [`TransactionContext`]:
//!
//! 1. the payment intent (`init_registration` / `init_renewal`) and any discount
//! 2. the amount owed (`calculate_price_after_discount`)
//! 3. on the oracle-priced path only: the signed price update and the conversion
//! 4. the split of the funding source and the settle call
//! 5. the claim and the transfer to the recipient (renewals extend in place)
//!
//! The only await in an attempt is the price service round-trip, which
//! happens before any funds are split.
//!
//! ## Funding paths
//!
//! | Asset | Oracle | Settle call |
//! |-------|--------|-------------|
//! | Base asset (no feed) | never called | `handle_base_payment` |
//! | Any other asset | exactly one round-trip | `handle_payment` with ceiling |
//!
//! ## Module Structure
//!
//! ```text
//! ns-registration/
//! ├── domain/          # Context, handles, entities, pricing, errors
//! ├── algorithms/      # Intent, price, oracle, settle, finalize
//! ├── ports/           # RegistrationApi, PriceService, SubmissionService, Clock
//! ├── adapters/        # Hermes, system clock, submitters
//! ├── attempt.rs       # Per-attempt state machine
//! └── service.rs       # RegistrationApi implementation
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod attempt;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{DryRunSubmitter, HermesPriceService, RecordingSubmitter, SystemClock};
pub use attempt::RegistrationAttempt;
pub use config::{ContractIds, RegistrationConfig};
pub use domain::{
    AttemptState, Discount, DomainName, FeedId, FundingPath, FundingSource, OperationKind,
    PaymentAsset, RegistrationError, RegistrationRequest, RegistrationTarget, Result,
    SealedTransaction, SuiAddress, TransactionContext,
};
pub use metrics::{Metrics, MetricsSnapshot};
pub use ports::{
    Clock, MockClock, MockPriceService, PriceService, PriceUpdate, RegistrationApi,
    RegistrationOutcome, SubmissionEffects, SubmissionService,
};
pub use service::RegistrationService;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
