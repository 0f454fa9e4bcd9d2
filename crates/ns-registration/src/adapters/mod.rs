//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implements the outbound ports: price service, clock and submission.

mod clock;
mod hermes;
mod submitter;

pub use clock::SystemClock;
pub use hermes::HermesPriceService;
pub use submitter::{transaction_digest, DryRunSubmitter, RecordingSubmitter};
