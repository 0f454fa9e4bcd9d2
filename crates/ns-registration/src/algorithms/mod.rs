//! # Algorithms Module
//!
//! The five composing steps, leaf-first:
//! intent -> price -> (oracle) -> settle -> finalize.

pub mod intent_builder;
pub mod oracle_fetcher;
pub mod payment_settler;
pub mod price_calculator;
pub mod registration_finalizer;

pub use intent_builder::{append_intent, build_intent, validate_intent};
pub use oracle_fetcher::{fetch_and_register, fetch_quote, register_quote, FetchedQuote};
pub use payment_settler::{settle, Settlement};
pub use price_calculator::{apply_discount, compute_amount, convert_amount, estimate_spend};
pub use registration_finalizer::finalize;
