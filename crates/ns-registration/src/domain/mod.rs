//! # Domain Module
//!
//! Core types for composing a registration attempt.

pub mod context;
pub mod entities;
pub mod errors;
pub mod invariants;
pub mod pricing;
pub mod value_objects;

pub use context::*;
pub use entities::*;
pub use errors::*;
pub use invariants::*;
pub use pricing::*;
pub use value_objects::*;
