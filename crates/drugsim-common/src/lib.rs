//! drugsim-common: shared entity types and errors used across all drugsim crates.

pub mod error;
pub mod entities;

// Re-export commonly used types
pub use entities::{Drug, FixedDecimal, TestResult, Variant, SIDE_EFFECT_VOCABULARY};
pub use error::{Result, SimError};
