//! drugsim Molecules - Simulated drug design and testing.
//!
//! The workflow has three steps:
//! 1. Fabricating a compound from a free-text molecule description
//! 2. Predicting efficacy, toxicity and side effects (random or placeholder network)
//! 3. Shaping the result into chart data for display
//!
//! [`wizard::WizardController`] sequences the steps and renders through the
//! [`wizard::WizardView`] port.

pub mod randomizer;
pub mod generator;
pub mod prediction;
pub mod charts;
pub mod wizard;

pub use drugsim_common::{Result, SimError};
