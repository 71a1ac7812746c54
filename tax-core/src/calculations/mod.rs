//! Tax calculation for progressive personal income tax.
//!
//! [`TaxEngine`] is pure: it takes the configured brackets and the personal
//! allowance ceiling up front and never touches the store.

pub mod common;
pub mod engine;

pub use engine::{EngineError, TaxEngine};
