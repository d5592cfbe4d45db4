//! Price Rule Engine Module
//!
//! A single rule-table abstraction drives both the catalog-driven calculator
//! and the fixed legacy sofa price list.

mod calculator;
pub mod presets;
mod rules;

pub use calculator::*;
pub use rules::*;
