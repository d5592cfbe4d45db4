//! Data models
//!
//! Read-only catalog records arrive from the hosted backend; configuration,
//! cart and order payloads are produced by the engine and handed back to it.

pub mod attribute;
pub mod cart;
pub mod configuration;
pub mod fabric;
pub mod order;
pub mod pricing;
pub mod sofa_model;

// Re-exports
pub use attribute::*;
pub use cart::*;
pub use configuration::*;
pub use fabric::*;
pub use order::*;
pub use pricing::*;
pub use sofa_model::*;
