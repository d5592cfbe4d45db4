//! Fabric domain
//!
//! - [`FabricCatalog`] - queryable fabric inventory
//! - [`estimate_fabric_meters`] - fabric yield for a configuration
//! - [`aggregate_fabric_cost`] - per-slot fabric and upgrade cost

mod catalog;
mod cost;
mod estimator;

pub use catalog::*;
pub use cost::*;
pub use estimator::*;
