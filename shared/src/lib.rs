//! Shared types for the Estre configurator
//!
//! Catalog records, the in-progress configuration map, cart/order payloads
//! and the unified error system. Nothing here performs I/O; the engine crate
//! consumes these types and the storefront layer serializes them.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
