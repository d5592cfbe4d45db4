//! Cart Module
//!
//! - [`CartStore`] - frozen-price cart with optional redb persistence
//! - [`checkout`] - order draft construction

pub mod checkout;
mod storage;
mod store;

pub use storage::{CART_KEY, CartStorage, StorageError, StorageResult};
pub use store::CartStore;
