//! redb-based cart persistence
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `cart` | `"estre-cart"` | `Vec<CartItem>` (JSON) | Whole cart, rewritten on every mutation |
//!
//! The cart is small, so it is stored as one value and replaced atomically.

use redb::{Database, ReadableDatabase, TableDefinition};
use shared::error::AppError;
use shared::models::CartItem;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for the cart: key = fixed cart key, value = JSON-serialized Vec<CartItem>
const CART_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("cart");

/// Fixed key the cart list is stored under
pub const CART_KEY: &str = "estre-cart";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Cart storage failure");
        AppError::storage(err.to_string())
    }
}

/// Cart storage backed by redb
#[derive(Clone)]
pub struct CartStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for CartStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStorage").finish_non_exhaustive()
    }
}

impl CartStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(CART_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Load the stored cart (empty when nothing was saved yet)
    pub fn load_items(&self) -> StorageResult<Vec<CartItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CART_TABLE)?;

        match table.get(CART_KEY)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(Vec::new()),
        }
    }

    /// Replace the stored cart
    pub fn save_items(&self, items: &[CartItem]) -> StorageResult<()> {
        let value = serde_json::to_vec(items)?;
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_TABLE)?;
            table.insert(CART_KEY, value.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove the stored cart entirely
    pub fn clear(&self) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_TABLE)?;
            table.remove(CART_KEY)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Store raw bytes under the cart key (for testing corrupt data)
    #[cfg(test)]
    pub(crate) fn save_raw(&self, bytes: &[u8]) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        {
            let mut table = txn.open_table(CART_TABLE)?;
            table.insert(CART_KEY, bytes)?;
        }
        txn.commit()?;
        Ok(())
    }
}
