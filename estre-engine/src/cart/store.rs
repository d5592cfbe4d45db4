//! Cart store
//!
//! Process-wide cart, constructed once and passed by `&mut` to whoever adds
//! or removes items. Item prices are frozen at add time: totals only ever sum
//! stored prices.

use super::storage::{CartStorage, StorageError};
use crate::core::Config;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{CartItem, Configuration, PriceBreakdown};
use shared::util::{now_millis, snowflake_id};

#[derive(Debug, Default)]
pub struct CartStore {
    items: Vec<CartItem>,
    storage: Option<CartStorage>,
}

impl CartStore {
    /// Cart without persistence
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open the persisted cart at `config.cart_db_path`
    pub fn open(config: &Config) -> AppResult<Self> {
        if let Some(parent) = config.cart_db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                AppError::storage(format!("Failed to create cart directory: {}", e))
            })?;
        }
        let storage = CartStorage::open(&config.cart_db_path)?;
        Self::with_storage(storage)
    }

    /// Attach a storage handle and reload its items
    ///
    /// A stored cart that no longer parses is dropped rather than blocking
    /// the storefront.
    pub fn with_storage(storage: CartStorage) -> AppResult<Self> {
        let items = match storage.load_items() {
            Ok(items) => items,
            Err(StorageError::Serialization(e)) => {
                tracing::warn!(error = %e, "Stored cart is unreadable, starting empty");
                Vec::new()
            }
            Err(e) => return Err(e.into()),
        };
        tracing::debug!(items = items.len(), "Cart loaded");
        Ok(Self {
            items,
            storage: Some(storage),
        })
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append a frozen snapshot of `config` at `price`
    pub fn add(
        &mut self,
        model_name: &str,
        config: Configuration,
        price: i64,
    ) -> AppResult<CartItem> {
        self.push(model_name, config, price, None)
    }

    /// Append with the breakdown the price came from
    pub fn add_priced(
        &mut self,
        model_name: &str,
        config: Configuration,
        breakdown: PriceBreakdown,
    ) -> AppResult<CartItem> {
        let price = breakdown.total;
        self.push(model_name, config, price, Some(breakdown))
    }

    fn push(
        &mut self,
        model_name: &str,
        config: Configuration,
        price: i64,
        breakdown: Option<PriceBreakdown>,
    ) -> AppResult<CartItem> {
        validate_price(price)?;

        let item = CartItem {
            id: format!("{}-{}", model_name, snowflake_id()),
            model_name: model_name.to_string(),
            config,
            price,
            timestamp: now_millis(),
            breakdown,
        };

        let mut items = self.items.clone();
        items.push(item.clone());
        self.commit(items)?;

        tracing::info!(id = %item.id, model = %model_name, price, "Item added to cart");
        Ok(item)
    }

    /// Remove an item, returning it
    pub fn remove(&mut self, id: &str) -> AppResult<CartItem> {
        let index = self.index_of(id)?;
        let mut items = self.items.clone();
        let removed = items.remove(index);
        self.commit(items)?;

        tracing::info!(id = %id, "Item removed from cart");
        Ok(removed)
    }

    /// Replace an item's configuration and price
    ///
    /// The item keeps its id and timestamp; a breakdown captured earlier no
    /// longer describes the new price and is dropped.
    pub fn update(&mut self, id: &str, config: Configuration, price: i64) -> AppResult<()> {
        validate_price(price)?;
        let index = self.index_of(id)?;

        let mut items = self.items.clone();
        let item = &mut items[index];
        item.config = config;
        item.price = price;
        item.breakdown = None;
        self.commit(items)?;

        tracing::info!(id = %id, price, "Cart item updated");
        Ok(())
    }

    /// Sum of the frozen item prices
    pub fn total_price(&self) -> i64 {
        self.items
            .iter()
            .fold(0i64, |sum, item| sum.saturating_add(item.price))
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Empty the cart
    pub fn clear(&mut self) -> AppResult<()> {
        if let Some(storage) = &self.storage {
            storage.clear()?;
        }
        let count = self.items.len();
        self.items.clear();
        tracing::info!(items = count, "Cart cleared");
        Ok(())
    }

    fn index_of(&self, id: &str) -> AppResult<usize> {
        self.items
            .iter()
            .position(|item| item.id == id)
            .ok_or_else(|| AppError::cart_item_not_found(id))
    }

    /// Persist then swap in the new list, so a failed write leaves the cart unchanged
    fn commit(&mut self, items: Vec<CartItem>) -> AppResult<()> {
        if let Some(storage) = &self.storage {
            storage.save_items(&items)?;
        }
        self.items = items;
        Ok(())
    }
}

fn validate_price(price: i64) -> AppResult<()> {
    if price < 0 {
        return Err(
            AppError::with_message(ErrorCode::InvalidPrice, "Cart price cannot be negative")
                .with_detail("price", price),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(model: &str) -> Configuration {
        let mut config = Configuration::new();
        config.set("model", model);
        config
    }

    #[test]
    fn test_add_and_total() {
        let mut cart = CartStore::in_memory();
        let a = cart.add("Aurelia", config("Aurelia"), 59500).unwrap();
        cart.add("Noir", config("Noir"), 85000).unwrap();

        assert!(a.id.starts_with("Aurelia-"));
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_price(), 144500);
    }

    #[test]
    fn test_same_model_gets_distinct_ids() {
        let mut cart = CartStore::in_memory();
        let a = cart.add("Aurelia", config("Aurelia"), 1).unwrap();
        let b = cart.add("Aurelia", config("Aurelia"), 1).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_remove_and_missing_id() {
        let mut cart = CartStore::in_memory();
        let a = cart.add("Aurelia", config("Aurelia"), 100).unwrap();

        let removed = cart.remove(&a.id).unwrap();
        assert_eq!(removed.price, 100);
        assert!(cart.is_empty());

        let err = cart.remove(&a.id).unwrap_err();
        assert_eq!(err.code, ErrorCode::CartItemNotFound);
    }

    #[test]
    fn test_update_keeps_id_and_drops_breakdown() {
        let mut cart = CartStore::in_memory();
        let breakdown = PriceBreakdown {
            base_price: 45000.0,
            total: 45000,
            ..Default::default()
        };
        let item = cart
            .add_priced("Aurelia", config("Aurelia"), breakdown)
            .unwrap();
        assert_eq!(item.price, 45000);

        let mut changed = config("Aurelia");
        changed.set("armrest", "Box");
        cart.update(&item.id, changed, 48000).unwrap();

        let stored = cart.get(&item.id).unwrap();
        assert_eq!(stored.price, 48000);
        assert_eq!(stored.timestamp, item.timestamp);
        assert!(stored.breakdown.is_none());
        assert_eq!(stored.config.text("armrest"), Some("Box"));
    }

    #[test]
    fn test_negative_price_rejected() {
        let mut cart = CartStore::in_memory();
        let err = cart.add("Aurelia", Configuration::new(), -1).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidPrice);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_persisted_cart_reloads() {
        let storage = CartStorage::open_in_memory().unwrap();
        let mut cart = CartStore::with_storage(storage.clone()).unwrap();
        let a = cart.add("Aurelia", config("Aurelia"), 59500).unwrap();
        cart.add("Noir", config("Noir"), 85000).unwrap();
        cart.remove(&a.id).unwrap();

        let reloaded = CartStore::with_storage(storage).unwrap();
        assert_eq!(reloaded.item_count(), 1);
        assert_eq!(reloaded.items()[0].model_name, "Noir");
        assert_eq!(reloaded.total_price(), 85000);
    }

    #[test]
    fn test_clear_empties_storage() {
        let storage = CartStorage::open_in_memory().unwrap();
        let mut cart = CartStore::with_storage(storage.clone()).unwrap();
        cart.add("Aurelia", config("Aurelia"), 1).unwrap();
        cart.clear().unwrap();

        assert!(cart.is_empty());
        assert!(CartStore::with_storage(storage).unwrap().is_empty());
    }

    #[test]
    fn test_unreadable_cart_starts_empty() {
        let storage = CartStorage::open_in_memory().unwrap();
        storage.save_raw(b"{broken").unwrap();
        let cart = CartStore::with_storage(storage).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_open_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::with_overrides(dir.path().join("work"));
        {
            let mut cart = CartStore::open(&config).unwrap();
            cart.add("Aurelia", Configuration::new(), 59500).unwrap();
        }
        let cart = CartStore::open(&config).unwrap();
        assert_eq!(cart.total_price(), 59500);
    }
}
