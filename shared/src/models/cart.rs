//! Cart Item Model

use super::configuration::Configuration;
use super::pricing::PriceBreakdown;
use serde::{Deserialize, Serialize};

/// Frozen, priced snapshot of a configuration
///
/// `price` is fixed when the item is added and is never recomputed from live
/// catalog data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: String,
    pub model_name: String,
    pub config: Configuration,
    pub price: i64,
    /// Creation time (Unix millis)
    pub timestamp: i64,
    /// Breakdown captured at add-time, when the caller had one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<PriceBreakdown>,
}

/// Configuration snapshot payload `{ modelName, config, price, timestamp }`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationSnapshot {
    pub model_name: String,
    pub config: Configuration,
    pub price: i64,
    pub timestamp: i64,
}

impl From<&CartItem> for ConfigurationSnapshot {
    fn from(item: &CartItem) -> Self {
        Self {
            model_name: item.model_name.clone(),
            config: item.config.clone(),
            price: item.price,
            timestamp: item.timestamp,
        }
    }
}
