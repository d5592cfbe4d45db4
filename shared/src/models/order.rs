//! Order and saved-configuration payloads
//!
//! Built by the engine, persisted by the hosted backend.

use super::configuration::Configuration;
use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    InProduction,
    Ready,
    Delivered,
    Cancelled,
}

/// Customer-supplied checkout fields
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CheckoutDetails {
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
}

/// One order line (one cart item)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItemDraft {
    pub model_name: String,
    pub configuration_data: Configuration,
    pub item_price: i64,
    pub quantity: u32,
    pub fabric_cost: f64,
    pub upgrade_cost: f64,
}

/// Order ready to hand to the backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderDraft {
    /// `EST-` followed by the last 8 digits of the creation timestamp
    pub order_number: String,
    pub status: OrderStatus,
    pub currency: String,
    pub total_amount: i64,
    #[serde(default)]
    pub customer_notes: Option<String>,
    #[serde(default)]
    pub delivery_address: Option<String>,
    pub items: Vec<OrderItemDraft>,
    pub created_at: i64,
}

/// Saved configuration row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedConfiguration {
    pub user_id: String,
    pub category_id: String,
    pub model_id: String,
    pub name: String,
    pub configuration_data: Configuration,
    pub total_price: i64,
    #[serde(default)]
    pub is_favorite: bool,
}
