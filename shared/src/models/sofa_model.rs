//! Sofa Model

use serde::{Deserialize, Serialize};

/// Sofa model entity (one per design within a furniture category)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SofaModel {
    pub id: String,
    pub name: String,
    pub category_id: String,
    /// Price floor before any modifier
    pub base_price: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}
