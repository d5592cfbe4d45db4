//! Price breakdown payloads

use serde::{Deserialize, Serialize};

/// One rule's contribution to the running total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AppliedModifier {
    /// Rule name (attribute/option pair or preset rule name)
    pub name: String,
    /// Signed change to the running total
    pub delta: f64,
}

/// Derived price breakdown for one configuration snapshot
///
/// Never stored on its own; recomputed from the configuration on demand.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PriceBreakdown {
    pub base_price: f64,
    /// Sum of all modifier deltas
    pub modifier_total: f64,
    pub fabric_cost: f64,
    pub upgrade_cost: f64,
    /// Rounded, non-negative final price
    pub total: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub applied: Vec<AppliedModifier>,
}
