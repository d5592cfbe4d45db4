//! Fabric Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fabric family
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FabricCategory {
    Leather,
    Velvet,
    Linen,
    Cotton,
    Synthetic,
    Premium,
}

impl FabricCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leather => "leather",
            Self::Velvet => "velvet",
            Self::Linen => "linen",
            Self::Cotton => "cotton",
            Self::Synthetic => "synthetic",
            Self::Premium => "premium",
        }
    }

    /// Display name used by the fabric picker
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Leather => "Premium Leather",
            Self::Velvet => "Luxury Velvet",
            Self::Linen => "Natural Linen",
            Self::Cotton => "Cotton Blend",
            Self::Synthetic => "Synthetic Premium",
            Self::Premium => "Premium",
        }
    }
}

impl fmt::Display for FabricCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Durability grade
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Durability {
    High,
    Medium,
    Premium,
}

/// Fabric inventory record (immutable reference data)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FabricRecord {
    /// Unique key, e.g. `LEA-LUX-001`
    pub code: String,
    pub description: String,
    pub company: String,
    pub collection: String,
    pub color: String,
    pub color_hex: String,
    pub price_per_meter: f64,
    /// Upgrade charge per meter on top of `price_per_meter`
    pub upgrade_charges: f64,
    pub category: FabricCategory,
    #[serde(default)]
    pub texture: Option<String>,
    pub durability: Durability,
    #[serde(default)]
    pub care_instructions: Option<String>,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default)]
    pub stock_quantity: u32,
}

/// Number of distinct fabric colours applied to the cladding
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum FabricPlan {
    #[default]
    #[serde(rename = "Single Colour")]
    Single,
    #[serde(rename = "Dual Colour")]
    Dual,
    #[serde(rename = "Tri Colour")]
    Tri,
}

impl FabricPlan {
    pub const ALL: [FabricPlan; 3] = [FabricPlan::Single, FabricPlan::Dual, FabricPlan::Tri];

    /// Label stored under the `fabricPlan` key
    pub fn label(&self) -> &'static str {
        match self {
            Self::Single => "Single Colour",
            Self::Dual => "Dual Colour",
            Self::Tri => "Tri Colour",
        }
    }

    /// Exact-label parse; anything else is unrecognized
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|plan| plan.label() == label)
    }

    /// Number of fabric code slots the plan needs
    pub fn slot_count(&self) -> usize {
        match self {
            Self::Single => 1,
            Self::Dual => 2,
            Self::Tri => 3,
        }
    }
}

impl fmt::Display for FabricPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn default_true() -> bool {
    true
}
