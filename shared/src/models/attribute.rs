//! Configuration Attribute Model

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input kind of a configuration attribute
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttributeType {
    /// Single choice from the option list
    #[default]
    Select,
    /// Any subset of the option list (stored as a list of values)
    Multiselect,
    /// Yes/No switch
    Toggle,
    /// Free text
    Text,
}

/// Attribute option (one selectable value of an attribute)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AttributeOption {
    #[serde(default)]
    pub id: Option<String>,
    pub attribute_id: String,
    /// Token stored in the configuration map
    pub value: String,
    pub label: String,
    /// Price modifier in currency unit (positive=add, negative=subtract)
    pub price_modifier: f64,
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Configuration attribute entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConfigurationAttribute {
    pub id: String,
    pub category_id: String,
    /// Machine key used in the configuration map
    pub name: String,
    pub label: String,
    #[serde(rename = "type", default)]
    pub attribute_type: AttributeType,
    #[serde(default)]
    pub required: bool,
    /// Name of the attribute this one depends on
    #[serde(default)]
    pub depends_on: Option<String>,
    /// Value `depends_on` must hold for this attribute to be shown
    #[serde(default)]
    pub depends_value: Option<String>,
    pub order_index: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl ConfigurationAttribute {
    /// Dependency pair, present only when both halves are set
    pub fn dependency(&self) -> Option<(&str, &str)> {
        match (self.depends_on.as_deref(), self.depends_value.as_deref()) {
            (Some(on), Some(value)) if !on.is_empty() && !value.is_empty() => Some((on, value)),
            _ => None,
        }
    }

    pub fn is_multi_select(&self) -> bool {
        self.attribute_type == AttributeType::Multiselect
    }
}

/// Options keyed by attribute id
pub type OptionsByAttribute = HashMap<String, Vec<AttributeOption>>;

fn default_true() -> bool {
    true
}
