//! Configuration Model
//!
//! The in-progress set of user selections for one furniture item. Values are
//! either a single token or, for multi-select attributes, a list of tokens.
//! JSON numbers are kept as their decimal text and booleans become `Yes`/`No`,
//! so every lookup downstream compares plain strings.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Selected sofa model name
pub const MODEL_KEY: &str = "model";
/// Fabric plan label (`Single Colour` / `Dual Colour` / `Tri Colour`)
pub const FABRIC_PLAN_KEY: &str = "fabricPlan";
/// Ordered fabric codes, one per colour slot
pub const FABRIC_CODES_KEY: &str = "fabricCodes";

/// Flag value for an affirmative toggle
pub const YES: &str = "Yes";
/// Flag value for a negative toggle
pub const NO: &str = "No";

/// A single stored configuration value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Single(String),
    Multi(Vec<String>),
}

impl ConfigValue {
    pub fn as_single(&self) -> Option<&str> {
        match self {
            Self::Single(s) => Some(s),
            Self::Multi(_) => None,
        }
    }

    pub fn as_multi(&self) -> Option<&[String]> {
        match self {
            Self::Single(_) => None,
            Self::Multi(values) => Some(values),
        }
    }

    /// Strict equality against a scalar token. A list never equals a scalar.
    pub fn equals_text(&self, text: &str) -> bool {
        matches!(self, Self::Single(s) if s == text)
    }

    /// Whether the value counts as "filled in"
    pub fn is_present(&self) -> bool {
        match self {
            Self::Single(s) => !s.is_empty(),
            Self::Multi(values) => !values.is_empty(),
        }
    }

    /// Display form: lists are comma-joined
    pub fn display(&self) -> String {
        match self {
            Self::Single(s) => s.clone(),
            Self::Multi(values) => values.join(", "),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ConfigValue {
    fn from(values: Vec<String>) -> Self {
        Self::Multi(values)
    }
}

/// Attribute name -> selected value(s)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<String, ConfigValue>", try_from = "Value")]
pub struct Configuration {
    values: BTreeMap<String, ConfigValue>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON document, failing on anything that is not a flat object
    pub fn from_json_str(json: &str) -> Result<Self, AppError> {
        let value: Value = serde_json::from_str(json).map_err(|e| {
            AppError::malformed_configuration(format!("Configuration is not valid JSON: {}", e))
        })?;
        Self::try_from(value)
    }

    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Scalar value for `key`; lists and missing keys give `None`
    pub fn text(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(ConfigValue::as_single)
    }

    /// List value for `key`; empty for scalars and missing keys
    pub fn list(&self, key: &str) -> &[String] {
        self.values
            .get(key)
            .and_then(ConfigValue::as_multi)
            .unwrap_or(&[])
    }

    /// `true` when `key` holds the affirmative flag
    pub fn flag(&self, key: &str) -> bool {
        self.text(key) == Some(YES)
    }

    pub fn is_present(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(ConfigValue::is_present)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.values.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ConfigValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Selected model name, if any
    pub fn model(&self) -> Option<&str> {
        self.text(MODEL_KEY).filter(|name| !name.is_empty())
    }

    /// Raw `fabricPlan` label
    pub fn fabric_plan_label(&self) -> Option<&str> {
        self.text(FABRIC_PLAN_KEY)
    }

    /// Fabric codes in slot order. A lone scalar is treated as one slot.
    pub fn fabric_codes(&self) -> Vec<String> {
        match self.values.get(FABRIC_CODES_KEY) {
            Some(ConfigValue::Multi(codes)) => codes.clone(),
            Some(ConfigValue::Single(code)) => vec![code.clone()],
            None => Vec::new(),
        }
    }
}

impl From<Configuration> for BTreeMap<String, ConfigValue> {
    fn from(config: Configuration) -> Self {
        config.values
    }
}

impl FromIterator<(String, ConfigValue)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, ConfigValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl TryFrom<Value> for Configuration {
    type Error = AppError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Self::try_from(map),
            other => Err(AppError::malformed_configuration(format!(
                "Configuration must be a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

impl TryFrom<Map<String, Value>> for Configuration {
    type Error = AppError;

    fn try_from(map: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut values = BTreeMap::new();
        for (key, value) in map {
            if let Some(converted) = convert_value(&key, value)? {
                values.insert(key, converted);
            }
        }
        Ok(Self { values })
    }
}

/// Convert one JSON field. `null` means unset and is dropped.
fn convert_value(key: &str, value: Value) -> Result<Option<ConfigValue>, AppError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(ConfigValue::Single(s))),
        Value::Number(n) => Ok(Some(ConfigValue::Single(n.to_string()))),
        Value::Bool(b) => Ok(Some(ConfigValue::Single(
            if b { YES } else { NO }.to_string(),
        ))),
        Value::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(s) => out.push(s),
                    Value::Number(n) => out.push(n.to_string()),
                    other => {
                        return Err(AppError::malformed_configuration(format!(
                            "List '{}' may only contain strings or numbers, found {}",
                            key,
                            json_kind(&other)
                        ))
                        .with_detail("field", key));
                    }
                }
            }
            Ok(Some(ConfigValue::Multi(out)))
        }
        Value::Object(_) => Err(AppError::malformed_configuration(format!(
            "Field '{}' must be a string or a list, found an object",
            key
        ))
        .with_detail("field", key)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
