//! Configuration Session
//!
//! Owns the in-progress [`Configuration`] for one category configurator and
//! derives everything else from it on demand:
//!
//! ```text
//! Empty ──select model──▶ Partial ──all visible required set──▶ Complete
//!   ▲                        ▲ │                                   │
//!   └──── clear model ───────┘ └──── dependency reveals field ◀────┘
//! ```
//!
//! Nothing derived is cached: visibility, fabric meters and price are
//! recomputed from the current snapshot on every query.

use super::visibility;
use crate::cart::CartStore;
use crate::core::DEFAULT_BASE_PRICE;
use crate::fabric::{
    FabricCatalog, FabricCost, FabricRequirement, FabricYieldTable, aggregate_fabric_cost,
};
use crate::pricing::{PriceCalculator, PricingPolicy, RuleTable};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    AttributeOption, AttributeType, CartItem, ConfigValue, Configuration, ConfigurationAttribute,
    ConfigurationSnapshot, FABRIC_CODES_KEY, FABRIC_PLAN_KEY, FabricPlan, MODEL_KEY, NO,
    OptionsByAttribute, PriceBreakdown, SavedConfiguration, SofaModel, YES,
};
use shared::util::now_millis;
use std::path::Path;
use std::sync::Arc;

/// Session lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No model selected
    Empty,
    /// Model selected, some visible required attribute unset
    Partial,
    /// Model selected and every visible required attribute set
    Complete,
}

/// Reference data for one furniture category
#[derive(Debug, Clone, Default)]
pub struct CategoryCatalog {
    pub category_id: String,
    pub category_name: String,
    pub models: Vec<SofaModel>,
    pub attributes: Vec<ConfigurationAttribute>,
    /// Options keyed by attribute id
    pub options: OptionsByAttribute,
    pub policy: PricingPolicy,
}

/// On-disk category export: options as the backend returns them, one flat list
#[derive(Debug, Deserialize)]
struct CategoryFile {
    category_id: String,
    #[serde(default)]
    category_name: String,
    #[serde(default)]
    models: Vec<SofaModel>,
    #[serde(default)]
    attributes: Vec<ConfigurationAttribute>,
    #[serde(default)]
    options: Vec<AttributeOption>,
    #[serde(default)]
    policy: PricingPolicy,
}

impl CategoryCatalog {
    /// Empty catalog; models and attributes arrive later
    pub fn new(category_id: impl Into<String>, category_name: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            category_name: category_name.into(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> AppResult<Self> {
        let file: CategoryFile = serde_json::from_str(json)
            .map_err(|e| AppError::catalog(format!("Invalid category file: {}", e)))?;
        Ok(Self {
            category_id: file.category_id,
            category_name: file.category_name,
            models: file.models,
            attributes: file.attributes,
            options: group_options(file.options),
            policy: file.policy,
        })
    }

    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            AppError::catalog(format!("Failed to read category file: {}", e))
                .with_detail("path", path.display().to_string())
        })?;
        Self::from_json_str(&json)
    }

    pub fn model_by_name(&self, name: &str) -> Option<&SofaModel> {
        self.models.iter().find(|model| model.name == name)
    }

    pub fn attribute_by_name(&self, name: &str) -> Option<&ConfigurationAttribute> {
        self.attributes.iter().find(|attribute| attribute.name == name)
    }

    pub fn options_for(&self, attribute: &ConfigurationAttribute) -> &[AttributeOption] {
        self.options
            .get(&attribute.id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Group a flat option list by attribute id, ordered by `order_index`
pub fn group_options(options: Vec<AttributeOption>) -> OptionsByAttribute {
    let mut grouped = OptionsByAttribute::new();
    for option in options {
        grouped
            .entry(option.attribute_id.clone())
            .or_insert_with(Vec::new)
            .push(option);
    }
    for list in grouped.values_mut() {
        list.sort_by_key(|option| option.order_index);
    }
    grouped
}

/// One line of the configuration summary panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryLine {
    pub label: String,
    pub value: String,
}

/// Configurator session for one category
#[derive(Debug)]
pub struct ConfigurationSession {
    catalog: CategoryCatalog,
    fabrics: Arc<FabricCatalog>,
    yield_table: FabricYieldTable,
    preset: Option<RuleTable>,
    default_base_price: f64,
    calculator: PriceCalculator,
    config: Configuration,
    save_in_flight: bool,
}

impl ConfigurationSession {
    /// Start an empty session; the first model is selected if models are loaded
    pub fn new(catalog: CategoryCatalog, fabrics: Arc<FabricCatalog>) -> Self {
        let mut session = Self {
            catalog,
            fabrics,
            yield_table: FabricYieldTable::default(),
            preset: None,
            default_base_price: DEFAULT_BASE_PRICE,
            calculator: PriceCalculator::default(),
            config: Configuration::new(),
            save_in_flight: false,
        };
        session.rebuild_calculator();
        session.select_first_model();
        session
    }

    /// Price with a fixed rule table instead of the catalog options
    pub fn with_rule_table(mut self, table: RuleTable) -> Self {
        self.preset = Some(table);
        self.rebuild_calculator();
        self
    }

    pub fn with_policy(mut self, policy: PricingPolicy) -> Self {
        self.catalog.policy = policy;
        self.rebuild_calculator();
        self
    }

    pub fn with_default_base_price(mut self, price: f64) -> Self {
        self.default_base_price = price;
        self.rebuild_calculator();
        self
    }

    pub fn with_yield_table(mut self, table: FabricYieldTable) -> Self {
        self.yield_table = table;
        self
    }

    /// Resume from a stored configuration
    pub fn with_configuration(mut self, config: Configuration) -> Self {
        self.config = config;
        self.select_first_model();
        self
    }

    fn rebuild_calculator(&mut self) {
        let calculator = match &self.preset {
            Some(table) => PriceCalculator::new(table.clone()),
            None => PriceCalculator::from_catalog(
                &self.catalog.attributes,
                &self.catalog.options,
                self.catalog.policy,
            ),
        };
        self.calculator = calculator.with_default_base_price(self.default_base_price);
    }

    fn select_first_model(&mut self) {
        if self.config.model().is_some() {
            return;
        }
        if let Some(first) = self.catalog.models.first() {
            tracing::debug!(model = %first.name, "Selecting first model");
            self.config.set(MODEL_KEY, first.name.as_str());
        }
    }

    // ========== Reference data ==========

    /// Models arrived from the backend
    pub fn load_models(&mut self, models: Vec<SofaModel>) {
        self.catalog.models = models;
        self.select_first_model();
    }

    /// Attributes and their (flat) option list arrived from the backend
    pub fn load_attributes(
        &mut self,
        attributes: Vec<ConfigurationAttribute>,
        options: Vec<AttributeOption>,
    ) {
        self.catalog.attributes = attributes;
        self.catalog.options = group_options(options);
        self.rebuild_calculator();
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    pub fn fabrics(&self) -> &FabricCatalog {
        &self.fabrics
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// The selected model record, once models have loaded
    pub fn selected_model(&self) -> Option<&SofaModel> {
        self.config
            .model()
            .and_then(|name| self.catalog.model_by_name(name))
    }

    // ========== Mutations ==========

    pub fn select_model(&mut self, name: &str) -> AppResult<()> {
        if !self.catalog.models.is_empty() && self.catalog.model_by_name(name).is_none() {
            return Err(
                AppError::with_message(ErrorCode::ModelNotFound, format!("Unknown model '{}'", name))
                    .with_detail("model", name),
            );
        }
        self.config.set(MODEL_KEY, name);
        Ok(())
    }

    /// Set one field
    ///
    /// Values for known attributes are checked against the attribute type and
    /// its loaded options; other keys are stored as given.
    pub fn set_value(&mut self, name: &str, value: impl Into<ConfigValue>) -> AppResult<()> {
        let value = value.into();
        if name == MODEL_KEY {
            return match value {
                ConfigValue::Single(model) => self.select_model(&model),
                ConfigValue::Multi(_) => Err(AppError::invalid_field(name, "Model must be a single value")),
            };
        }
        if name == FABRIC_PLAN_KEY {
            let plan = value
                .as_single()
                .and_then(FabricPlan::from_label)
                .ok_or_else(|| {
                    AppError::invalid_field(name, format!("Unknown fabric plan '{}'", value.display()))
                })?;
            self.set_fabric_plan(plan);
            return Ok(());
        }
        if let Some(attribute) = self.catalog.attribute_by_name(name) {
            self.validate(attribute, &value)?;
        }
        self.config.set(name, value);
        Ok(())
    }

    /// Set several fields; on error nothing changes
    pub fn set_values<I, K, V>(&mut self, values: I) -> AppResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<ConfigValue>,
    {
        let before = self.config.clone();
        for (name, value) in values {
            if let Err(e) = self.set_value(name.as_ref(), value) {
                self.config = before;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Flip one option of a multi-select attribute; returns whether it is now selected
    pub fn toggle_option(&mut self, name: &str, option_value: &str) -> AppResult<bool> {
        let attribute = self.catalog.attribute_by_name(name).ok_or_else(|| {
            AppError::with_message(ErrorCode::UnknownAttribute, format!("Unknown attribute '{}'", name))
                .with_detail("field", name)
        })?;
        if !attribute.is_multi_select() {
            return Err(AppError::invalid_field(
                name,
                format!("Attribute '{}' is not multi-select", name),
            ));
        }
        self.validate_option(attribute, option_value)?;

        let mut selected = self.config.list(name).to_vec();
        let now_selected = match selected.iter().position(|v| v == option_value) {
            Some(index) => {
                selected.remove(index);
                false
            }
            None => {
                selected.push(option_value.to_string());
                true
            }
        };
        self.config.set(name, selected);
        Ok(now_selected)
    }

    pub fn clear_value(&mut self, name: &str) -> Option<ConfigValue> {
        self.config.remove(name)
    }

    /// Switch the fabric plan, resizing `fabricCodes` to its slot count
    pub fn set_fabric_plan(&mut self, plan: FabricPlan) {
        let mut codes = self.config.fabric_codes();
        codes.resize(plan.slot_count(), String::new());
        self.config.set(FABRIC_PLAN_KEY, plan.label());
        self.config.set(FABRIC_CODES_KEY, codes);
    }

    /// Put `code` in colour slot `slot` (an empty code clears the slot)
    pub fn set_fabric_code(&mut self, slot: usize, code: &str) -> AppResult<()> {
        let slots = self.fabric_plan().slot_count();
        if slot >= slots {
            return Err(AppError::invalid_field(
                FABRIC_CODES_KEY,
                format!("Slot {} is outside the {} plan", slot, self.fabric_plan()),
            )
            .with_detail("slot", slot));
        }
        if !code.is_empty() && self.fabrics.get(code).is_none() {
            return Err(
                AppError::with_message(ErrorCode::FabricNotFound, format!("Unknown fabric '{}'", code))
                    .with_detail("code", code),
            );
        }

        let mut codes = self.config.fabric_codes();
        if codes.len() < slots {
            codes.resize(slots, String::new());
        }
        codes[slot] = code.to_string();
        self.config.set(FABRIC_CODES_KEY, codes);
        Ok(())
    }

    fn validate(&self, attribute: &ConfigurationAttribute, value: &ConfigValue) -> AppResult<()> {
        match (attribute.attribute_type, value) {
            (AttributeType::Multiselect, ConfigValue::Multi(values)) => values
                .iter()
                .try_for_each(|v| self.validate_option(attribute, v)),
            (AttributeType::Multiselect, ConfigValue::Single(_)) | (_, ConfigValue::Multi(_)) => {
                Err(AppError::invalid_field(
                    &attribute.name,
                    format!("Attribute '{}' does not accept this value shape", attribute.name),
                ))
            }
            (AttributeType::Toggle, ConfigValue::Single(v)) if v != YES && v != NO => {
                Err(AppError::invalid_field(
                    &attribute.name,
                    format!("Toggle '{}' must be Yes or No", attribute.name),
                ))
            }
            (AttributeType::Select, ConfigValue::Single(v)) if !v.is_empty() => {
                self.validate_option(attribute, v)
            }
            _ => Ok(()),
        }
    }

    /// Value must be one of the loaded options (skipped before options load)
    fn validate_option(&self, attribute: &ConfigurationAttribute, value: &str) -> AppResult<()> {
        let options = self.catalog.options_for(attribute);
        if options.is_empty() || options.iter().any(|o| o.value == value) {
            return Ok(());
        }
        Err(AppError::invalid_field(
            &attribute.name,
            format!("'{}' is not an option of '{}'", value, attribute.name),
        )
        .with_detail("value", value))
    }

    // ========== Queries ==========

    /// `Empty` also covers a model name that the loaded model list does not know
    pub fn state(&self) -> SessionState {
        if self.model_name().is_none() {
            SessionState::Empty
        } else if self.missing_required().is_empty() {
            SessionState::Complete
        } else {
            SessionState::Partial
        }
    }

    pub fn is_complete(&self) -> bool {
        self.state() == SessionState::Complete
    }

    pub fn visible_attributes(&self) -> Vec<&ConfigurationAttribute> {
        visibility::visible_attributes(&self.catalog.attributes, &self.config)
    }

    pub fn missing_required(&self) -> Vec<&ConfigurationAttribute> {
        visibility::missing_required(&self.catalog.attributes, &self.config)
    }

    /// Current fabric plan; unset or unknown labels read as Single Colour
    pub fn fabric_plan(&self) -> FabricPlan {
        self.config
            .fabric_plan_label()
            .and_then(FabricPlan::from_label)
            .unwrap_or_default()
    }

    pub fn fabric_requirement(&self) -> FabricRequirement {
        self.yield_table.estimate(&self.config)
    }

    pub fn fabric_cost(&self) -> FabricCost {
        let meters = self.fabric_requirement().total;
        aggregate_fabric_cost(&self.config, meters, &self.fabrics)
    }

    pub fn breakdown(&self) -> PriceBreakdown {
        self.calculator
            .breakdown(&self.config, self.selected_model(), &self.fabric_cost())
    }

    pub fn price(&self) -> i64 {
        self.breakdown().total
    }

    /// Label/value lines for the model and every visible attribute with a value
    pub fn summary(&self) -> Vec<SummaryLine> {
        let mut lines = Vec::new();
        if let Some(model) = self.config.model() {
            lines.push(SummaryLine {
                label: "Model".to_string(),
                value: model.to_string(),
            });
        }
        for attribute in self.visible_attributes() {
            if let Some(value) = self.config.get(&attribute.name).filter(|v| v.is_present()) {
                lines.push(SummaryLine {
                    label: attribute.label.clone(),
                    value: value.display(),
                });
            }
        }
        if let Some(plan) = self.config.fabric_plan_label() {
            let chosen = self
                .config
                .fabric_codes()
                .iter()
                .filter(|code| !code.is_empty())
                .count();
            let value = if chosen > 0 {
                format!("{} ({} selected)", plan, chosen)
            } else {
                plan.to_string()
            };
            lines.push(SummaryLine {
                label: "Fabric".to_string(),
                value,
            });
        }
        lines
    }

    // ========== Actions ==========

    /// Snapshot the configuration into the cart at the current price
    ///
    /// Before any model list has loaded (fixed price lists need none) the
    /// configuration's own model name is used.
    pub fn add_to_cart(&self, cart: &mut CartStore) -> AppResult<CartItem> {
        self.ensure_not_saving()?;
        let model_name = if self.catalog.models.is_empty() {
            self.config.model().ok_or_else(no_model_selected)?
        } else {
            self.require_model()?.name.as_str()
        };
        cart.add_priced(model_name, self.config.clone(), self.breakdown())
    }

    /// `{ modelName, config, price, timestamp }` payload
    pub fn snapshot(&self) -> ConfigurationSnapshot {
        ConfigurationSnapshot {
            model_name: self.config.model().unwrap_or_default().to_string(),
            config: self.config.clone(),
            price: self.price(),
            timestamp: now_millis(),
        }
    }

    /// Saved-configuration row for the backend
    pub fn saved_configuration(
        &self,
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> AppResult<SavedConfiguration> {
        let model = self.require_model()?;
        Ok(SavedConfiguration {
            user_id: user_id.into(),
            category_id: self.catalog.category_id.clone(),
            model_id: model.id.clone(),
            name: name.into(),
            configuration_data: self.config.clone(),
            total_price: self.price(),
            is_favorite: false,
        })
    }

    /// Mark a save as in flight and return the row to send
    pub fn begin_save(
        &mut self,
        user_id: impl Into<String>,
        name: impl Into<String>,
    ) -> AppResult<SavedConfiguration> {
        self.ensure_not_saving()?;
        let row = self.saved_configuration(user_id, name)?;
        self.save_in_flight = true;
        tracing::debug!(model = %row.model_id, "Configuration save started");
        Ok(row)
    }

    /// The backend answered (either way); actions are allowed again
    pub fn finish_save(&mut self) {
        self.save_in_flight = false;
    }

    pub fn is_saving(&self) -> bool {
        self.save_in_flight
    }

    fn ensure_not_saving(&self) -> AppResult<()> {
        if self.save_in_flight {
            return Err(AppError::new(ErrorCode::SaveInProgress));
        }
        Ok(())
    }

    /// Selected model name, checked against the model list once it has loaded
    fn model_name(&self) -> Option<&str> {
        let name = self.config.model()?;
        if self.catalog.models.is_empty() {
            return Some(name);
        }
        self.selected_model().map(|model| model.name.as_str())
    }

    fn require_model(&self) -> AppResult<&SofaModel> {
        let Some(name) = self.config.model() else {
            return Err(no_model_selected());
        };
        self.catalog.model_by_name(name).ok_or_else(|| {
            AppError::with_message(ErrorCode::ModelNotFound, format!("Unknown model '{}'", name))
                .with_detail("model", name)
        })
    }
}

fn no_model_selected() -> AppError {
    AppError::with_message(ErrorCode::ModelNotFound, "No model selected")
}
