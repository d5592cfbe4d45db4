//! Price Calculator
//!
//! `total = base + Σ rule deltas + fabric cost + upgrade cost`, rounded to a
//! whole currency unit and never negative.
//!
//! The base is the selected model's `base_price`, or the configured default
//! while no model has loaded yet.

use super::rules::{PriceRule, RuleCondition, RuleEffect, RuleTable};
use crate::core::DEFAULT_BASE_PRICE;
use crate::fabric::FabricCost;
use crate::utils::{round_price, to_decimal, to_f64};
use serde::{Deserialize, Serialize};
use shared::models::{
    AttributeOption, Configuration, ConfigurationAttribute, OptionsByAttribute, PriceBreakdown,
    SofaModel,
};
use std::collections::HashSet;

/// Whether options of attributes hidden by their dependency still count
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HiddenAttributePolicy {
    /// Hidden values keep contributing
    #[default]
    Include,
    /// Only visible attributes contribute
    Exclude,
}

/// How multi-select attributes are priced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MultiSelectPolicy {
    /// A list never matches a single option value
    #[default]
    Ignore,
    /// Every selected option adds its modifier
    SumSelected,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingPolicy {
    #[serde(default)]
    pub hidden_attributes: HiddenAttributePolicy,
    #[serde(default)]
    pub multi_select: MultiSelectPolicy,
}

impl RuleTable {
    /// One rule per active option, in attribute then option order
    ///
    /// Single-select options match by exact equality. Duplicate option values
    /// within an attribute keep the first.
    pub fn from_catalog(
        attributes: &[ConfigurationAttribute],
        options: &OptionsByAttribute,
        policy: PricingPolicy,
    ) -> Self {
        let mut ordered: Vec<&ConfigurationAttribute> =
            attributes.iter().filter(|a| a.is_active).collect();
        ordered.sort_by_key(|a| a.order_index);

        let mut table = RuleTable::default();
        for attribute in ordered {
            let Some(attribute_options) = options.get(&attribute.id) else {
                continue;
            };
            let mut sorted: Vec<&AttributeOption> =
                attribute_options.iter().filter(|o| o.is_active).collect();
            sorted.sort_by_key(|o| o.order_index);

            let mut seen = HashSet::new();
            for option in sorted {
                if !seen.insert(option.value.as_str()) {
                    tracing::warn!(
                        attribute = %attribute.name,
                        value = %option.value,
                        "Duplicate option value ignored"
                    );
                    continue;
                }
                if option.price_modifier == 0.0 {
                    continue;
                }
                table.push(option_rule(attribute, option, policy));
            }
        }
        table
    }
}

fn option_rule(
    attribute: &ConfigurationAttribute,
    option: &AttributeOption,
    policy: PricingPolicy,
) -> PriceRule {
    let selected = if attribute.is_multi_select() && policy.multi_select == MultiSelectPolicy::SumSelected
    {
        RuleCondition::Contains {
            field: attribute.name.clone(),
            value: option.value.clone(),
        }
    } else {
        RuleCondition::equals(&attribute.name, &option.value)
    };

    let condition = match (policy.hidden_attributes, attribute.dependency()) {
        (HiddenAttributePolicy::Exclude, Some((on, value))) => RuleCondition::All {
            conditions: vec![RuleCondition::equals(on, value), selected],
        },
        _ => selected,
    };

    PriceRule::new(
        format!("{}={}", attribute.name, option.value),
        condition,
        RuleEffect::Add {
            amount: option.price_modifier,
        },
    )
}

/// Rule table plus base-price fallback
#[derive(Debug, Clone)]
pub struct PriceCalculator {
    table: RuleTable,
    default_base_price: f64,
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new(RuleTable::default())
    }
}

impl PriceCalculator {
    pub fn new(table: RuleTable) -> Self {
        Self {
            table,
            default_base_price: DEFAULT_BASE_PRICE,
        }
    }

    /// Calculator driven by the category's attribute options
    pub fn from_catalog(
        attributes: &[ConfigurationAttribute],
        options: &OptionsByAttribute,
        policy: PricingPolicy,
    ) -> Self {
        Self::new(RuleTable::from_catalog(attributes, options, policy))
    }

    pub fn with_default_base_price(mut self, price: f64) -> Self {
        self.default_base_price = price.max(0.0);
        self
    }

    pub fn table(&self) -> &RuleTable {
        &self.table
    }

    /// Full breakdown for one configuration snapshot
    pub fn breakdown(
        &self,
        config: &Configuration,
        model: Option<&SofaModel>,
        fabric: &FabricCost,
    ) -> PriceBreakdown {
        let base_price = match model {
            Some(model) => model.base_price,
            None => {
                tracing::debug!(
                    default = self.default_base_price,
                    "No model selected, using default base price"
                );
                self.default_base_price
            }
        };

        let base = to_decimal(base_price);
        let (after_rules, applied) = self.table.apply(config, base);
        let total = after_rules
            .saturating_add(to_decimal(fabric.fabric_cost))
            .saturating_add(to_decimal(fabric.upgrade_cost));

        PriceBreakdown {
            base_price,
            modifier_total: to_f64(after_rules.saturating_sub(base)),
            fabric_cost: fabric.fabric_cost,
            upgrade_cost: fabric.upgrade_cost,
            total: round_price(total),
            applied,
        }
    }

    pub fn price(
        &self,
        config: &Configuration,
        model: Option<&SofaModel>,
        fabric: &FabricCost,
    ) -> i64 {
        self.breakdown(config, model, fabric).total
    }
}

/// Catalog-driven price with the default policy
pub fn calculate_price(
    config: &Configuration,
    model: Option<&SofaModel>,
    attributes: &[ConfigurationAttribute],
    options: &OptionsByAttribute,
    fabric: &FabricCost,
) -> i64 {
    PriceCalculator::from_catalog(attributes, options, PricingPolicy::default())
        .price(config, model, fabric)
}
