//! Price Rule Table
//!
//! A price is a base amount run through an ordered list of rules. Each rule
//! has a condition over the configuration and an effect on the running total;
//! the change it makes is recorded as an [`AppliedModifier`].
//!
//! Both calculator flavours are rule tables:
//! - catalog-driven: one `Equals` + `Add` rule per attribute option
//! - legacy sofa: seat tiers, width scaling and fixed add-ons (see `presets`)

use crate::utils::{to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, AppResult};
use shared::models::{AppliedModifier, ConfigValue, Configuration};
use std::collections::BTreeMap;

/// When a rule applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleCondition {
    Always,
    /// Scalar value equals `value` exactly (a list never matches)
    Equals { field: String, value: String },
    /// Scalar value is one of `values`
    OneOf { field: String, values: Vec<String> },
    /// Field holds a non-empty value
    IsSet { field: String },
    /// List contains `value`, or scalar equals it
    Contains { field: String, value: String },
    /// Every nested condition holds
    All { conditions: Vec<RuleCondition> },
}

impl RuleCondition {
    pub fn equals(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, config: &Configuration) -> bool {
        match self {
            Self::Always => true,
            Self::Equals { field, value } => config.get(field).is_some_and(|v| v.equals_text(value)),
            Self::OneOf { field, values } => config
                .text(field)
                .is_some_and(|v| values.iter().any(|candidate| candidate == v)),
            Self::IsSet { field } => config.is_present(field),
            Self::Contains { field, value } => match config.get(field) {
                Some(ConfigValue::Multi(values)) => values.iter().any(|v| v == value),
                Some(ConfigValue::Single(v)) => v == value,
                None => false,
            },
            Self::All { conditions } => conditions.iter().all(|c| c.matches(config)),
        }
    }
}

/// What a rule does to the running total
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RuleEffect {
    /// Flat amount
    Add { amount: f64 },
    /// Replace the running total with a tier keyed by the field value;
    /// unmapped values use `default`, or keep the total when there is none
    SetBase {
        field: String,
        table: BTreeMap<String, f64>,
        #[serde(default)]
        default: Option<f64>,
    },
    /// Amount keyed by the field value
    Lookup {
        field: String,
        table: BTreeMap<String, f64>,
        #[serde(default)]
        default: f64,
    },
    /// Per-unit amount keyed by `field`, times a unit count read from `count_field`
    LookupTimesCount {
        field: String,
        table: BTreeMap<String, f64>,
        #[serde(default)]
        default: f64,
        count_field: String,
        #[serde(default)]
        count_table: BTreeMap<String, u32>,
        #[serde(default = "default_count")]
        count_default: u32,
    },
    /// `amount + (value - origin) × per_unit` for a numeric field
    Linear {
        field: String,
        amount: f64,
        origin: f64,
        per_unit: f64,
    },
    /// Multiply the running total by `value / reference`
    Scale { field: String, reference: f64 },
    /// `amount` for every selected entry of a list field
    PerSelected { field: String, amount: f64 },
}

fn default_count() -> u32 {
    1
}

impl RuleEffect {
    /// Signed change to `running`
    ///
    /// Arithmetic is checked: a value too large to price falls back the same
    /// way an unreadable one does.
    fn delta(&self, config: &Configuration, running: Decimal) -> Decimal {
        match self {
            Self::Add { amount } => to_decimal(*amount),
            Self::SetBase {
                field,
                table,
                default,
            } => match config.text(field).and_then(|v| table.get(v)).or(default.as_ref()) {
                Some(base) => to_decimal(*base).checked_sub(running).unwrap_or(Decimal::ZERO),
                None => Decimal::ZERO,
            },
            Self::Lookup {
                field,
                table,
                default,
            } => to_decimal(lookup(config, field, table, *default)),
            Self::LookupTimesCount {
                field,
                table,
                default,
                count_field,
                count_table,
                count_default,
            } => {
                let per_unit = to_decimal(lookup(config, field, table, *default));
                let fallback = Decimal::from(*count_default);
                let count = config
                    .text(count_field)
                    .and_then(|token| {
                        count_table
                            .get(token)
                            .map(|&n| Decimal::from(n))
                            .or_else(|| parse_number(token))
                    })
                    .unwrap_or(fallback);
                per_unit.checked_mul(count).unwrap_or_else(|| {
                    tracing::debug!(field = %count_field, "Count out of range, using default");
                    per_unit.saturating_mul(fallback)
                })
            }
            Self::Linear {
                field,
                amount,
                origin,
                per_unit,
            } => {
                let amount = to_decimal(*amount);
                let origin = to_decimal(*origin);
                config
                    .text(field)
                    .and_then(parse_number)
                    .and_then(|value| {
                        value
                            .checked_sub(origin)?
                            .checked_mul(to_decimal(*per_unit))?
                            .checked_add(amount)
                    })
                    .unwrap_or_else(|| {
                        tracing::debug!(field = %field, "No usable numeric value, using origin");
                        amount
                    })
            }
            Self::Scale { field, reference } => {
                let reference = to_decimal(*reference);
                let scaled = config
                    .text(field)
                    .and_then(parse_number)
                    .and_then(|value| value.checked_div(reference))
                    .and_then(|ratio| running.checked_mul(ratio))
                    .and_then(|total| total.checked_sub(running));
                scaled.unwrap_or_else(|| {
                    tracing::debug!(field = %field, "No usable scale value, total left unscaled");
                    Decimal::ZERO
                })
            }
            Self::PerSelected { field, amount } => {
                let count = match config.get(field) {
                    Some(ConfigValue::Multi(values)) => values.len(),
                    Some(value) if value.is_present() => 1,
                    _ => 0,
                };
                to_decimal(*amount).saturating_mul(Decimal::from(count as u64))
            }
        }
    }
}

fn lookup(config: &Configuration, field: &str, table: &BTreeMap<String, f64>, default: f64) -> f64 {
    match config.text(field).and_then(|v| table.get(v)) {
        Some(&amount) => amount,
        None => {
            if config.is_present(field) {
                tracing::debug!(field, value = ?config.text(field), default, "Unmapped value, using default");
            }
            default
        }
    }
}

/// Leading number of a descriptor: `"6.5 feet"` -> 6.5, `"2 (Two)"` -> 2
pub fn parse_number(text: &str) -> Option<Decimal> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && c == '-')))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

/// One named rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRule {
    pub name: String,
    pub condition: RuleCondition,
    pub effect: RuleEffect,
}

impl PriceRule {
    pub fn new(name: impl Into<String>, condition: RuleCondition, effect: RuleEffect) -> Self {
        Self {
            name: name.into(),
            condition,
            effect,
        }
    }
}

/// Result of running a rule table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutcome {
    /// Running total after every rule (not rounded to whole units)
    pub total: f64,
    /// Rules that changed the total, in evaluation order
    pub applied: Vec<AppliedModifier>,
}

impl RuleOutcome {
    pub fn modifier_total(&self) -> f64 {
        to_f64(
            self.applied
                .iter()
                .fold(Decimal::ZERO, |sum, m| sum.saturating_add(to_decimal(m.delta))),
        )
    }
}

/// Ordered list of price rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<PriceRule>,
}

impl RuleTable {
    pub fn new(rules: Vec<PriceRule>) -> Self {
        Self { rules }
    }

    /// Parse a JSON array of rules
    pub fn from_json_str(json: &str) -> AppResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| AppError::catalog(format!("Invalid price rule table: {}", e)))
    }

    pub fn push(&mut self, rule: PriceRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[PriceRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule in declaration order starting from `base`
    pub fn evaluate(&self, config: &Configuration, base: f64) -> RuleOutcome {
        let (total, applied) = self.apply(config, to_decimal(base));
        RuleOutcome {
            total: to_f64(total),
            applied,
        }
    }

    pub(crate) fn apply(
        &self,
        config: &Configuration,
        base: Decimal,
    ) -> (Decimal, Vec<AppliedModifier>) {
        let mut running = base;
        let mut applied = Vec::new();

        for rule in &self.rules {
            if !rule.condition.matches(config) {
                continue;
            }
            let delta = rule.effect.delta(config, running);
            if delta.is_zero() {
                continue;
            }
            let Some(next) = running.checked_add(delta) else {
                tracing::debug!(rule = %rule.name, "Rule pushes total out of range, skipped");
                continue;
            };
            running = next;
            applied.push(AppliedModifier {
                name: rule.name.clone(),
                delta: to_f64(delta),
            });
        }

        (running, applied)
    }
}

impl FromIterator<PriceRule> for RuleTable {
    fn from_iter<I: IntoIterator<Item = PriceRule>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Configuration {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), ConfigValue::from(*v)))
            .collect()
    }

    fn add_rule(name: &str, condition: RuleCondition, amount: f64) -> PriceRule {
        PriceRule::new(name, condition, RuleEffect::Add { amount })
    }

    #[test]
    fn test_rules_apply_in_order() {
        let table = RuleTable::new(vec![
            add_rule("corner", RuleCondition::equals("needsCorner", "Yes"), 15000.0),
            PriceRule::new(
                "width",
                RuleCondition::Always,
                RuleEffect::Scale {
                    field: "seatWidth".to_string(),
                    reference: 28.0,
                },
            ),
        ]);
        let c = config(&[("needsCorner", "Yes"), ("seatWidth", "56")]);

        let outcome = table.evaluate(&c, 45000.0);
        assert_eq!(outcome.total, 120000.0);
        assert_eq!(outcome.applied.len(), 2);
        assert_eq!(outcome.applied[1].name, "width");
        assert_eq!(outcome.applied[1].delta, 60000.0);
        assert_eq!(outcome.modifier_total(), 75000.0);
    }

    #[test]
    fn test_unmatched_rules_are_not_recorded() {
        let table = RuleTable::new(vec![add_rule(
            "pine",
            RuleCondition::equals("woodType", "pine"),
            8000.0,
        )]);
        let outcome = table.evaluate(&config(&[("woodType", "teak")]), 45000.0);
        assert_eq!(outcome.total, 45000.0);
        assert!(outcome.applied.is_empty());
    }

    #[test]
    fn test_equals_never_matches_list() {
        let mut c = Configuration::new();
        c.set("accessories", vec!["Cushion".to_string()]);
        assert!(!RuleCondition::equals("accessories", "Cushion").matches(&c));
        assert!(
            RuleCondition::Contains {
                field: "accessories".to_string(),
                value: "Cushion".to_string()
            }
            .matches(&c)
        );
    }

    #[test]
    fn test_one_of_and_is_set() {
        let c = config(&[("armrest", "Box"), ("blank", "")]);
        let one_of = RuleCondition::OneOf {
            field: "armrest".to_string(),
            values: vec!["Box".to_string(), "Ocean".to_string()],
        };
        assert!(one_of.matches(&c));
        assert!(RuleCondition::IsSet { field: "armrest".to_string() }.matches(&c));
        assert!(!RuleCondition::IsSet { field: "blank".to_string() }.matches(&c));
        assert!(RuleCondition::All { conditions: vec![] }.matches(&c));
    }

    #[test]
    fn test_set_base_without_default_keeps_total() {
        let effect = RuleEffect::SetBase {
            field: "seats".to_string(),
            table: BTreeMap::from([("2".to_string(), 65000.0)]),
            default: None,
        };
        let rule = PriceRule::new("seats", RuleCondition::Always, effect);
        let table = RuleTable::new(vec![rule]);

        assert_eq!(table.evaluate(&config(&[("seats", "2")]), 45000.0).total, 65000.0);
        assert_eq!(table.evaluate(&config(&[("seats", "7")]), 45000.0).total, 45000.0);
    }

    #[test]
    fn test_linear_and_count() {
        let table = RuleTable::new(vec![
            PriceRule::new(
                "lounger",
                RuleCondition::Always,
                RuleEffect::Linear {
                    field: "loungerLength".to_string(),
                    amount: 25000.0,
                    origin: 6.0,
                    per_unit: 2000.0,
                },
            ),
            PriceRule::new(
                "console",
                RuleCondition::Always,
                RuleEffect::LookupTimesCount {
                    field: "consoleType".to_string(),
                    table: BTreeMap::from([("8\"".to_string(), 5500.0)]),
                    default: 4000.0,
                    count_field: "consoleCount".to_string(),
                    count_table: BTreeMap::new(),
                    count_default: 1,
                },
            ),
        ]);
        let c = config(&[
            ("loungerLength", "7.5 feet"),
            ("consoleType", "8\""),
            ("consoleCount", "2 (Two)"),
        ]);
        let outcome = table.evaluate(&c, 0.0);
        // 25000 + 1.5 × 2000 = 28000, 5500 × 2 = 11000
        assert_eq!(outcome.total, 39000.0);
    }

    #[test]
    fn test_overflowing_count_uses_default() {
        let table = RuleTable::new(vec![PriceRule::new(
            "console",
            RuleCondition::Always,
            RuleEffect::LookupTimesCount {
                field: "consoleType".to_string(),
                table: BTreeMap::from([("8\"".to_string(), 5500.0)]),
                default: 4000.0,
                count_field: "consoleCount".to_string(),
                count_table: BTreeMap::new(),
                count_default: 1,
            },
        )]);
        let c = config(&[
            ("consoleType", "8\""),
            ("consoleCount", "79228162514264337593543950335"),
        ]);
        assert_eq!(table.evaluate(&c, 0.0).total, 5500.0);
    }

    #[test]
    fn test_total_out_of_range_skips_rule() {
        let table: RuleTable = [
            PriceRule::new(
                "tier",
                RuleCondition::Always,
                RuleEffect::SetBase {
                    field: "seats".to_string(),
                    table: BTreeMap::from([("2".to_string(), 7.0e28)]),
                    default: None,
                },
            ),
            add_rule("extra", RuleCondition::Always, 7.0e28),
        ]
        .into_iter()
        .collect();

        let outcome = table.evaluate(&config(&[("seats", "2")]), 0.0);
        let names: Vec<&str> = outcome.applied.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["tier"]);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("6.5 feet"), Some(Decimal::new(65, 1)));
        assert_eq!(parse_number("2 (Two)"), Some(Decimal::from(2)));
        assert_eq!(parse_number("-3"), Some(Decimal::from(-3)));
        assert_eq!(parse_number("Tray"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_table_from_json() {
        let json = r#"[
            {"name": "corner", "condition": {"type": "equals", "field": "needsCorner", "value": "Yes"},
             "effect": {"type": "add", "amount": 15000}},
            {"name": "accessories", "condition": {"type": "always"},
             "effect": {"type": "per_selected", "field": "accessories", "amount": 2500}}
        ]"#;
        let table = RuleTable::from_json_str(json).unwrap();
        assert_eq!(table.len(), 2);

        let mut c = config(&[("needsCorner", "Yes")]);
        c.set("accessories", vec!["A".to_string(), "B".to_string()]);
        assert_eq!(table.evaluate(&c, 0.0).total, 20000.0);
    }
}
