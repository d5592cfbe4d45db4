//! Built-in rule tables

use super::rules::{PriceRule, RuleCondition, RuleEffect, RuleTable};
use shared::models::{FABRIC_PLAN_KEY, YES};
use std::collections::BTreeMap;

/// Base price of a one-seater in the legacy sofa configurator
pub const LEGACY_BASE_PRICE: f64 = 45000.0;
/// Seat width the legacy tiers are priced at (inches)
pub const LEGACY_REFERENCE_WIDTH: f64 = 28.0;

fn amounts(entries: &[(&str, f64)]) -> BTreeMap<String, f64> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn add(name: &str, condition: RuleCondition, amount: f64) -> PriceRule {
    PriceRule::new(name, condition, RuleEffect::Add { amount })
}

/// The fixed sofa price list
///
/// Order matters: the width scale multiplies the seat tier and lounger only,
/// every later add-on is flat.
pub fn legacy_sofa_table() -> RuleTable {
    RuleTable::new(vec![
        PriceRule::new(
            "seats",
            RuleCondition::Always,
            RuleEffect::SetBase {
                field: "seats".to_string(),
                table: amounts(&[
                    ("1", 45000.0),
                    ("2", 65000.0),
                    ("3", 85000.0),
                    // 1+2+3 set
                    ("123", 150000.0),
                ]),
                default: None,
            },
        ),
        PriceRule::new(
            "lounger",
            RuleCondition::equals("needsLounger", YES),
            RuleEffect::Linear {
                field: "loungerLength".to_string(),
                amount: 25000.0,
                origin: 6.0,
                per_unit: 2000.0,
            },
        ),
        PriceRule::new(
            "seatWidth",
            RuleCondition::Always,
            RuleEffect::Scale {
                field: "seatWidth".to_string(),
                reference: LEGACY_REFERENCE_WIDTH,
            },
        ),
        PriceRule::new(
            "armRestType",
            RuleCondition::Always,
            RuleEffect::Lookup {
                field: "armRestType".to_string(),
                table: amounts(&[("smug", 0.0), ("ocean", 3000.0), ("box", 1500.0)]),
                default: 0.0,
            },
        ),
        PriceRule::new(
            "console",
            RuleCondition::equals("needsConsole", YES),
            RuleEffect::LookupTimesCount {
                field: "consoleType".to_string(),
                table: amounts(&[("6\"", 4000.0), ("8\"", 5500.0), ("10\"", 7000.0)]),
                default: 4000.0,
                count_field: "consoleCount".to_string(),
                count_table: BTreeMap::new(),
                count_default: 1,
            },
        ),
        add("corner", RuleCondition::equals("needsCorner", YES), 15000.0),
        add("woodType", RuleCondition::equals("woodType", "pine"), 8000.0),
        add("seatFoam", RuleCondition::equals("seatFoam", "latex"), 12000.0),
        PriceRule::new(
            "fabricPlan",
            RuleCondition::Always,
            RuleEffect::Lookup {
                field: FABRIC_PLAN_KEY.to_string(),
                table: amounts(&[("single", 0.0), ("dual", 8000.0), ("triple", 15000.0)]),
                default: 0.0,
            },
        ),
        PriceRule::new(
            "accessories",
            RuleCondition::Always,
            RuleEffect::PerSelected {
                field: "accessories".to_string(),
                amount: 2500.0,
            },
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Configuration;

    fn legacy_config(json: &str) -> Configuration {
        Configuration::from_json_str(json).unwrap()
    }

    #[test]
    fn test_one_seater_reference_width() {
        let c = legacy_config(r#"{"seats": 1, "seatWidth": 28, "accessories": []}"#);
        let outcome = legacy_sofa_table().evaluate(&c, LEGACY_BASE_PRICE);
        assert_eq!(outcome.total, 45000.0);
        assert!(outcome.applied.is_empty());
    }

    #[test]
    fn test_width_scales_tier_and_lounger_only() {
        let c = legacy_config(
            r#"{
                "seats": 2,
                "needsLounger": true,
                "loungerLength": 7,
                "seatWidth": 35,
                "armRestType": "ocean",
                "needsCorner": true,
                "accessories": ["cushion", "throw"]
            }"#,
        );
        let outcome = legacy_sofa_table().evaluate(&c, LEGACY_BASE_PRICE);
        // (65000 + 27000) × 1.25 = 115000, + 3000 + 15000 + 5000
        assert_eq!(outcome.total, 138000.0);
        let names: Vec<&str> = outcome.applied.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["seats", "lounger", "seatWidth", "armRestType", "corner", "accessories"]
        );
    }

    #[test]
    fn test_console_fallback_price_times_count() {
        let c = legacy_config(
            r#"{"seats": 3, "seatWidth": 28, "needsConsole": true, "consoleType": "12\"", "consoleCount": 2}"#,
        );
        let outcome = legacy_sofa_table().evaluate(&c, LEGACY_BASE_PRICE);
        assert_eq!(outcome.total, 85000.0 + 8000.0);
    }

    #[test]
    fn test_wood_foam_and_plan() {
        let c = legacy_config(
            r#"{"seats": 123, "seatWidth": 28, "woodType": "pine", "seatFoam": "latex", "fabricPlan": "triple"}"#,
        );
        let outcome = legacy_sofa_table().evaluate(&c, LEGACY_BASE_PRICE);
        assert_eq!(outcome.total, 150000.0 + 8000.0 + 12000.0 + 15000.0);
    }

    #[test]
    fn test_oversized_numbers_fall_back() {
        let huge = "79228162514264337593543950335";

        let wide = legacy_config(&format!(r#"{{"seats": 2, "seatWidth": "{}"}}"#, huge));
        let outcome = legacy_sofa_table().evaluate(&wide, LEGACY_BASE_PRICE);
        assert_eq!(outcome.total, 65000.0);

        let long = legacy_config(&format!(
            r#"{{"seats": 2, "seatWidth": 28, "needsLounger": true, "loungerLength": "{}"}}"#,
            huge
        ));
        let outcome = legacy_sofa_table().evaluate(&long, LEGACY_BASE_PRICE);
        assert_eq!(outcome.total, 65000.0 + 25000.0);
    }
}
