//! Fabric Requirement Estimator
//!
//! Meters of fabric needed to clad a configured sofa. Every lookup degrades
//! to a fallback value: a half-filled configuration is the normal case while
//! the customer is still choosing.
//!
//! ```text
//! total = (seats + lounger? + console? × count + corner?) × plan multiplier
//! ```
//!
//! The result is rounded up to the next 0.1 m so fabric is never under-ordered.

use crate::utils::{ceil_meters, to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Configuration, FabricPlan};
use std::collections::HashMap;
use std::sync::LazyLock;

pub const SEATS_KEY: &str = "seats";
pub const NEEDS_LOUNGER_KEY: &str = "needsLounger";
pub const LOUNGER_LENGTH_KEY: &str = "loungerLength";
pub const NEEDS_CONSOLE_KEY: &str = "needsConsole";
pub const CONSOLE_TYPE_KEY: &str = "consoleType";
pub const CONSOLE_COUNT_KEY: &str = "consoleCount";
pub const NEEDS_CORNER_KEY: &str = "needsCorner";

static DEFAULT_TABLE: LazyLock<FabricYieldTable> = LazyLock::new(FabricYieldTable::default);

/// Fabric yield lookup tables (meters)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FabricYieldTable {
    /// Seat-count descriptor -> base meters
    pub seats: HashMap<String, f64>,
    pub seats_fallback: f64,
    /// Lounger length descriptor -> meters
    pub lounger: HashMap<String, f64>,
    pub lounger_fallback: f64,
    /// Console type -> meters per unit
    pub console: HashMap<String, f64>,
    pub console_fallback: f64,
    /// Console count descriptor -> units
    pub console_count: HashMap<String, u32>,
    pub console_count_fallback: u32,
    pub corner: f64,
    /// Fabric plan label -> waste multiplier; unknown plans use 1.0
    pub plan_multipliers: HashMap<String, f64>,
}

impl Default for FabricYieldTable {
    fn default() -> Self {
        Self {
            seats: table(&[
                ("1 (One) seat", 6.0),
                ("2 (Two) seats", 9.0),
                ("3 (Three) seats", 12.0),
                ("2+3+C seats", 18.0),
            ]),
            seats_fallback: 12.0,
            lounger: table(&[
                ("5.5 feet", 6.5),
                ("6 feet", 7.2),
                ("6.5 feet", 7.8),
                ("7 feet", 8.4),
            ]),
            lounger_fallback: 7.2,
            console: table(&[
                ("Tray", 1.5),
                ("USB", 1.8),
                ("Lighting...", 2.0),
                ("Single cup holder", 1.2),
                ("Dual cup holder", 2.0),
            ]),
            console_fallback: 1.5,
            console_count: table(&[("1 (One)", 1), ("2 (Two)", 2)]),
            console_count_fallback: 1,
            corner: 4.5,
            plan_multipliers: FabricPlan::ALL
                .iter()
                .map(|plan| (plan.label().to_string(), plan_multiplier(*plan)))
                .collect(),
        }
    }
}

fn table<V: Copy>(entries: &[(&str, V)]) -> HashMap<String, V> {
    entries.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

fn plan_multiplier(plan: FabricPlan) -> f64 {
    match plan {
        FabricPlan::Single => 1.0,
        FabricPlan::Dual => 1.2,
        FabricPlan::Tri => 1.4,
    }
}

/// Itemized fabric requirement (meters)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricRequirement {
    pub base: f64,
    pub lounger: f64,
    /// Per-unit meters already multiplied by the console count
    pub console: f64,
    pub corner: f64,
    pub multiplier: f64,
    /// Rounded-up total after the plan multiplier
    pub total: f64,
}

impl FabricYieldTable {
    /// Parse a replacement table; missing sections keep their defaults
    pub fn from_json_str(json: &str) -> shared::AppResult<Self> {
        serde_json::from_str(json).map_err(|e| {
            shared::AppError::catalog(format!("Invalid fabric yield table: {}", e))
        })
    }

    /// Itemized estimate
    pub fn estimate(&self, config: &Configuration) -> FabricRequirement {
        let base = lookup(&self.seats, config.text(SEATS_KEY), self.seats_fallback, SEATS_KEY);

        let lounger = if config.flag(NEEDS_LOUNGER_KEY) {
            lookup(
                &self.lounger,
                config.text(LOUNGER_LENGTH_KEY),
                self.lounger_fallback,
                LOUNGER_LENGTH_KEY,
            )
        } else {
            0.0
        };

        let console_meters = if config.flag(NEEDS_CONSOLE_KEY) {
            let per_unit = lookup(
                &self.console,
                config.text(CONSOLE_TYPE_KEY),
                self.console_fallback,
                CONSOLE_TYPE_KEY,
            );
            let count = config
                .text(CONSOLE_COUNT_KEY)
                .and_then(|token| self.console_count.get(token).copied())
                .unwrap_or(self.console_count_fallback);
            to_decimal(per_unit).saturating_mul(Decimal::from(count))
        } else {
            Decimal::ZERO
        };

        let corner = if config.flag(NEEDS_CORNER_KEY) {
            self.corner
        } else {
            0.0
        };

        let multiplier = self.multiplier_for(config.fabric_plan_label());

        let sum = to_decimal(base)
            .saturating_add(to_decimal(lounger))
            .saturating_add(console_meters)
            .saturating_add(to_decimal(corner));
        let total = ceil_meters(sum.saturating_mul(to_decimal(multiplier)));

        FabricRequirement {
            base,
            lounger,
            console: to_f64(console_meters),
            corner,
            multiplier,
            total,
        }
    }

    fn multiplier_for(&self, label: Option<&str>) -> f64 {
        match label.and_then(|l| self.plan_multipliers.get(l)) {
            Some(&multiplier) => multiplier,
            None => {
                if let Some(label) = label {
                    tracing::debug!(plan = %label, "Unknown fabric plan, using multiplier 1.0");
                }
                1.0
            }
        }
    }
}

fn lookup(table: &HashMap<String, f64>, token: Option<&str>, fallback: f64, field: &str) -> f64 {
    match token.and_then(|t| table.get(t)) {
        Some(&meters) => meters,
        None => {
            tracing::debug!(field, token = ?token, fallback, "Fabric yield fallback");
            fallback
        }
    }
}

/// Total meters with the default yield table
pub fn estimate_fabric_meters(config: &Configuration) -> f64 {
    DEFAULT_TABLE.estimate(config).total
}

/// Itemized requirement with the default yield table
pub fn estimate_fabric_requirement(config: &Configuration) -> FabricRequirement {
    DEFAULT_TABLE.estimate(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{FABRIC_PLAN_KEY, YES};

    fn config(pairs: &[(&str, &str)]) -> Configuration {
        let mut config = Configuration::new();
        for (key, value) in pairs {
            config.set(*key, *value);
        }
        config
    }

    #[test]
    fn test_two_seats_single_colour() {
        let c = config(&[
            (SEATS_KEY, "2 (Two) seats"),
            (NEEDS_LOUNGER_KEY, "No"),
            (FABRIC_PLAN_KEY, "Single Colour"),
        ]);
        assert_eq!(estimate_fabric_meters(&c), 9.0);
    }

    #[test]
    fn test_dual_colour_multiplier() {
        let c = config(&[(SEATS_KEY, "2 (Two) seats"), (FABRIC_PLAN_KEY, "Dual Colour")]);
        assert_eq!(estimate_fabric_meters(&c), 10.8);
    }

    #[test]
    fn test_empty_configuration_uses_fallbacks() {
        // seats fallback 12, no add-ons, multiplier 1.0
        assert_eq!(estimate_fabric_meters(&Configuration::new()), 12.0);
    }

    #[test]
    fn test_console_count_multiplies() {
        let c = config(&[
            (SEATS_KEY, "2 (Two) seats"),
            (NEEDS_CONSOLE_KEY, YES),
            (CONSOLE_TYPE_KEY, "Tray"),
            (CONSOLE_COUNT_KEY, "2 (Two)"),
        ]);
        let req = estimate_fabric_requirement(&c);
        assert_eq!(req.console, 3.0);
        assert_eq!(req.total, 12.0);
    }

    #[test]
    fn test_unmapped_console_and_lounger() {
        let c = config(&[
            (SEATS_KEY, "1 (One) seat"),
            (NEEDS_LOUNGER_KEY, YES),
            (LOUNGER_LENGTH_KEY, "9 feet"),
            (NEEDS_CONSOLE_KEY, YES),
            (CONSOLE_TYPE_KEY, "Fridge"),
            (CONSOLE_COUNT_KEY, "3 (Three)"),
        ]);
        let req = estimate_fabric_requirement(&c);
        assert_eq!(req.lounger, 7.2);
        assert_eq!(req.console, 1.5);
        assert_eq!(req.total, 14.7);
    }

    #[test]
    fn test_addons_ignored_without_flag() {
        let c = config(&[
            (SEATS_KEY, "2 (Two) seats"),
            (LOUNGER_LENGTH_KEY, "7 feet"),
            (CONSOLE_TYPE_KEY, "USB"),
            (NEEDS_CORNER_KEY, "No"),
        ]);
        assert_eq!(estimate_fabric_meters(&c), 9.0);
    }

    #[test]
    fn test_full_tri_colour_rounds_up() {
        let c = config(&[
            (SEATS_KEY, "2+3+C seats"),
            (NEEDS_LOUNGER_KEY, YES),
            (LOUNGER_LENGTH_KEY, "6.5 feet"),
            (NEEDS_CONSOLE_KEY, YES),
            (CONSOLE_TYPE_KEY, "USB"),
            (NEEDS_CORNER_KEY, YES),
            (FABRIC_PLAN_KEY, "Tri Colour"),
        ]);
        // (18 + 7.8 + 1.8 + 4.5) * 1.4 = 44.94
        let req = estimate_fabric_requirement(&c);
        assert_eq!(req.multiplier, 1.4);
        assert_eq!(req.total, 45.0);
    }

    #[test]
    fn test_unknown_plan_is_single() {
        let c = config(&[(SEATS_KEY, "3 (Three) seats"), (FABRIC_PLAN_KEY, "Rainbow")]);
        assert_eq!(estimate_fabric_meters(&c), 12.0);
    }

    #[test]
    fn test_table_override_from_json() {
        let table =
            FabricYieldTable::from_json_str(r#"{"seats": {"4 seats": 15.0}, "seats_fallback": 10.0}"#)
                .unwrap();
        assert_eq!(table.corner, 4.5);

        let c = config(&[(SEATS_KEY, "4 seats")]);
        assert_eq!(table.estimate(&c).total, 15.0);
        assert_eq!(table.estimate(&Configuration::new()).total, 10.0);
    }

    #[test]
    fn test_fine_grained_console_yield_still_rounds_up() {
        let table = FabricYieldTable::from_json_str(
            r#"{"seats_fallback": 0.0, "console": {"Slim": 1.0502}}"#,
        )
        .unwrap();
        let c = config(&[
            (NEEDS_CONSOLE_KEY, "Yes"),
            (CONSOLE_TYPE_KEY, "Slim"),
            (CONSOLE_COUNT_KEY, "2 (Two)"),
        ]);

        let requirement = table.estimate(&c);
        assert_eq!(requirement.console, 2.1);
        // 2.1004 m must not be ordered as 2.1
        assert_eq!(requirement.total, 2.2);
    }
}
