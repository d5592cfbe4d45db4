//! Fabric Cost Aggregator
//!
//! Splits the estimated meters across the colour slots of the fabric plan and
//! prices each slot from the catalog. Empty or unknown codes cost nothing.

use super::catalog::FabricCatalog;
use crate::utils::{to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::models::{Configuration, FabricPlan};

/// One priced colour slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricSlotCost {
    pub slot: usize,
    pub code: String,
    pub meters: f64,
    pub fabric_cost: f64,
    pub upgrade_cost: f64,
}

/// Fabric and upgrade cost for a configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FabricCost {
    pub fabric_cost: f64,
    pub upgrade_cost: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub slots: Vec<FabricSlotCost>,
}

/// Price `codes` against the catalog
///
/// Single Colour gives the whole total to the one slot; Dual and Tri split it
/// evenly over 2 or 3 slots. Codes past the plan's slot count are ignored.
pub fn fabric_cost_for(
    codes: &[String],
    plan: FabricPlan,
    total_meters: f64,
    catalog: &FabricCatalog,
) -> FabricCost {
    let slot_count = plan.slot_count();
    let per_slot = to_decimal(total_meters.max(0.0)) / Decimal::from(slot_count as u64);

    let mut fabric_total = Decimal::ZERO;
    let mut upgrade_total = Decimal::ZERO;
    let mut slots = Vec::new();

    for (slot, code) in codes.iter().take(slot_count).enumerate() {
        if code.is_empty() {
            continue;
        }
        let Some(fabric) = catalog.get(code) else {
            tracing::debug!(slot, code = %code, "Unknown fabric code, slot contributes nothing");
            continue;
        };

        let fabric_cost = per_slot.saturating_mul(to_decimal(fabric.price_per_meter));
        let upgrade_cost = per_slot.saturating_mul(to_decimal(fabric.upgrade_charges));
        fabric_total = fabric_total.saturating_add(fabric_cost);
        upgrade_total = upgrade_total.saturating_add(upgrade_cost);

        slots.push(FabricSlotCost {
            slot,
            code: code.clone(),
            meters: to_f64(per_slot),
            fabric_cost: to_f64(fabric_cost),
            upgrade_cost: to_f64(upgrade_cost),
        });
    }

    FabricCost {
        fabric_cost: to_f64(fabric_total),
        upgrade_cost: to_f64(upgrade_total),
        slots,
    }
}

/// Price the configuration's `fabricCodes` under its `fabricPlan`
///
/// An unrecognized plan label is treated as Single Colour.
pub fn aggregate_fabric_cost(
    config: &Configuration,
    total_meters: f64,
    catalog: &FabricCatalog,
) -> FabricCost {
    let plan = config
        .fabric_plan_label()
        .and_then(FabricPlan::from_label)
        .unwrap_or_default();
    fabric_cost_for(&config.fabric_codes(), plan, total_meters, catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{FABRIC_CODES_KEY, FABRIC_PLAN_KEY};

    fn codes(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_single_plan_takes_full_total() {
        let catalog = FabricCatalog::builtin();
        let cost = fabric_cost_for(&codes(&["COT-BLE-001"]), FabricPlan::Single, 9.0, &catalog);
        // 9 m × 850 and 9 m × 120
        assert_eq!(cost.fabric_cost, 7650.0);
        assert_eq!(cost.upgrade_cost, 1080.0);
        assert_eq!(cost.slots.len(), 1);
    }

    #[test]
    fn test_dual_plan_splits_evenly() {
        let catalog = FabricCatalog::builtin();
        let cost = fabric_cost_for(
            &codes(&["LEA-LUX-001", "VEL-ROY-001"]),
            FabricPlan::Dual,
            10.8,
            &catalog,
        );
        // 5.4 × 2800 + 5.4 × 1850
        assert_eq!(cost.fabric_cost, 25110.0);
        // 5.4 × 450 + 5.4 × 280
        assert_eq!(cost.upgrade_cost, 3942.0);
        assert!(cost.slots.iter().all(|s| s.meters == 5.4));
    }

    #[test]
    fn test_unfilled_and_unknown_slots_cost_nothing() {
        let catalog = FabricCatalog::builtin();
        let cost = fabric_cost_for(
            &codes(&["LIN-NAT-001", "", "NOPE-000"]),
            FabricPlan::Tri,
            12.0,
            &catalog,
        );
        // only the first slot: 4 m × 1200
        assert_eq!(cost.fabric_cost, 4800.0);
        assert_eq!(cost.upgrade_cost, 720.0);
        assert_eq!(cost.slots.len(), 1);
    }

    #[test]
    fn test_extra_codes_beyond_plan_are_ignored() {
        let catalog = FabricCatalog::builtin();
        let cost = fabric_cost_for(
            &codes(&["COT-BLE-001", "LEA-LUX-001"]),
            FabricPlan::Single,
            10.0,
            &catalog,
        );
        assert_eq!(cost.fabric_cost, 8500.0);
    }

    #[test]
    fn test_no_codes_is_zero() {
        let cost = aggregate_fabric_cost(&Configuration::new(), 12.0, &FabricCatalog::builtin());
        assert_eq!(cost, FabricCost::default());
    }

    #[test]
    fn test_aggregate_reads_configuration() {
        let mut config = Configuration::new();
        config.set(FABRIC_PLAN_KEY, "Dual Colour");
        config.set(
            FABRIC_CODES_KEY,
            codes(&["SYN-PRE-001", "SYN-PRE-002"]),
        );

        let cost = aggregate_fabric_cost(&config, 10.0, &FabricCatalog::builtin());
        // 5 × 950 + 5 × 1050
        assert_eq!(cost.fabric_cost, 10000.0);
        assert_eq!(cost.upgrade_cost, 1475.0);
    }
}
