use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A rental plan resolved from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RentalPlan {
    pub days: i32,
    pub daily_rate: Decimal,
}

/// Fixed table of rental plans keyed by day count. Built once at startup
/// and shared by reference; there is no way to add or remove entries.
#[derive(Debug, Clone)]
pub struct RentalPlanCatalog {
    plans: BTreeMap<i32, Decimal>,
}

impl RentalPlanCatalog {
    /// The five standard plans.
    pub fn standard() -> Self {
        let mut plans = BTreeMap::new();
        plans.insert(7, dec!(30.00));
        plans.insert(15, dec!(28.00));
        plans.insert(30, dec!(22.00));
        plans.insert(45, dec!(20.00));
        plans.insert(50, dec!(18.00));
        Self { plans }
    }

    pub fn plan(&self, days: i32) -> Option<RentalPlan> {
        self.plans.get(&days).map(|rate| RentalPlan {
            days,
            daily_rate: *rate,
        })
    }

    /// Daily rate for a plan already known to exist. Panics on an
    /// unknown day count; use `plan` when existence is in question.
    pub fn price(&self, days: i32) -> Decimal {
        self.plans[&days]
    }

    pub fn plan_exists(&self, days: i32) -> bool {
        self.plans.contains_key(&days)
    }

    pub fn price_exists(&self, price: Decimal) -> bool {
        self.plans.values().any(|rate| *rate == price)
    }

    pub fn plan_price_exists(&self, days: i32, price: Decimal) -> bool {
        self.plan_exists(days) && self.price_exists(price)
    }
}

impl Default for RentalPlanCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_catalog_rates() {
        let catalog = RentalPlanCatalog::standard();

        assert_eq!(catalog.price(7), dec!(30.00));
        assert_eq!(catalog.price(15), dec!(28.00));
        assert_eq!(catalog.price(30), dec!(22.00));
        assert_eq!(catalog.price(45), dec!(20.00));
        assert_eq!(catalog.price(50), dec!(18.00));
    }

    #[test]
    fn test_unknown_day_count_has_no_plan() {
        let catalog = RentalPlanCatalog::standard();

        for days in [0, 1, 8, 14, 31, 49, 51, -7] {
            assert!(catalog.plan(days).is_none(), "unexpected plan for {} days", days);
            assert!(!catalog.plan_exists(days));
        }
    }

    #[test]
    fn test_plan_carries_its_key() {
        let catalog = RentalPlanCatalog::standard();
        let plan = catalog.plan(30).unwrap();

        assert_eq!(plan.days, 30);
        assert_eq!(plan.daily_rate, dec!(22.00));
    }

    #[test]
    fn test_price_existence_checks() {
        let catalog = RentalPlanCatalog::standard();

        assert!(catalog.price_exists(dec!(28.00)));
        assert!(!catalog.price_exists(dec!(29.00)));
        assert!(catalog.plan_price_exists(7, dec!(30.00)));
        assert!(catalog.plan_price_exists(7, dec!(18.00)));
        assert!(!catalog.plan_price_exists(8, dec!(30.00)));
    }

    #[test]
    #[should_panic]
    fn test_price_panics_on_unknown_plan() {
        RentalPlanCatalog::standard().price(10);
    }
}
