//! Property tests for the pricing engine
//!
//! - Monotonicity: longer rentals never cost less
//! - Dominance: adding a never-cheapest rate changes nothing
//! - Rounding: results are exact to 2 decimal places
//! - Coverage: breakdowns cover the request and sum to the cost
//! - Parity: packages never exceed legacy cost at tier boundaries or below
//!   the first tier

use proptest::prelude::*;
use rental_pricing_core_rs::pricing::{legacy_cost, solve, solve_detailed, translate};
use rental_pricing_core_rs::{
    DurationMinutes, DurationUnits, LegacyTier, LegacyTiers, Money, PricingUnit, ProductPricing,
    Rate, RateSet,
};

/// Rate sets built from hour/day/week multiples, like real catalogs
fn catalog_rate_set() -> impl Strategy<Value = RateSet> {
    let period = prop_oneof![
        (1i64..=48).prop_map(|h| h * 60),
        (1i64..=14).prop_map(|d| d * 1_440),
        (1i64..=4).prop_map(|w| w * 10_080),
    ];
    let rate = (period, 0i64..=50_000).prop_map(|(p, c)| Rate::new(p, Money::from_cents(c)));
    (rate.clone(), prop::collection::vec(rate, 0..4)).prop_map(|(base, tiers)| RateSet {
        base,
        tiers,
    })
}

/// Small, possibly coprime periods to stress the step space
fn odd_rate_set() -> impl Strategy<Value = RateSet> {
    let rate = (1i64..=97, 0i64..=5_000).prop_map(|(p, c)| Rate::new(p, Money::from_cents(c)));
    (rate.clone(), prop::collection::vec(rate, 0..3)).prop_map(|(base, tiers)| RateSet {
        base,
        tiers,
    })
}

fn legacy_product() -> impl Strategy<Value = ProductPricing> {
    let unit = prop_oneof![
        Just(PricingUnit::Hour),
        Just(PricingUnit::Day),
        Just(PricingUnit::Week)
    ];
    let tiers = prop::collection::btree_map(1u32..=40, 0u32..=10_000, 0..4).prop_map(|defs| {
        LegacyTiers::new(
            defs.into_iter()
                .map(|(units, bps)| LegacyTier::new(units, f64::from(bps) / 100.0).unwrap())
                .collect(),
        )
        .unwrap()
    });
    (unit, 0i64..=100_000, tiers).prop_map(|(unit, cents, tiers)| {
        ProductPricing::new("prop", unit, Money::from_cents(cents)).with_tiers(tiers)
    })
}

proptest! {
    #[test]
    fn prop_cost_is_monotonic(
        rates in catalog_rate_set(),
        a in 1u64..=60_000,
        b in 1u64..=60_000,
    ) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        let short_cost = solve(DurationMinutes::new(short), &rates).unwrap();
        let long_cost = solve(DurationMinutes::new(long), &rates).unwrap();
        prop_assert!(short_cost <= long_cost, "{} > {}", short_cost, long_cost);
    }

    #[test]
    fn prop_cost_is_monotonic_for_odd_periods(
        rates in odd_rate_set(),
        a in 1u64..=2_000,
        b in 1u64..=2_000,
    ) {
        let (short, long) = if a <= b { (a, b) } else { (b, a) };
        let short_cost = solve(DurationMinutes::new(short), &rates).unwrap();
        let long_cost = solve(DurationMinutes::new(long), &rates).unwrap();
        prop_assert!(short_cost <= long_cost);
    }

    #[test]
    fn prop_dominated_rate_changes_nothing(
        rates in catalog_rate_set(),
        period_hours in 1i64..=336,
        markup in 0i64..=10_000,
        minutes in 1u64..=30_000,
    ) {
        // Priced at or above the cheapest existing coverage of its own period
        let period = period_hours * 60;
        let existing = solve(DurationMinutes::new(period as u64), &rates).unwrap();
        let dominated = rates
            .clone()
            .with_tier(Rate::new(period, existing + Money::from_cents(markup)));

        prop_assert_eq!(
            solve(DurationMinutes::new(minutes), &dominated).unwrap(),
            solve(DurationMinutes::new(minutes), &rates).unwrap()
        );
    }

    #[test]
    fn prop_rounding_is_idempotent(rates in catalog_rate_set(), minutes in 1u64..=60_000) {
        let cost = solve(DurationMinutes::new(minutes), &rates).unwrap();
        prop_assert_eq!(Money::from_decimal(cost.to_decimal()).unwrap(), cost);
    }

    #[test]
    fn prop_breakdown_covers_request(rates in odd_rate_set(), minutes in 1u64..=5_000) {
        let coverage = solve_detailed(DurationMinutes::new(minutes), &rates).unwrap();

        let total: Money = coverage.packages.iter().map(|p| p.subtotal()).sum();
        let covered: u64 = coverage.packages.iter().map(|p| p.period_minutes * p.count).sum();

        prop_assert!(!coverage.used_fallback);
        prop_assert_eq!(total, coverage.cost);
        prop_assert_eq!(covered, coverage.covered_minutes);
        prop_assert!(coverage.covered_minutes >= minutes);
    }

    #[test]
    fn prop_packages_never_exceed_legacy_at_boundaries(product in legacy_product()) {
        let translated = translate(&product);
        for tier in product.tiers.iter() {
            let units = DurationUnits::new(tier.min_duration_units());
            let legacy = legacy_cost(product.base_price, &product.tiers, units);
            let packaged = solve(units.to_minutes(product.pricing_unit), &translated).unwrap();
            prop_assert!(packaged <= legacy, "{} > {} at {}", packaged, legacy, units);
        }
    }

    #[test]
    fn prop_packages_never_exceed_undiscounted_legacy(product in legacy_product()) {
        // Below the first threshold legacy is plain units × base, which the
        // base rate alone can always match
        let first_tier = product
            .tiers
            .iter()
            .next()
            .map_or(41, |t| t.min_duration_units());
        let translated = translate(&product);
        for units in 1..first_tier {
            let units = DurationUnits::new(units);
            let packaged = solve(units.to_minutes(product.pricing_unit), &translated).unwrap();
            prop_assert!(packaged <= legacy_cost(product.base_price, &product.tiers, units));
        }
    }
}
