//! Legacy tier pricing
//!
//! The legacy model prices a rental as `units × base_price`, discounted by the
//! tier with the largest threshold the rental reaches. The discount applies to
//! the whole rental, not just the units past the threshold.
//!
//! This module also translates legacy tiers into package rates for the rate
//! model: a tier at N units becomes a package covering N units, priced at
//! exactly what the legacy model charges for N units.

use crate::core::units::{DurationUnits, PricingUnit};
use crate::models::money::{div_round_half_away, Money};
use crate::models::rate::{LegacyTier, LegacyTiers, ProductPricing, Rate, RateSet, FULL_DISCOUNT_BPS};
use serde::{Deserialize, Serialize};

/// Tier in effect for a rental of `units`
///
/// The one with the largest `min_duration_units <= units`, if any.
pub fn applicable_tier(tiers: &LegacyTiers, units: DurationUnits) -> Option<&LegacyTier> {
    tiers
        .as_slice()
        .iter()
        .rev()
        .find(|tier| tier.min_duration_units() <= units.get())
}

/// Cost of `units` under the legacy threshold-discount model
///
/// Computed as `base_price × (1 − discount) × units` and rounded once, half
/// away from zero, to whole cents.
///
/// # Example
/// ```
/// use rental_pricing_core_rs::{DurationUnits, LegacyTier, LegacyTiers, Money};
/// use rental_pricing_core_rs::pricing::legacy_cost;
///
/// let tiers = LegacyTiers::new(vec![LegacyTier::new(5, 10.0).unwrap()]).unwrap();
/// let base = Money::from_cents(2000);
///
/// assert_eq!(legacy_cost(base, &tiers, DurationUnits::new(4)).to_string(), "80.00");
/// assert_eq!(legacy_cost(base, &tiers, DurationUnits::new(5)).to_string(), "90.00");
/// ```
pub fn legacy_cost(base_price: Money, tiers: &LegacyTiers, units: DurationUnits) -> Money {
    let discount_bps = applicable_tier(tiers, units).map_or(0, LegacyTier::discount_bps);
    let keep_bps = FULL_DISCOUNT_BPS.saturating_sub(discount_bps);

    let numerator = i128::from(base_price.cents()) * i128::from(keep_bps) * i128::from(units.get());
    let cents = div_round_half_away(numerator, i128::from(FULL_DISCOUNT_BPS));

    let cents = i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX });
    Money::from_cents(cents)
}

/// Package rate set equivalent to a product's legacy tiers
///
/// The base rate covers one pricing unit at the base price. Each tier adds a
/// package covering `min_duration_units` units, priced at the legacy cost of
/// exactly that many units.
pub fn translate(product: &ProductPricing) -> RateSet {
    translate_tiers(product.pricing_unit, product.base_price, &product.tiers)
}

/// [`translate`] without a full product record
pub fn translate_tiers(unit: PricingUnit, base_price: Money, tiers: &LegacyTiers) -> RateSet {
    let unit_minutes = unit.minutes() as i64;
    let base = Rate::new(unit_minutes, base_price);

    tiers.iter().fold(RateSet::new(base), |set, tier| {
        let units = DurationUnits::new(tier.min_duration_units());
        let period = i64::from(tier.min_duration_units()) * unit_minutes;
        set.with_tier(Rate::new(period, legacy_cost(base_price, tiers, units)))
    })
}

/// Tier package fields the catalog persists after migration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackfillRow {
    pub product_id: String,
    pub tier_units: u32,
    pub period_minutes: i64,
    pub price: Money,
}

/// One backfill row per legacy tier
pub fn backfill_rows(product: &ProductPricing) -> Vec<BackfillRow> {
    let translated = translate(product);
    product
        .tiers
        .iter()
        .zip(translated.tiers)
        .map(|(tier, rate)| BackfillRow {
            product_id: product.product_id.clone(),
            tier_units: tier.min_duration_units(),
            period_minutes: rate.period_minutes,
            price: rate.price,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_tiers(defs: &[(u32, f64)]) -> LegacyTiers {
        LegacyTiers::new(
            defs.iter()
                .map(|&(units, pct)| LegacyTier::new(units, pct).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_applicable_tier_picks_largest_reached_threshold() {
        let tiers = make_tiers(&[(3, 5.0), (7, 15.0), (30, 40.0)]);
        assert!(applicable_tier(&tiers, DurationUnits::new(2)).is_none());
        assert_eq!(
            applicable_tier(&tiers, DurationUnits::new(7)).unwrap().min_duration_units(),
            7
        );
        assert_eq!(
            applicable_tier(&tiers, DurationUnits::new(29)).unwrap().min_duration_units(),
            7
        );
        assert_eq!(
            applicable_tier(&tiers, DurationUnits::new(365)).unwrap().min_duration_units(),
            30
        );
    }

    #[test]
    fn test_rounds_once_at_the_end() {
        // 33.33% off 10.00 = 6.667/unit; 3 units = 20.001 → 20.00
        let tiers = make_tiers(&[(1, 33.33)]);
        let cost = legacy_cost(Money::from_cents(1000), &tiers, DurationUnits::new(3));
        assert_eq!(cost, Money::from_cents(2000));

        // 12.5% off 0.99 = 0.86625 → 0.87 (half away from zero)
        let tiers = make_tiers(&[(1, 12.5)]);
        let cost = legacy_cost(Money::from_cents(99), &tiers, DurationUnits::new(1));
        assert_eq!(cost, Money::from_cents(87));
    }

    #[test]
    fn test_full_discount_is_free() {
        let tiers = make_tiers(&[(10, 100.0)]);
        let cost = legacy_cost(Money::from_cents(5000), &tiers, DurationUnits::new(12));
        assert_eq!(cost, Money::ZERO);
    }

    #[test]
    fn test_translate_prices_tiers_at_their_threshold() {
        let tiers = make_tiers(&[(5, 10.0), (10, 20.0)]);
        let set = translate_tiers(PricingUnit::Day, Money::from_cents(2000), &tiers);

        assert_eq!(set.base, Rate::new(1440, Money::from_cents(2000)));
        assert_eq!(
            set.tiers,
            vec![
                Rate::new(7200, Money::from_cents(9000)),
                Rate::new(14400, Money::from_cents(16000)),
            ]
        );
    }

    #[test]
    fn test_backfill_rows() {
        let product = ProductPricing::new("lift-12m", PricingUnit::Week, Money::from_cents(30000))
            .with_tiers(make_tiers(&[(4, 25.0)]));
        let rows = backfill_rows(&product);
        assert_eq!(
            rows,
            vec![BackfillRow {
                product_id: "lift-12m".to_string(),
                tier_units: 4,
                period_minutes: 40_320,
                price: Money::from_cents(90000),
            }]
        );
    }
}
