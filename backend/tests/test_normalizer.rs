//! RateSet normalizer tests
//!
//! Covers filtering of invalid rates, deduplication by period, ordering and
//! GCD scaling into the solver's step space.

use rental_pricing_core_rs::pricing::{normalize, PricingError};
use rental_pricing_core_rs::{Money, Rate, RateSet};

/// Helper to create a rate from minutes and cents
fn rate(period_minutes: i64, cents: i64) -> Rate {
    Rate::new(period_minutes, Money::from_cents(cents))
}

// ============================================================================
// Filtering
// ============================================================================

#[test]
fn test_single_zero_period_rate_has_no_usable_rates() {
    let rates = RateSet::new(rate(0, 2000));
    assert_eq!(normalize(&rates), Err(PricingError::NoUsableRates));
}

#[test]
fn test_all_invalid_rates_fail() {
    let rates = RateSet::new(rate(-1440, 2000))
        .with_tier(rate(10080, -1))
        .with_tier(rate(0, 0));
    assert_eq!(normalize(&rates), Err(PricingError::NoUsableRates));
}

#[test]
fn test_invalid_base_with_valid_tier_still_normalizes() {
    let rates = RateSet::new(rate(0, 2000)).with_tier(rate(10080, 12000));
    let normalized = normalize(&rates).unwrap();

    assert_eq!(normalized.dropped(), 1);
    assert_eq!(normalized.rates().len(), 1);
    assert_eq!(normalized.scale(), 10080);
    assert_eq!(normalized.rates()[0].steps, 1);
}

#[test]
fn test_zero_price_is_usable() {
    let rates = RateSet::new(rate(60, 0));
    let normalized = normalize(&rates).unwrap();
    assert_eq!(normalized.rates()[0].price, Money::ZERO);
}

// ============================================================================
// Ordering, deduplication and scaling
// ============================================================================

#[test]
fn test_sorted_by_ascending_period() {
    let rates = RateSet::new(rate(1440, 2000))
        .with_tier(rate(10080, 12000))
        .with_tier(rate(60, 150));
    let normalized = normalize(&rates).unwrap();

    let periods: Vec<u64> = normalized.rates().iter().map(|r| r.period_minutes).collect();
    assert_eq!(periods, vec![60, 1440, 10080]);
}

#[test]
fn test_hour_day_week_scale_by_sixty() {
    let rates = RateSet::new(rate(60, 500))
        .with_tier(rate(1440, 2000))
        .with_tier(rate(10080, 12000));
    let normalized = normalize(&rates).unwrap();

    assert_eq!(normalized.scale(), 60);
    let steps: Vec<u64> = normalized.rates().iter().map(|r| r.steps).collect();
    assert_eq!(steps, vec![1, 24, 168]);
    assert_eq!(normalized.max_step(), 168);
}

#[test]
fn test_day_multiples_scale_by_day() {
    let rates = RateSet::new(rate(1440, 2000))
        .with_tier(rate(7200, 9000))
        .with_tier(rate(14400, 16000));
    let normalized = normalize(&rates).unwrap();

    assert_eq!(normalized.scale(), 1440);
    let steps: Vec<u64> = normalized.rates().iter().map(|r| r.steps).collect();
    assert_eq!(steps, vec![1, 5, 10]);
}

#[test]
fn test_duplicate_period_keeps_cheapest() {
    let rates = RateSet::new(rate(1440, 2000))
        .with_tier(rate(1440, 1800))
        .with_tier(rate(1440, 2500));
    let normalized = normalize(&rates).unwrap();

    assert_eq!(normalized.rates().len(), 1);
    assert_eq!(normalized.rates()[0].price, Money::from_cents(1800));
    assert_eq!(normalized.dropped(), 0);
}

#[test]
fn test_steps_are_integral() {
    let rates = RateSet::new(rate(90, 100))
        .with_tier(rate(150, 160))
        .with_tier(rate(600, 500));
    let normalized = normalize(&rates).unwrap();

    assert_eq!(normalized.scale(), 30);
    for r in normalized.rates() {
        assert_eq!(r.steps * normalized.scale(), r.period_minutes);
    }
}
