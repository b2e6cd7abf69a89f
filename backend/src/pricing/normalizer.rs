//! RateSet normalization
//!
//! Turns catalog rates into the integer step space the coverage solver runs
//! over:
//! 1. Drop rates with a non-positive period or a negative price
//! 2. Keep only the cheapest rate per distinct period
//! 3. Sort by ascending period
//! 4. Scale every period by the GCD of all surviving periods
//!
//! Hour/day/week catalogs (60, 1440, 10080) scale by 60, so a one-week
//! rental is 168 steps rather than 10080.

use crate::models::money::Money;
use crate::models::rate::{Rate, RateSet};
use crate::pricing::PricingError;
use std::collections::BTreeMap;
use tracing::debug;

/// A usable rate expressed in scaled steps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledRate {
    pub period_minutes: u64,
    pub price: Money,
    /// `period_minutes / scale`, always integral
    pub steps: u64,
}

/// Validated, deduplicated rates sorted by ascending period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedRates {
    scale: u64,
    rates: Vec<ScaledRate>,
    dropped: usize,
}

impl NormalizedRates {
    /// Minutes per step (GCD of all usable periods)
    pub fn scale(&self) -> u64 {
        self.scale
    }

    pub fn rates(&self) -> &[ScaledRate] {
        &self.rates
    }

    /// Number of input rates rejected as unusable
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Largest step count of any rate
    pub fn max_step(&self) -> u64 {
        // Normalization never produces an empty list
        self.rates.last().map_or(1, |r| r.steps)
    }

    /// Rate with the lowest price per step
    ///
    /// Ties resolve to the shorter period.
    pub fn cheapest_per_step(&self) -> &ScaledRate {
        let mut best = &self.rates[0];
        for rate in &self.rates[1..] {
            // price_a / steps_a < price_b / steps_b without division
            let lhs = i128::from(rate.price.cents()) * i128::from(best.steps);
            let rhs = i128::from(best.price.cents()) * i128::from(rate.steps);
            if lhs < rhs {
                best = rate;
            }
        }
        best
    }
}

/// Normalize a base rate and its tiers
///
/// # Errors
/// Returns `PricingError::NoUsableRates` if every rate is invalid.
///
/// # Example
/// ```
/// use rental_pricing_core_rs::{Money, Rate, RateSet};
/// use rental_pricing_core_rs::pricing::normalize;
///
/// let rates = RateSet::new(Rate::new(1440, Money::from_cents(2000)))
///     .with_tier(Rate::new(10080, Money::from_cents(12000)))
///     .with_tier(Rate::new(60, Money::from_cents(150)));
///
/// let normalized = normalize(&rates).unwrap();
/// assert_eq!(normalized.scale(), 60);
/// let steps: Vec<u64> = normalized.rates().iter().map(|r| r.steps).collect();
/// assert_eq!(steps, vec![1, 24, 168]);
/// ```
pub fn normalize(rate_set: &RateSet) -> Result<NormalizedRates, PricingError> {
    normalize_rates(rate_set.iter())
}

/// Normalize an arbitrary collection of rates
pub fn normalize_rates<'a, I>(rates: I) -> Result<NormalizedRates, PricingError>
where
    I: IntoIterator<Item = &'a Rate>,
{
    let mut cheapest_by_period: BTreeMap<u64, Money> = BTreeMap::new();
    let mut dropped = 0;

    for rate in rates {
        if let Err(reason) = rate.validate() {
            debug!(
                period_minutes = rate.period_minutes,
                price = %rate.price,
                %reason,
                "dropping unusable rate"
            );
            dropped += 1;
            continue;
        }
        // validate() guarantees a positive period
        let period = rate.period_minutes as u64;
        cheapest_by_period
            .entry(period)
            .and_modify(|price| *price = (*price).min(rate.price))
            .or_insert(rate.price);
    }

    if cheapest_by_period.is_empty() {
        return Err(PricingError::NoUsableRates);
    }

    let scale = cheapest_by_period.keys().copied().fold(0, gcd);

    let rates = cheapest_by_period
        .into_iter()
        .map(|(period_minutes, price)| ScaledRate {
            period_minutes,
            price,
            steps: period_minutes / scale,
        })
        .collect();

    Ok(NormalizedRates {
        scale,
        rates,
        dropped,
    })
}

/// Greatest common divisor; `gcd(0, n) == n`
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}
