//! Coverage solver
//!
//! Finds the cheapest multiset of package rates whose combined period covers
//! **at least** the requested duration. Packages may be reused any number of
//! times and overshooting the request is allowed (a week package can beat six
//! day packages).
//!
//! # Algorithm
//!
//! Unbounded-knapsack minimum-cost reachability over the normalized step
//! space:
//!
//! ```text
//! reach[0] = 0
//! reach[s] = min over rates i with steps_i <= s of reach[s - steps_i] + price_i
//! answer   = min reach[s] for s in [target, target + max_step]
//! ```
//!
//! The window stops at `target + max_step`: from any reachable step below the
//! target, one more of the longest package lands inside the window, so the
//! cheapest covering combination is never cut off.
//!
//! Windows longer than [`MAX_WINDOW_STEPS`] are not tabulated. Those requests
//! repeat the cheapest-per-step package instead and are flagged with
//! `used_fallback`.
//!
//! # Critical Invariants
//!
//! 1. Costs are integer cents, so results are exact to 2 decimal places
//! 2. `covered_minutes >= requested_minutes` for every result
//! 3. The only failure is `NoUsableRates`

use crate::core::units::DurationMinutes;
use crate::models::money::Money;
use crate::models::rate::RateSet;
use crate::pricing::normalizer::{normalize, NormalizedRates};
use crate::pricing::PricingError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Largest reachability table the solver will allocate, in steps
///
/// At the hourly scale this is over a century of rental.
pub const MAX_WINDOW_STEPS: u64 = 1 << 20;

/// Number of times one package is used in a coverage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageUse {
    pub period_minutes: u64,
    pub unit_price: Money,
    pub count: u64,
}

impl PackageUse {
    pub fn subtotal(&self) -> Money {
        self.unit_price.saturating_mul(self.count)
    }
}

/// Result of covering a duration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coverage {
    /// Requested duration after rounding up to whole minutes
    pub requested_minutes: u64,
    /// Minutes paid for (>= requested)
    pub covered_minutes: u64,
    pub cost: Money,
    /// Packages used, longest period first
    pub packages: Vec<PackageUse>,
    /// True when the reachability window produced no answer
    pub used_fallback: bool,
}

/// Minimum cost to cover `duration` with the given rate set
///
/// # Errors
/// Returns `PricingError::NoUsableRates` when no rate has a positive period
/// and a non-negative price.
///
/// # Example
/// ```
/// use rental_pricing_core_rs::{DurationMinutes, Money, Rate, RateSet};
/// use rental_pricing_core_rs::pricing::solve;
///
/// let rates = RateSet::new(Rate::new(1440, Money::from_cents(2000)))
///     .with_tier(Rate::new(10080, Money::from_cents(12000)));
///
/// // 8 days: one week package plus one day
/// let cost = solve(DurationMinutes::new(11_520), &rates).unwrap();
/// assert_eq!(cost.to_string(), "140.00");
/// ```
pub fn solve(duration: DurationMinutes, rate_set: &RateSet) -> Result<Money, PricingError> {
    Ok(solve_detailed(duration, rate_set)?.cost)
}

/// Like [`solve`], but also reports which packages were chosen
pub fn solve_detailed(
    duration: DurationMinutes,
    rate_set: &RateSet,
) -> Result<Coverage, PricingError> {
    let normalized = normalize(rate_set)?;
    Ok(cover(duration, &normalized))
}

/// Cover a duration with already-normalized rates
pub fn cover(duration: DurationMinutes, normalized: &NormalizedRates) -> Coverage {
    let target_minutes = duration.get();
    let target_steps = target_minutes.div_ceil(normalized.scale());
    let bound = target_steps.saturating_add(normalized.max_step());

    if bound > MAX_WINDOW_STEPS {
        warn!(
            target_minutes,
            scale = normalized.scale(),
            window_steps = bound,
            "reachability window too large, using fallback"
        );
        return fallback_coverage(duration, normalized);
    }
    // target_steps <= bound <= MAX_WINDOW_STEPS, so both fit in usize
    let window = bound as usize;

    let table = ReachTable::build(window, normalized);
    match table.cheapest_at_least(target_steps as usize) {
        Some(step) => table.coverage(step, target_minutes, normalized),
        None => {
            warn!(
                target_minutes,
                scale = normalized.scale(),
                rates = normalized.rates().len(),
                "no covering combination inside the reachability window, using fallback"
            );
            fallback_coverage(duration, normalized)
        }
    }
}

/// Cheapest-per-step rate repeated until the request is covered
///
/// Always feasible for any non-empty normalized set.
pub(crate) fn fallback_coverage(duration: DurationMinutes, normalized: &NormalizedRates) -> Coverage {
    let target_minutes = duration.get();
    let rate = normalized.cheapest_per_step();
    let count = target_minutes.div_ceil(rate.period_minutes);
    let package = PackageUse {
        period_minutes: rate.period_minutes,
        unit_price: rate.price,
        count,
    };

    Coverage {
        requested_minutes: target_minutes,
        covered_minutes: rate.period_minutes.saturating_mul(count),
        cost: package.subtotal(),
        packages: vec![package],
        used_fallback: true,
    }
}

/// Per-step cheapest cost and the rate that last reached the step
struct ReachTable {
    entries: Vec<Option<Reach>>,
}

#[derive(Clone, Copy)]
struct Reach {
    cost: Money,
    rate_index: Option<usize>,
}

impl ReachTable {
    fn build(bound: usize, normalized: &NormalizedRates) -> Self {
        let rates = normalized.rates();
        let mut entries: Vec<Option<Reach>> = vec![None; bound + 1];
        entries[0] = Some(Reach {
            cost: Money::ZERO,
            rate_index: None,
        });

        for step in 1..=bound {
            let mut best: Option<Reach> = None;
            for (index, rate) in rates.iter().enumerate() {
                // Steps are bounded by the window, which fits in usize
                let rate_steps = rate.steps as usize;
                if rate_steps > step {
                    // Rates are sorted by period, so every later rate is longer
                    break;
                }
                let Some(prev) = entries[step - rate_steps] else {
                    continue;
                };
                let Some(cost) = prev.cost.checked_add(rate.price) else {
                    continue;
                };
                if best.map_or(true, |b| cost < b.cost) {
                    best = Some(Reach {
                        cost,
                        rate_index: Some(index),
                    });
                }
            }
            entries[step] = best;
        }

        Self { entries }
    }

    /// Smallest step at or above `target` with the lowest finite cost
    fn cheapest_at_least(&self, target: usize) -> Option<usize> {
        let mut best: Option<(usize, Money)> = None;
        for (step, entry) in self.entries.iter().enumerate().skip(target) {
            if let Some(reach) = entry {
                if best.map_or(true, |(_, cost)| reach.cost < cost) {
                    best = Some((step, reach.cost));
                }
            }
        }
        best.map(|(step, _)| step)
    }

    fn coverage(&self, step: usize, target_minutes: u64, normalized: &NormalizedRates) -> Coverage {
        let rates = normalized.rates();
        let mut counts = vec![0u64; rates.len()];
        let mut cursor = step;
        while let Some(Reach {
            rate_index: Some(index),
            ..
        }) = self.entries[cursor]
        {
            counts[index] += 1;
            cursor -= rates[index].steps as usize;
        }

        let packages = rates
            .iter()
            .zip(counts)
            .rev()
            .filter(|(_, count)| *count > 0)
            .map(|(rate, count)| PackageUse {
                period_minutes: rate.period_minutes,
                unit_price: rate.price,
                count,
            })
            .collect();

        Coverage {
            requested_minutes: target_minutes,
            covered_minutes: step as u64 * normalized.scale(),
            cost: self.entries[step].map_or(Money::ZERO, |r| r.cost),
            packages,
            used_fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rate::Rate;
    use crate::pricing::normalizer::normalize_rates;

    fn rate(period: i64, cents: i64) -> Rate {
        Rate::new(period, Money::from_cents(cents))
    }

    #[test]
    fn test_breakdown_longest_period_first() {
        let rates = RateSet::new(rate(1440, 2000)).with_tier(rate(10080, 12000));
        let coverage = solve_detailed(DurationMinutes::new(11_520), &rates).unwrap();

        assert_eq!(coverage.cost, Money::from_cents(14000));
        assert_eq!(coverage.covered_minutes, 11_520);
        assert_eq!(
            coverage.packages,
            vec![
                PackageUse {
                    period_minutes: 10080,
                    unit_price: Money::from_cents(12000),
                    count: 1
                },
                PackageUse {
                    period_minutes: 1440,
                    unit_price: Money::from_cents(2000),
                    count: 1
                },
            ]
        );
        assert!(!coverage.used_fallback);
    }

    #[test]
    fn test_equal_cost_prefers_least_overshoot() {
        // A 2-hour package at the same price as two 1-hour packages
        let rates = RateSet::new(rate(60, 500)).with_tier(rate(120, 1000));
        let coverage = solve_detailed(DurationMinutes::new(61), &rates).unwrap();
        assert_eq!(coverage.cost, Money::from_cents(1000));
        assert_eq!(coverage.covered_minutes, 120);
    }

    #[test]
    fn test_fallback_repeats_cheapest_per_step_rate() {
        let rates = [rate(60, 600), rate(180, 1200)];
        let normalized = normalize_rates(rates.iter()).unwrap();
        let coverage = fallback_coverage(DurationMinutes::new(400), &normalized);

        // 180-minute package is 4.00/step vs 6.00/step; ceil(400/180) = 3
        assert!(coverage.used_fallback);
        assert_eq!(coverage.cost, Money::from_cents(3600));
        assert_eq!(coverage.covered_minutes, 540);
        assert_eq!(coverage.packages.len(), 1);
        assert_eq!(coverage.packages[0].count, 3);
    }

    #[test]
    fn test_oversized_window_uses_fallback() {
        let rates = RateSet::new(rate(1440, 2000));
        let coverage = solve_detailed(DurationMinutes::new(u64::MAX), &rates).unwrap();

        assert!(coverage.used_fallback);
        assert_eq!(coverage.requested_minutes, u64::MAX);
        assert_eq!(coverage.covered_minutes, u64::MAX);
        assert_eq!(coverage.cost, Money::from_cents(i64::MAX));
    }

    #[test]
    fn test_tiny_period_with_huge_request_uses_fallback() {
        let rates = RateSet::new(rate(1, 1));
        let coverage = solve_detailed(DurationMinutes::new(1 << 40), &rates).unwrap();

        assert!(coverage.used_fallback);
        assert_eq!(coverage.cost, Money::from_cents(1 << 40));
        assert_eq!(coverage.covered_minutes, 1 << 40);
        assert_eq!(coverage.packages[0].count, 1 << 40);
    }

    #[test]
    fn test_window_at_cap_is_still_tabulated() {
        // One step per hour, max_step 1: bound = target + 1
        let rates = RateSet::new(rate(60, 100));
        let target = (MAX_WINDOW_STEPS - 1) * 60;
        let coverage = solve_detailed(DurationMinutes::new(target), &rates).unwrap();
        assert!(!coverage.used_fallback);
        assert_eq!(coverage.cost, Money::from_cents(100 * (MAX_WINDOW_STEPS as i64 - 1)));

        let coverage = solve_detailed(DurationMinutes::new(target + 60), &rates).unwrap();
        assert!(coverage.used_fallback);
        assert_eq!(coverage.cost, Money::from_cents(100 * MAX_WINDOW_STEPS as i64));
    }

    #[test]
    fn test_free_rate_costs_nothing() {
        let rates = RateSet::new(rate(60, 0));
        assert_eq!(solve(DurationMinutes::new(600), &rates).unwrap(), Money::ZERO);
    }

    #[test]
    fn test_coprime_periods_still_cover() {
        // gcd(7, 13) = 1, so every minute is a step
        let rates = RateSet::new(rate(7, 100)).with_tier(rate(13, 150));
        let coverage = solve_detailed(DurationMinutes::new(20), &rates).unwrap();
        // 7 + 13 = 20 exactly for 2.50
        assert_eq!(coverage.cost, Money::from_cents(250));
        assert_eq!(coverage.covered_minutes, 20);
    }
}
