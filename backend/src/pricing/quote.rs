//! Checkout quotes
//!
//! Entry point for the catalog layer: pick the product's rate set, check the
//! requested duration against its bookable window, then solve.

use crate::core::units::DurationMinutes;
use crate::models::money::Money;
use crate::models::rate::{DurationBounds, ProductPricing, RateSet};
use crate::pricing::legacy::translate;
use crate::pricing::solver::{solve_detailed, PackageUse};
use crate::pricing::PricingError;
use serde::{Deserialize, Serialize};

/// Priced answer for one rental request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub requested_minutes: u64,
    pub covered_minutes: u64,
    pub cost: Money,
    pub packages: Vec<PackageUse>,
}

/// Rate set used to price a product
///
/// Migrated products carry their own package rates. Anything else is priced
/// from its legacy tiers, translated into packages.
pub fn rate_set_for(product: &ProductPricing) -> RateSet {
    if product.package_rates.is_empty() {
        translate(product)
    } else {
        RateSet {
            base: product.base_rate(),
            tiers: product.package_rates.clone(),
        }
    }
}

/// Quote a duration against an explicit rate set
///
/// # Errors
/// - `DurationOutOfBounds` if `bounds` excludes the duration
/// - `NoUsableRates` if the rate set has no valid rate
pub fn quote(
    rate_set: &RateSet,
    duration: DurationMinutes,
    bounds: Option<&DurationBounds>,
) -> Result<Quote, PricingError> {
    if let Some(bounds) = bounds {
        if !bounds.contains(duration) {
            return Err(PricingError::DurationOutOfBounds {
                requested: duration.get(),
                bounds: *bounds,
            });
        }
    }

    let coverage = solve_detailed(duration, rate_set)?;
    Ok(Quote {
        requested_minutes: coverage.requested_minutes,
        covered_minutes: coverage.covered_minutes,
        cost: coverage.cost,
        packages: coverage.packages,
    })
}

/// Quote a duration for a catalog product
pub fn quote_product(product: &ProductPricing, duration: DurationMinutes) -> Result<Quote, PricingError> {
    quote(&rate_set_for(product), duration, product.duration_bounds.as_ref())
}
