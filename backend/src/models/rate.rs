//! Rate model
//!
//! Catalog-side pricing definitions:
//! - `Rate`: a fixed-price package covering exactly `period_minutes`
//! - `RateSet`: the mandatory base rate plus optional tier packages
//! - `LegacyTier`: a threshold discount from the older pricing model
//! - `ProductPricing`: everything the catalog knows about one product's price
//!
//! These are read-only inputs. The engine derives costs from them and never
//! mutates them.

use crate::core::units::{DurationMinutes, PricingUnit};
use crate::models::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Basis points in 100%
pub const FULL_DISCOUNT_BPS: u32 = 10_000;

/// Errors in legacy tier definitions
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TierError {
    #[error("tier threshold must be at least one unit")]
    ZeroThreshold,

    #[error("discount {0}% is outside 0..=100")]
    DiscountOutOfRange(f64),

    #[error("more than one tier starts at {0} units")]
    DuplicateThreshold(u32),
}

/// Why a rate cannot take part in pricing
///
/// Never returned to callers of the solver: invalid rates are dropped during
/// normalization and only matter if nothing usable is left.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRate {
    #[error("period of {0} minutes is not positive")]
    NonPositivePeriod(i64),

    #[error("price {0} is negative")]
    NegativePrice(Money),
}

/// Fixed-price package covering `period_minutes` of rental
///
/// Period and price are signed so invalid catalog rows can be represented
/// and dropped during normalization instead of failing deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rate {
    pub period_minutes: i64,
    pub price: Money,
}

impl Rate {
    pub fn new(period_minutes: i64, price: Money) -> Self {
        Self {
            period_minutes,
            price,
        }
    }

    /// Check for a positive period and a non-negative price
    pub fn validate(&self) -> Result<(), InvalidRate> {
        if self.period_minutes <= 0 {
            return Err(InvalidRate::NonPositivePeriod(self.period_minutes));
        }
        if self.price.is_negative() {
            return Err(InvalidRate::NegativePrice(self.price));
        }
        Ok(())
    }

    pub fn is_usable(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Base rate plus tier packages
///
/// # Example
/// ```
/// use rental_pricing_core_rs::{Money, Rate, RateSet};
///
/// let rates = RateSet::new(Rate::new(1440, Money::from_cents(2000)))
///     .with_tier(Rate::new(10080, Money::from_cents(12000)));
/// assert_eq!(rates.iter().count(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateSet {
    pub base: Rate,
    #[serde(default)]
    pub tiers: Vec<Rate>,
}

impl RateSet {
    pub fn new(base: Rate) -> Self {
        Self {
            base,
            tiers: Vec::new(),
        }
    }

    pub fn with_tier(mut self, tier: Rate) -> Self {
        self.tiers.push(tier);
        self
    }

    /// Base rate first, then tiers in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &Rate> {
        std::iter::once(&self.base).chain(self.tiers.iter())
    }
}

/// Threshold discount from the legacy pricing model
///
/// Once a rental reaches `min_duration_units`, the discount applies to the
/// whole rental. The discount is held in basis points (1% = 100 bps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LegacyTierRecord", into = "LegacyTierRecord")]
pub struct LegacyTier {
    min_duration_units: u32,
    discount_bps: u32,
}

/// Wire form of a legacy tier, as stored by the catalog
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct LegacyTierRecord {
    min_duration_units: u32,
    discount_percent: f64,
}

impl LegacyTier {
    /// Build a tier from a percentage discount
    ///
    /// The percentage is kept to two decimal places (basis points).
    pub fn new(min_duration_units: u32, discount_percent: f64) -> Result<Self, TierError> {
        if min_duration_units == 0 {
            return Err(TierError::ZeroThreshold);
        }
        if !discount_percent.is_finite() || !(0.0..=100.0).contains(&discount_percent) {
            return Err(TierError::DiscountOutOfRange(discount_percent));
        }
        Ok(Self {
            min_duration_units,
            discount_bps: (discount_percent * 100.0).round() as u32,
        })
    }

    pub fn min_duration_units(&self) -> u32 {
        self.min_duration_units
    }

    pub fn discount_bps(&self) -> u32 {
        self.discount_bps
    }

    pub fn discount_percent(&self) -> f64 {
        f64::from(self.discount_bps) / 100.0
    }
}

impl TryFrom<LegacyTierRecord> for LegacyTier {
    type Error = TierError;

    fn try_from(record: LegacyTierRecord) -> Result<Self, Self::Error> {
        LegacyTier::new(record.min_duration_units, record.discount_percent)
    }
}

impl From<LegacyTier> for LegacyTierRecord {
    fn from(tier: LegacyTier) -> Self {
        LegacyTierRecord {
            min_duration_units: tier.min_duration_units,
            discount_percent: tier.discount_percent(),
        }
    }
}

/// A product's legacy tiers, sorted by threshold, one per threshold
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LegacyTier>", into = "Vec<LegacyTier>")]
pub struct LegacyTiers(Vec<LegacyTier>);

impl LegacyTiers {
    pub fn new(mut tiers: Vec<LegacyTier>) -> Result<Self, TierError> {
        tiers.sort_by_key(LegacyTier::min_duration_units);
        let mut seen = BTreeSet::new();
        for tier in &tiers {
            if !seen.insert(tier.min_duration_units) {
                return Err(TierError::DuplicateThreshold(tier.min_duration_units));
            }
        }
        Ok(Self(tiers))
    }

    pub fn empty() -> Self {
        Self(Vec::new())
    }

    pub fn as_slice(&self) -> &[LegacyTier] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &LegacyTier> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Vec<LegacyTier>> for LegacyTiers {
    type Error = TierError;

    fn try_from(tiers: Vec<LegacyTier>) -> Result<Self, Self::Error> {
        LegacyTiers::new(tiers)
    }
}

impl From<LegacyTiers> for Vec<LegacyTier> {
    fn from(tiers: LegacyTiers) -> Self {
        tiers.0
    }
}

/// Bookable duration window supplied by the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationBounds {
    #[serde(default)]
    pub min_minutes: Option<u64>,
    #[serde(default)]
    pub max_minutes: Option<u64>,
}

impl DurationBounds {
    pub fn contains(&self, duration: DurationMinutes) -> bool {
        let minutes = duration.get();
        self.min_minutes.map_or(true, |min| minutes >= min)
            && self.max_minutes.map_or(true, |max| minutes <= max)
    }
}

/// Everything the catalog supplies to price one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPricing {
    pub product_id: String,
    pub pricing_unit: PricingUnit,
    /// Price of one pricing unit
    pub base_price: Money,
    /// Legacy threshold discounts (may be empty)
    #[serde(default)]
    pub tiers: LegacyTiers,
    /// Package rates already migrated to the rate model
    #[serde(default)]
    pub package_rates: Vec<Rate>,
    #[serde(default)]
    pub duration_bounds: Option<DurationBounds>,
}

impl ProductPricing {
    pub fn new(product_id: impl Into<String>, pricing_unit: PricingUnit, base_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            pricing_unit,
            base_price,
            tiers: LegacyTiers::empty(),
            package_rates: Vec::new(),
            duration_bounds: None,
        }
    }

    pub fn with_tiers(mut self, tiers: LegacyTiers) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_package_rates(mut self, rates: Vec<Rate>) -> Self {
        self.package_rates = rates;
        self
    }

    pub fn with_duration_bounds(mut self, bounds: DurationBounds) -> Self {
        self.duration_bounds = Some(bounds);
        self
    }

    /// The per-unit base rate
    pub fn base_rate(&self) -> Rate {
        // Unit minutes are small constants, always within i64
        Rate::new(self.pricing_unit.minutes() as i64, self.base_price)
    }
}
