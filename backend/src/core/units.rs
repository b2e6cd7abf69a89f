//! Pricing units and rental durations
//!
//! Two duration quantities flow through the engine:
//! - `DurationUnits`: a count of the product's pricing unit (legacy model)
//! - `DurationMinutes`: whole minutes (package rate model)
//!
//! `DurationUnits::to_minutes` is the only conversion between them.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Minutes in one hour
pub const MINUTES_PER_HOUR: u64 = 60;
/// Minutes in one day
pub const MINUTES_PER_DAY: u64 = 1_440;
/// Minutes in one week
pub const MINUTES_PER_WEEK: u64 = 10_080;

/// Errors converting a fractional minute count into a duration
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DurationError {
    #[error("duration is not a finite number of minutes: {0}")]
    NotFinite(f64),

    #[error("duration of {0} minutes exceeds the supported range")]
    OutOfRange(f64),
}

/// Period a product's base price is quoted in
///
/// # Example
/// ```
/// use rental_pricing_core_rs::PricingUnit;
///
/// assert_eq!(PricingUnit::Day.minutes(), 1440);
/// assert_eq!(PricingUnit::Week.minutes(), 7 * PricingUnit::Day.minutes());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingUnit {
    Hour,
    Day,
    Week,
}

impl PricingUnit {
    /// All units, shortest first
    pub const ALL: [PricingUnit; 3] = [PricingUnit::Hour, PricingUnit::Day, PricingUnit::Week];

    /// Fixed number of minutes in one unit
    pub const fn minutes(self) -> u64 {
        match self {
            PricingUnit::Hour => MINUTES_PER_HOUR,
            PricingUnit::Day => MINUTES_PER_DAY,
            PricingUnit::Week => MINUTES_PER_WEEK,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PricingUnit::Hour => "hour",
            PricingUnit::Day => "day",
            PricingUnit::Week => "week",
        }
    }
}

impl fmt::Display for PricingUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rental length in whole minutes (always at least 1)
///
/// # Example
/// ```
/// use rental_pricing_core_rs::DurationMinutes;
///
/// // Fractional requests round up to the next whole minute
/// assert_eq!(DurationMinutes::from_fractional(124.2).unwrap().get(), 125);
/// assert!(DurationMinutes::from_fractional(f64::INFINITY).is_err());
/// assert_eq!(DurationMinutes::new(0).get(), 1);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationMinutes(u64);

impl DurationMinutes {
    /// Create a duration, clamping to the 1 minute minimum
    pub fn new(minutes: u64) -> Self {
        Self(minutes.max(1))
    }

    /// Round a fractional minute count up to whole minutes
    ///
    /// Non-positive inputs collapse to the 1 minute minimum.
    ///
    /// # Errors
    /// NaN and infinities are `NotFinite`. Anything that does not fit in a
    /// `u64` after rounding up is `OutOfRange`.
    pub fn from_fractional(minutes: f64) -> Result<Self, DurationError> {
        if !minutes.is_finite() {
            return Err(DurationError::NotFinite(minutes));
        }
        if minutes <= 0.0 {
            return Ok(Self(1));
        }
        let whole = minutes.ceil();
        // u64::MAX as f64 rounds up to 2^64, one past the largest u64
        if whole >= u64::MAX as f64 {
            return Err(DurationError::OutOfRange(minutes));
        }
        Ok(Self::new(whole as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DurationMinutes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}min", self.0)
    }
}

/// Rental length counted in a product's pricing unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DurationUnits(u32);

impl DurationUnits {
    pub fn new(units: u32) -> Self {
        Self(units)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Convert to minutes for the given pricing unit
    ///
    /// # Example
    /// ```
    /// use rental_pricing_core_rs::{DurationUnits, PricingUnit};
    ///
    /// let eight_days = DurationUnits::new(8).to_minutes(PricingUnit::Day);
    /// assert_eq!(eight_days.get(), 11_520);
    /// ```
    pub fn to_minutes(self, unit: PricingUnit) -> DurationMinutes {
        // u32::MAX * 10_080 fits comfortably in u64
        DurationMinutes::new(u64::from(self.0) * unit.minutes())
    }
}

impl fmt::Display for DurationUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
