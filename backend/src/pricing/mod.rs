//! Pricing Module
//!
//! Computes rental costs under both pricing models:
//! - **normalizer**: validates rates and maps them onto an integer step space
//! - **solver**: cheapest package combination covering a duration
//! - **legacy**: threshold-discount pricing and its translation to packages
//! - **quote**: bounds-checked entry point for checkout
//!
//! # Critical Invariants
//!
//! 1. **Pure**: every function is a deterministic function of its inputs, with
//!    no shared state, so requests can be priced concurrently without locks
//! 2. **No free rentals**: a rate set without a usable rate is an error,
//!    never a zero cost
//! 3. **Exact money**: all arithmetic is on integer cents
//!
//! # Example
//!
//! ```rust
//! use rental_pricing_core_rs::{DurationMinutes, Money, Rate, RateSet};
//! use rental_pricing_core_rs::pricing::{solve, PricingError};
//!
//! let rates = RateSet::new(Rate::new(0, Money::from_cents(2000)));
//! assert_eq!(
//!     solve(DurationMinutes::new(60), &rates),
//!     Err(PricingError::NoUsableRates)
//! );
//! ```

pub mod legacy;
pub mod normalizer;
pub mod quote;
pub mod solver;

use crate::core::units::DurationError;
use crate::models::money::MoneyError;
use crate::models::rate::{DurationBounds, TierError};
use thiserror::Error;

/// Errors raised while pricing a rental
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PricingError {
    #[error("no usable rates: every rate has a non-positive period or a negative price")]
    NoUsableRates,

    #[error("duration of {requested} minutes is outside the bookable window {bounds:?}")]
    DurationOutOfBounds {
        requested: u64,
        bounds: DurationBounds,
    },

    #[error("invalid duration: {0}")]
    InvalidDuration(#[from] DurationError),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] MoneyError),

    #[error("invalid tier: {0}")]
    InvalidTier(#[from] TierError),
}

// Re-export public API
pub use legacy::{applicable_tier, backfill_rows, legacy_cost, translate, translate_tiers, BackfillRow};
pub use normalizer::{normalize, normalize_rates, NormalizedRates, ScaledRate};
pub use quote::{quote, quote_product, rate_set_for, Quote};
pub use solver::{cover, solve, solve_detailed, Coverage, PackageUse, MAX_WINDOW_STEPS};
