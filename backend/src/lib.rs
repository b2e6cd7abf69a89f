//! Rental Pricing Core - Rust Engine
//!
//! Prices equipment rentals from a catalog of fixed-price packages and checks
//! the package model against the legacy threshold-discount model.
//!
//! # Architecture
//!
//! - **core**: Pricing units and typed durations
//! - **models**: Domain types (Money, Rate, RateSet, LegacyTier, ProductPricing)
//! - **pricing**: Normalizer, coverage solver, legacy resolver, quotes
//! - **parity**: Legacy vs package sweeps and mismatch reports
//!
//! # Critical Invariants
//!
//! 1. All money values are i64 (cents)
//! 2. Pricing is a pure function of its inputs (no I/O, no shared state)
//! 3. A rate set with no usable rate is an error, never a free rental
//! 4. FFI boundary is minimal and safe

// Module declarations
pub mod core;
pub mod models;
pub mod parity;
pub mod pricing;

// Re-exports for convenience
pub use crate::core::units::{DurationError, DurationMinutes, DurationUnits, PricingUnit};
pub use models::{
    money::{Money, MoneyError},
    rate::{
        DurationBounds, InvalidRate, LegacyTier, LegacyTiers, ProductPricing, Rate, RateSet,
        TierError,
    },
};
pub use parity::{
    check_catalog, check_product, Mismatch, ParityConfig, ParityError, ParityReport,
    ProductParity, UnitCaps,
};
pub use pricing::{legacy_cost, quote, solve, PricingError, Quote};

// FFI module (when feature enabled)
#[cfg(feature = "pyo3")]
pub mod ffi;

// PyO3 exports (when feature enabled)
#[cfg(feature = "pyo3")]
use pyo3::prelude::*;

#[cfg(feature = "pyo3")]
#[pymodule]
fn rental_pricing_core_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ffi::pricing::quote_duration, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::pricing::quote_product, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::pricing::legacy_cost, m)?)?;
    m.add_function(wrap_pyfunction!(ffi::pricing::check_parity, m)?)?;
    Ok(())
}
