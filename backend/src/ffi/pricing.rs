//! PyO3 functions for the pricing engine
//!
//! # Example (from Python)
//!
//! ```python
//! from rental_pricing_core_rs import quote_duration, legacy_cost
//!
//! rates = {
//!     "base": {"period_minutes": 1440, "price": 20.0},
//!     "tiers": [{"period_minutes": 10080, "price": 120.0}],
//! }
//! quote = quote_duration(rates, 11520)
//! assert quote["cost"] == 140.0
//!
//! tiers = [{"min_duration_units": 5, "discount_percent": 10}]
//! assert legacy_cost(20.0, tiers, 5) == 90.0
//! ```

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use super::types::{
    parse_legacy_tiers, parse_parity_config, parse_product, parse_rate_set, parity_report_to_py,
    pricing_err, quote_to_py,
};
use crate::core::units::{DurationMinutes, DurationUnits};
use crate::models::money::Money;
use crate::parity::{check_catalog, ParityConfig};
use crate::pricing;

/// NaN, infinite or oversized minute counts raise ValueError
fn duration(minutes: f64) -> PyResult<DurationMinutes> {
    DurationMinutes::from_fractional(minutes).map_err(|e| pricing_err(e.into()))
}

/// Cheapest package coverage of `duration_minutes`
///
/// Raises ValueError when the rate set has no usable rate or the duration is
/// not a finite number.
#[pyfunction]
pub fn quote_duration(
    py: Python<'_>,
    rate_set: &Bound<'_, PyDict>,
    duration_minutes: f64,
) -> PyResult<Py<PyDict>> {
    let rate_set = parse_rate_set(rate_set)?;
    let quote = pricing::quote(&rate_set, duration(duration_minutes)?, None).map_err(pricing_err)?;
    quote_to_py(py, &quote)
}

/// Quote a catalog product, honouring its duration bounds
#[pyfunction]
pub fn quote_product(
    py: Python<'_>,
    product: &Bound<'_, PyDict>,
    duration_minutes: f64,
) -> PyResult<Py<PyDict>> {
    let product = parse_product(product)?;
    let quote = pricing::quote_product(&product, duration(duration_minutes)?).map_err(pricing_err)?;
    quote_to_py(py, &quote)
}

/// Legacy threshold-discount cost
#[pyfunction]
pub fn legacy_cost(base_price: f64, tiers: &Bound<'_, PyList>, duration_units: u32) -> PyResult<f64> {
    let base_price = Money::from_decimal(base_price).map_err(|e| pricing_err(e.into()))?;
    let tiers = parse_legacy_tiers(tiers)?;
    Ok(pricing::legacy_cost(base_price, &tiers, DurationUnits::new(duration_units)).to_decimal())
}

/// Parity sweep over a list of product dicts
///
/// The GIL is released while products are checked.
#[pyfunction]
#[pyo3(signature = (products, config=None))]
pub fn check_parity(
    py: Python<'_>,
    products: &Bound<'_, PyList>,
    config: Option<&Bound<'_, PyDict>>,
) -> PyResult<Py<PyDict>> {
    let products = products
        .iter()
        .map(|item| parse_product(item.downcast::<PyDict>()?))
        .collect::<PyResult<Vec<_>>>()?;
    let config = match config {
        Some(dict) => parse_parity_config(dict)?,
        None => ParityConfig::default(),
    };

    let report = py
        .allow_threads(|| check_catalog(&products, &config))
        .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))?;
    parity_report_to_py(py, &report)
}
