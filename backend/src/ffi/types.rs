//! Type conversion utilities for FFI boundary
//!
//! Converts between Python dicts/lists and the engine's Rust types.

use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::core::units::PricingUnit;
use crate::models::money::Money;
use crate::models::rate::{DurationBounds, LegacyTier, LegacyTiers, ProductPricing, Rate, RateSet};
use crate::parity::{Mismatch, ParityConfig, ParityReport, UnitCaps};
use crate::pricing::{PackageUse, PricingError, Quote};

// ========================================================================
// PyDict Extraction Helpers
// ========================================================================

/// Extract a required field from a Python dict with clear error messages.
///
/// # Errors
/// Returns PyValueError if the field is missing or has the wrong type.
fn extract_required<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<T>
where
    T: FromPyObject<'py>,
{
    dict.get_item(key)?
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!("Missing required field '{}'", key))
        })?
        .extract()
}

/// Extract an optional field; `None` values count as missing.
fn extract_optional<'py, T>(dict: &Bound<'py, PyDict>, key: &str) -> PyResult<Option<T>>
where
    T: FromPyObject<'py>,
{
    match dict.get_item(key)? {
        Some(value) if !value.is_none() => Ok(Some(value.extract()?)),
        _ => Ok(None),
    }
}

pub(crate) fn pricing_err(e: PricingError) -> PyErr {
    PyErr::new::<pyo3::exceptions::PyValueError, _>(e.to_string())
}

fn money(amount: f64) -> PyResult<Money> {
    Money::from_decimal(amount).map_err(|e| pricing_err(e.into()))
}

fn pricing_unit(name: &str) -> PyResult<PricingUnit> {
    PricingUnit::ALL
        .into_iter()
        .find(|unit| unit.as_str() == name)
        .ok_or_else(|| {
            PyErr::new::<pyo3::exceptions::PyValueError, _>(format!(
                "Unknown pricing_unit '{}' (expected hour, day or week)",
                name
            ))
        })
}

// ========================================================================
// Python → Rust
// ========================================================================

pub fn parse_rate(dict: &Bound<'_, PyDict>) -> PyResult<Rate> {
    Ok(Rate::new(
        extract_required(dict, "period_minutes")?,
        money(extract_required(dict, "price")?)?,
    ))
}

fn parse_rate_list(list: &Bound<'_, PyList>) -> PyResult<Vec<Rate>> {
    list.iter()
        .map(|item| parse_rate(item.downcast::<PyDict>()?))
        .collect()
}

/// `{"base": {...}, "tiers": [{...}, ...]}`
pub fn parse_rate_set(dict: &Bound<'_, PyDict>) -> PyResult<RateSet> {
    let base: Bound<'_, PyDict> = extract_required(dict, "base")?;
    let tiers = match extract_optional::<Bound<'_, PyList>>(dict, "tiers")? {
        Some(list) => parse_rate_list(&list)?,
        None => Vec::new(),
    };
    Ok(RateSet {
        base: parse_rate(&base)?,
        tiers,
    })
}

/// `[{"min_duration_units": 5, "discount_percent": 10.0}, ...]`
pub fn parse_legacy_tiers(list: &Bound<'_, PyList>) -> PyResult<LegacyTiers> {
    let tiers = list
        .iter()
        .map(|item| {
            let dict = item.downcast::<PyDict>()?;
            LegacyTier::new(
                extract_required(dict, "min_duration_units")?,
                extract_required(dict, "discount_percent")?,
            )
            .map_err(|e| pricing_err(e.into()))
        })
        .collect::<PyResult<Vec<_>>>()?;
    LegacyTiers::new(tiers).map_err(|e| pricing_err(e.into()))
}

pub fn parse_product(dict: &Bound<'_, PyDict>) -> PyResult<ProductPricing> {
    let unit: String = extract_required(dict, "pricing_unit")?;
    let mut product = ProductPricing::new(
        extract_required::<String>(dict, "product_id")?,
        pricing_unit(&unit)?,
        money(extract_required(dict, "base_price")?)?,
    );

    if let Some(list) = extract_optional::<Bound<'_, PyList>>(dict, "tiers")? {
        product = product.with_tiers(parse_legacy_tiers(&list)?);
    }
    if let Some(list) = extract_optional::<Bound<'_, PyList>>(dict, "package_rates")? {
        product = product.with_package_rates(parse_rate_list(&list)?);
    }
    if let Some(bounds) = extract_optional::<Bound<'_, PyDict>>(dict, "duration_bounds")? {
        product = product.with_duration_bounds(DurationBounds {
            min_minutes: extract_optional(&bounds, "min_minutes")?,
            max_minutes: extract_optional(&bounds, "max_minutes")?,
        });
    }
    Ok(product)
}

/// Missing keys keep their defaults
pub fn parse_parity_config(dict: &Bound<'_, PyDict>) -> PyResult<ParityConfig> {
    let defaults = ParityConfig::default();
    let caps = match extract_optional::<Bound<'_, PyDict>>(dict, "caps")? {
        Some(caps) => UnitCaps {
            hour: extract_optional(&caps, "hour")?.unwrap_or(defaults.caps.hour),
            day: extract_optional(&caps, "day")?.unwrap_or(defaults.caps.day),
            week: extract_optional(&caps, "week")?.unwrap_or(defaults.caps.week),
        },
        None => defaults.caps,
    };
    let threshold = match extract_optional::<f64>(dict, "threshold")? {
        Some(amount) => money(amount)?,
        None => defaults.threshold,
    };
    Ok(ParityConfig {
        threshold,
        caps,
        workers: extract_optional(dict, "workers")?,
    })
}

// ========================================================================
// Rust → Python
// ========================================================================

fn package_to_py<'py>(py: Python<'py>, package: &PackageUse) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("period_minutes", package.period_minutes)?;
    dict.set_item("unit_price", package.unit_price.to_decimal())?;
    dict.set_item("count", package.count)?;
    Ok(dict)
}

pub fn quote_to_py(py: Python<'_>, quote: &Quote) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("requested_minutes", quote.requested_minutes)?;
    dict.set_item("covered_minutes", quote.covered_minutes)?;
    dict.set_item("cost", quote.cost.to_decimal())?;

    let packages = PyList::empty_bound(py);
    for package in &quote.packages {
        packages.append(package_to_py(py, package)?)?;
    }
    dict.set_item("packages", packages)?;
    Ok(dict.unbind())
}

fn mismatch_to_py<'py>(py: Python<'py>, m: &Mismatch) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("product_id", &m.product_id)?;
    dict.set_item("duration_units", m.duration_units)?;
    dict.set_item("legacy_cost", m.legacy_cost.to_decimal())?;
    dict.set_item("rate_cost", m.rate_cost.to_decimal())?;
    dict.set_item("diff", m.diff.to_decimal())?;
    Ok(dict)
}

/// Flattened report: run metadata, mismatch rows and failures
pub fn parity_report_to_py(py: Python<'_>, report: &ParityReport) -> PyResult<Py<PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("run_id", report.run_id.to_string())?;
    dict.set_item("catalog_fingerprint", &report.catalog_fingerprint)?;

    let rows = PyList::empty_bound(py);
    for m in report.mismatches() {
        rows.append(mismatch_to_py(py, m)?)?;
    }
    dict.set_item("mismatches", rows)?;

    let failures = PyDict::new_bound(py);
    for failure in &report.failures {
        failures.set_item(&failure.product_id, &failure.error)?;
    }
    dict.set_item("failures", failures)?;

    let summary = report.summary();
    dict.set_item("products_checked", summary.products_checked)?;
    dict.set_item("durations_checked", summary.durations_checked)?;
    dict.set_item("mismatch_count", summary.mismatch_count)?;
    Ok(dict.unbind())
}
