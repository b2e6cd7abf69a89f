//! Parity checking between the legacy and package pricing models
//!
//! For each product the checker sweeps `1..=cap` pricing units and compares:
//! - **baseline**: legacy threshold-discount cost
//! - **candidate**: cheapest package coverage of the translated rate set
//!
//! Any duration where the two differ by more than the configured threshold is
//! recorded as a [`Mismatch`].
//!
//! # Why mismatches are expected
//!
//! The legacy model discounts the entire rental once a threshold is reached.
//! The package model charges the tier package for exactly the tier's length
//! and the remainder at the undiscounted base rate. The two agree at every
//! tier boundary and can diverge between boundaries. Mismatches are data for
//! the migration owner, not errors.
//!
//! # Concurrency
//!
//! Products are independent and are checked on a rayon worker pool. Results
//! are sorted by product id afterwards, so output does not depend on worker
//! count or scheduling.

pub mod report;

use crate::core::units::{DurationUnits, PricingUnit};
use crate::models::money::Money;
use crate::models::rate::ProductPricing;
use crate::pricing::legacy::{legacy_cost, translate};
use crate::pricing::normalizer::normalize;
use crate::pricing::solver::cover;
use crate::pricing::PricingError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

pub use report::{
    backfill_to_csv, catalog_fingerprint, to_csv, ParitySummary, BACKFILL_CSV_HEADER, CSV_HEADER,
};

/// Errors that abort a whole parity run
///
/// Per-product pricing failures do not abort a run; they are listed in
/// [`ParityReport::failures`].
#[derive(Debug, Error)]
pub enum ParityError {
    #[error("Catalog serialization failed: {0}")]
    SerializationError(String),

    #[error("Failed to build worker pool: {0}")]
    WorkerPool(String),
}

/// Sweep length per pricing unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitCaps {
    /// Hourly products sweep 30 days
    pub hour: u32,
    pub day: u32,
    pub week: u32,
}

impl Default for UnitCaps {
    fn default() -> Self {
        Self {
            hour: 720,
            day: 365,
            week: 52,
        }
    }
}

impl UnitCaps {
    pub fn cap_for(&self, unit: PricingUnit) -> u32 {
        match unit {
            PricingUnit::Hour => self.hour,
            PricingUnit::Day => self.day,
            PricingUnit::Week => self.week,
        }
    }
}

/// Parity run configuration
///
/// # Example
/// ```
/// use rental_pricing_core_rs::parity::ParityConfig;
///
/// let config: ParityConfig = serde_json::from_str(r#"{"caps": {"day": 30}}"#).unwrap();
/// assert_eq!(config.caps.day, 30);
/// assert_eq!(config.caps.week, 52);
/// assert_eq!(config.threshold.cents(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParityConfig {
    /// Differences strictly greater than this are reported
    pub threshold: Money,
    pub caps: UnitCaps,
    /// Worker threads; `None` uses one per CPU
    pub workers: Option<usize>,
}

impl Default for ParityConfig {
    fn default() -> Self {
        Self {
            threshold: Money::from_cents(1),
            caps: UnitCaps::default(),
            workers: None,
        }
    }
}

/// One duration where the models disagree beyond the threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mismatch {
    pub product_id: String,
    pub duration_units: u32,
    pub legacy_cost: Money,
    pub rate_cost: Money,
    /// `rate_cost - legacy_cost`; negative when packages are cheaper
    pub diff: Money,
}

/// Parity result for one product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductParity {
    pub product_id: String,
    pub pricing_unit: PricingUnit,
    pub durations_checked: u32,
    pub mismatches: Vec<Mismatch>,
    /// Sum of |diff| over all mismatches
    pub total_abs_diff: Money,
}

impl ProductParity {
    pub fn mismatch_count(&self) -> usize {
        self.mismatches.len()
    }

    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Mismatch with the largest |diff|; earliest duration wins ties
    pub fn worst(&self) -> Option<&Mismatch> {
        self.mismatches.iter().fold(None, |worst: Option<&Mismatch>, m| match worst {
            Some(w) if w.diff.abs() >= m.diff.abs() => Some(w),
            _ => Some(m),
        })
    }
}

/// Product that could not be checked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFailure {
    pub product_id: String,
    pub error: String,
}

/// Parity results for a whole catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParityReport {
    pub run_id: Uuid,
    /// SHA256 of the canonical catalog JSON
    pub catalog_fingerprint: String,
    pub config: ParityConfig,
    /// Sorted by product id
    pub products: Vec<ProductParity>,
    /// Sorted by product id
    pub failures: Vec<ProductFailure>,
}

impl ParityReport {
    /// All mismatches, product by product
    pub fn mismatches(&self) -> impl Iterator<Item = &Mismatch> {
        self.products.iter().flat_map(|p| p.mismatches.iter())
    }

    pub fn summary(&self) -> ParitySummary {
        ParitySummary::from_report(self)
    }
}

/// Compare both pricing models for one product
///
/// # Errors
/// Returns `PricingError::NoUsableRates` when the translated rate set has no
/// valid rate (e.g. a negative base price with no tiers).
///
/// # Example
/// ```
/// use rental_pricing_core_rs::{LegacyTier, LegacyTiers, Money, PricingUnit, ProductPricing};
/// use rental_pricing_core_rs::parity::{check_product, ParityConfig};
///
/// let product = ProductPricing::new("drill", PricingUnit::Day, Money::from_cents(2000))
///     .with_tiers(LegacyTiers::new(vec![LegacyTier::new(5, 10.0).unwrap()]).unwrap());
///
/// let parity = check_product(&product, &ParityConfig::default()).unwrap();
/// assert_eq!(parity.durations_checked, 365);
/// // Tier boundary agrees by construction
/// assert!(parity.mismatches.iter().all(|m| m.duration_units != 5));
/// ```
pub fn check_product(
    product: &ProductPricing,
    config: &ParityConfig,
) -> Result<ProductParity, PricingError> {
    let unit = product.pricing_unit;
    let cap = config.caps.cap_for(unit);
    let normalized = normalize(&translate(product))?;
    let threshold = config.threshold.abs();

    let mut mismatches = Vec::new();
    let mut total_abs_diff = Money::ZERO;

    for units in 1..=cap {
        let units = DurationUnits::new(units);
        let legacy = legacy_cost(product.base_price, &product.tiers, units);
        let rate = cover(units.to_minutes(unit), &normalized).cost;
        let diff = rate - legacy;

        if diff.abs() > threshold {
            total_abs_diff = total_abs_diff + diff.abs();
            mismatches.push(Mismatch {
                product_id: product.product_id.clone(),
                duration_units: units.get(),
                legacy_cost: legacy,
                rate_cost: rate,
                diff,
            });
        }
    }

    debug!(
        product_id = %product.product_id,
        durations = cap,
        mismatches = mismatches.len(),
        "product parity checked"
    );

    Ok(ProductParity {
        product_id: product.product_id.clone(),
        pricing_unit: unit,
        durations_checked: cap,
        mismatches,
        total_abs_diff,
    })
}

/// Check every product in a catalog on a worker pool
///
/// # Errors
/// Only run-level problems (fingerprinting, worker pool) are errors. Products
/// that fail to price are reported in `failures`.
pub fn check_catalog(
    products: &[ProductPricing],
    config: &ParityConfig,
) -> Result<ParityReport, ParityError> {
    let catalog_fingerprint = catalog_fingerprint(products)?;
    let run_id = Uuid::new_v4();

    info!(
        %run_id,
        products = products.len(),
        threshold = %config.threshold,
        "starting parity run"
    );

    let sweep = || -> Vec<(String, Result<ProductParity, PricingError>)> {
        products
            .par_iter()
            .map(|product| (product.product_id.clone(), check_product(product, config)))
            .collect()
    };

    let results = match config.workers {
        Some(workers) => rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| ParityError::WorkerPool(e.to_string()))?
            .install(sweep),
        None => sweep(),
    };

    let mut checked = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (product_id, result) in results {
        match result {
            Ok(parity) => checked.push(parity),
            Err(e) => failures.push(ProductFailure {
                product_id,
                error: e.to_string(),
            }),
        }
    }
    checked.sort_by(|a, b| a.product_id.cmp(&b.product_id));
    failures.sort_by(|a, b| a.product_id.cmp(&b.product_id));

    let report = ParityReport {
        run_id,
        catalog_fingerprint,
        config: config.clone(),
        products: checked,
        failures,
    };

    let summary = report.summary();
    info!(
        %run_id,
        checked = summary.products_checked,
        failed = summary.products_failed,
        mismatches = summary.mismatch_count,
        "parity run finished"
    );

    Ok(report)
}
