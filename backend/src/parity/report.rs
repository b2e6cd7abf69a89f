//! Parity report output
//!
//! - Catalog fingerprint (SHA256 over canonical JSON)
//! - Run summary
//! - CSV export of mismatch rows for spreadsheets and migration scripts

use crate::models::rate::ProductPricing;
use crate::parity::{Mismatch, ParityError, ParityReport};
use crate::pricing::legacy::BackfillRow;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Column order of [`to_csv`]
pub const CSV_HEADER: &str = "product_id,duration_units,legacy_cost,rate_cost,diff";

/// Column order of [`backfill_to_csv`]
pub const BACKFILL_CSV_HEADER: &str = "product_id,tier_units,period_minutes,price";

/// Totals across a parity run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParitySummary {
    pub products_checked: usize,
    pub products_failed: usize,
    pub products_with_mismatches: usize,
    pub durations_checked: u64,
    pub mismatch_count: usize,
    /// Largest |diff| in the run; earliest product and duration wins ties
    pub worst: Option<Mismatch>,
}

impl ParitySummary {
    pub fn from_report(report: &ParityReport) -> Self {
        let worst = report
            .products
            .iter()
            .filter_map(|p| p.worst())
            .fold(None, |worst: Option<&Mismatch>, m| match worst {
                Some(w) if w.diff.abs() >= m.diff.abs() => Some(w),
                _ => Some(m),
            })
            .cloned();

        Self {
            products_checked: report.products.len(),
            products_failed: report.failures.len(),
            products_with_mismatches: report.products.iter().filter(|p| !p.is_clean()).count(),
            durations_checked: report
                .products
                .iter()
                .map(|p| u64::from(p.durations_checked))
                .sum(),
            mismatch_count: report.products.iter().map(|p| p.mismatch_count()).sum(),
            worst,
        }
    }
}

/// Compute a stable SHA256 fingerprint of a catalog
///
/// Object keys are sorted before hashing, so the fingerprint only changes
/// when catalog content changes.
pub fn catalog_fingerprint(products: &[ProductPricing]) -> Result<String, ParityError> {
    let value = serde_json::to_value(products)
        .map_err(|e| ParityError::SerializationError(e.to_string()))?;
    fingerprint_value(value)
}

/// Fingerprint any JSON value
pub fn fingerprint_value(value: Value) -> Result<String, ParityError> {
    fn canonicalize(value: Value) -> Value {
        match value {
            Value::Object(map) => {
                let sorted: BTreeMap<String, Value> =
                    map.into_iter().map(|(k, v)| (k, canonicalize(v))).collect();
                Value::Object(sorted.into_iter().collect())
            }
            Value::Array(arr) => Value::Array(arr.into_iter().map(canonicalize).collect()),
            other => other,
        }
    }

    let json = serde_json::to_string(&canonicalize(value))
        .map_err(|e| ParityError::SerializationError(e.to_string()))?;

    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Render mismatch rows as CSV (header included)
///
/// # Example
/// ```
/// use rental_pricing_core_rs::parity::{to_csv, ParityConfig, ParityReport, CSV_HEADER};
///
/// let report = ParityReport {
///     run_id: uuid::Uuid::nil(),
///     catalog_fingerprint: String::new(),
///     config: ParityConfig::default(),
///     products: vec![],
///     failures: vec![],
/// };
/// assert_eq!(to_csv(&report), format!("{}\n", CSV_HEADER));
/// ```
pub fn to_csv(report: &ParityReport) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for m in report.mismatches() {
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{},{}",
            csv_field(&m.product_id),
            m.duration_units,
            m.legacy_cost,
            m.rate_cost,
            m.diff
        );
    }
    out
}

/// Render translated tier packages as CSV (header included)
pub fn backfill_to_csv(rows: &[BackfillRow]) -> String {
    let mut out = String::new();
    out.push_str(BACKFILL_CSV_HEADER);
    out.push('\n');
    for row in rows {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            csv_field(&row.product_id),
            row.tier_units,
            row.period_minutes,
            row.price
        );
    }
    out
}

/// Quote a field if it contains a separator, quote or newline
fn csv_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
