use anyhow::{Context, Result};
use rental_pricing_core_rs::ProductPricing;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Read a JSON array of products
pub fn load(path: &Path) -> Result<Vec<ProductPricing>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog {}", path.display()))?;
    let products: Vec<ProductPricing> = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse catalog {}", path.display()))?;

    debug!(path = %path.display(), products = products.len(), "catalog loaded");
    Ok(products)
}

pub fn find<'a>(products: &'a [ProductPricing], product_id: &str) -> Result<&'a ProductPricing> {
    products
        .iter()
        .find(|p| p.product_id == product_id)
        .with_context(|| format!("product '{}' not found in catalog", product_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rental_pricing_core_rs::{Money, PricingUnit};

    #[test]
    fn test_find_reports_missing_product() {
        let products = vec![ProductPricing::new("a", PricingUnit::Day, Money::from_cents(100))];
        assert!(find(&products, "a").is_ok());
        let err = find(&products, "b").unwrap_err();
        assert_eq!(err.to_string(), "product 'b' not found in catalog");
    }

    #[test]
    fn test_load_reports_path_on_missing_file() {
        let err = load(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/catalog.json"));
    }
}
