//! Domain models for the rental pricing engine

pub mod money;
pub mod rate;

// Re-exports
pub use money::{Money, MoneyError};
pub use rate::{DurationBounds, InvalidRate, LegacyTier, LegacyTiers, ProductPricing, Rate, RateSet, TierError};
