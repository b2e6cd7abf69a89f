//! Python bindings (feature `pyo3`)

pub mod pricing;
pub mod types;
