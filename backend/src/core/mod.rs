//! Core value types shared by every pricing component

pub mod units;
