//! Roofwatch domain logic.
//!
//! Everything in this crate is pure: scoring, window math, threshold
//! classification and data cleaning. Storage is reached only through the
//! async ports in [`stores`], implemented by the `roofwatch-db` crate.

pub mod alarm;
pub mod error;
pub mod evaluation;
pub mod fusion;
pub mod metric;
pub mod processing;
pub mod stores;
pub mod thresholds;
pub mod types;
