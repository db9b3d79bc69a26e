//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` + `Serialize` entity struct matching
//! the database row, and where rows cross into the core, a conversion into
//! the matching `roofwatch_core` type.

pub mod alarm;
pub mod construction;
pub mod metric_sample;
pub mod system_config;
