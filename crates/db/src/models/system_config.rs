//! Key/value system settings.

use roofwatch_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row in `system_configs`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SystemConfig {
    pub config_key: String,
    pub config_value: String,
    pub description: Option<String>,
    pub updated_at: Timestamp,
}
