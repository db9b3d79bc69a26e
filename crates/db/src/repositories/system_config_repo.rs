//! Repository for the `system_configs` key/value table.

use sqlx::PgPool;

use crate::models::system_config::SystemConfig;

/// Column list for `system_configs` queries.
const COLUMNS: &str = "config_key, config_value, description, updated_at";

/// Provides query operations for system settings.
pub struct SystemConfigRepo;

impl SystemConfigRepo {
    /// Fetch a single setting by key.
    pub async fn get(pool: &PgPool, key: &str) -> Result<Option<SystemConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM system_configs WHERE config_key = $1");
        sqlx::query_as::<_, SystemConfig>(&query)
            .bind(key)
            .fetch_optional(pool)
            .await
    }

    /// List every setting whose key starts with `prefix`.
    pub async fn list_by_prefix(
        pool: &PgPool,
        prefix: &str,
    ) -> Result<Vec<SystemConfig>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM system_configs \
             WHERE starts_with(config_key, $1) \
             ORDER BY config_key"
        );
        sqlx::query_as::<_, SystemConfig>(&query)
            .bind(prefix)
            .fetch_all(pool)
            .await
    }

    /// Insert or overwrite a single key.
    ///
    /// One `INSERT ... ON CONFLICT` statement, so concurrent readers see
    /// either the old or the new value, never a partial write.
    pub async fn upsert(
        pool: &PgPool,
        key: &str,
        value: &str,
    ) -> Result<SystemConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO system_configs (config_key, config_value) \
             VALUES ($1, $2) \
             ON CONFLICT (config_key) \
             DO UPDATE SET \
                config_value = EXCLUDED.config_value, \
                updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SystemConfig>(&query)
            .bind(key)
            .bind(value)
            .fetch_one(pool)
            .await
    }
}
