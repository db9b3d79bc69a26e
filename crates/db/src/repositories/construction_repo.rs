//! Repository for `boreholes` and `fracture_construction_records`.

use roofwatch_core::types::DbId;
use sqlx::PgPool;

use crate::models::construction::{
    Borehole, ConstructionRow, CreateBorehole, CreateConstructionRecord,
};

/// Column list for `boreholes` queries.
const BOREHOLE_COLUMNS: &str = "id, borehole_no, drilling_site, design_length, segments, created_at";

/// Column list for `fracture_construction_records` queries.
const RECORD_COLUMNS: &str = "\
    id, borehole_id, segment_no, pressure, flow_rate, total_volume, recorded_at";

/// Provides query operations for boreholes and their construction logs.
pub struct ConstructionRepo;

impl ConstructionRepo {
    /// Insert a borehole.
    pub async fn create_borehole(
        pool: &PgPool,
        input: &CreateBorehole,
    ) -> Result<Borehole, sqlx::Error> {
        let query = format!(
            "INSERT INTO boreholes (borehole_no, drilling_site, design_length, segments) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {BOREHOLE_COLUMNS}"
        );
        sqlx::query_as::<_, Borehole>(&query)
            .bind(&input.borehole_no)
            .bind(&input.drilling_site)
            .bind(input.design_length)
            .bind(input.segments)
            .fetch_one(pool)
            .await
    }

    /// Whether a borehole with this id exists.
    pub async fn borehole_exists(pool: &PgPool, borehole_id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM boreholes WHERE id = $1)")
            .bind(borehole_id)
            .fetch_one(pool)
            .await
    }

    /// Append a construction reading for a borehole.
    pub async fn insert_record(
        pool: &PgPool,
        borehole_id: DbId,
        input: &CreateConstructionRecord,
    ) -> Result<ConstructionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO fracture_construction_records \
                (borehole_id, segment_no, pressure, flow_rate, total_volume, recorded_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {RECORD_COLUMNS}"
        );
        sqlx::query_as::<_, ConstructionRow>(&query)
            .bind(borehole_id)
            .bind(input.segment_no)
            .bind(input.pressure)
            .bind(input.flow_rate)
            .bind(input.total_volume)
            .bind(input.recorded_at)
            .fetch_one(pool)
            .await
    }

    /// All construction readings for a borehole, oldest first.
    pub async fn list_for_borehole(
        pool: &PgPool,
        borehole_id: DbId,
    ) -> Result<Vec<ConstructionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {RECORD_COLUMNS} FROM fracture_construction_records \
             WHERE borehole_id = $1 \
             ORDER BY recorded_at, id"
        );
        sqlx::query_as::<_, ConstructionRow>(&query)
            .bind(borehole_id)
            .fetch_all(pool)
            .await
    }
}
