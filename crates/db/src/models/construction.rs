//! Borehole and fracture construction rows.

use roofwatch_core::evaluation::ConstructionRecord;
use roofwatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row in `boreholes`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Borehole {
    pub id: DbId,
    pub borehole_no: String,
    pub drilling_site: Option<String>,
    pub design_length: Option<f64>,
    pub segments: Option<i32>,
    pub created_at: Timestamp,
}

/// DTO for inserting a borehole.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBorehole {
    pub borehole_no: String,
    pub drilling_site: Option<String>,
    pub design_length: Option<f64>,
    pub segments: Option<i32>,
}

/// A row in `fracture_construction_records`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConstructionRow {
    pub id: DbId,
    pub borehole_id: DbId,
    pub segment_no: Option<i32>,
    pub pressure: Option<f64>,
    pub flow_rate: Option<f64>,
    pub total_volume: Option<f64>,
    pub recorded_at: Timestamp,
}

/// DTO for inserting a construction reading.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateConstructionRecord {
    pub segment_no: Option<i32>,
    pub pressure: Option<f64>,
    pub flow_rate: Option<f64>,
    pub total_volume: Option<f64>,
    pub recorded_at: Timestamp,
}

impl From<ConstructionRow> for ConstructionRecord {
    fn from(row: ConstructionRow) -> Self {
        ConstructionRecord {
            id: row.id,
            borehole_id: row.borehole_id,
            segment_no: row.segment_no,
            pressure: row.pressure,
            flow_rate: row.flow_rate,
            total_volume: row.total_volume,
            recorded_at: row.recorded_at,
        }
    }
}
