//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods
//! that accept `&PgPool` as the first argument.

pub mod alarm_record_repo;
pub mod construction_repo;
pub mod metric_sample_repo;
pub mod system_config_repo;

pub use alarm_record_repo::AlarmRecordRepo;
pub use construction_repo::ConstructionRepo;
pub use metric_sample_repo::MetricSampleRepo;
pub use system_config_repo::SystemConfigRepo;
