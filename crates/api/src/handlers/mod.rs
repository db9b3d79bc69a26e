pub mod alarms;
pub mod evaluation;
pub mod processing;
