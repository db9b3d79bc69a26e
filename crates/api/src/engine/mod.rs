//! Orchestration engines.
//!
//! The numeric rules live in `roofwatch_core`; the engines here fetch their
//! inputs through the store ports and hand results on to the dispatcher.

pub mod alarm;
pub mod evaluation;
pub mod fusion;

pub use alarm::{AlarmCheck, AlarmEngine};
pub use evaluation::{EvaluationEngine, WindowComparison};
pub use fusion::{FusionEngine, FusionInput, LiveFusion};
