use std::sync::Arc;

use roofwatch_core::stores::{AlarmStore, ConfigStore, ConstructionStore, MetricStore};
use roofwatch_db::DbPool;

use crate::config::ServerConfig;
use crate::engine::{AlarmEngine, EvaluationEngine, FusionEngine};
use crate::notifications::NotificationDispatcher;
use crate::ws::WsManager;

/// The store ports the engines are wired to.
#[derive(Clone)]
pub struct Stores {
    pub config: Arc<dyn ConfigStore>,
    pub metrics: Arc<dyn MetricStore>,
    pub alarms: Arc<dyn AlarmStore>,
    pub constructions: Arc<dyn ConstructionStore>,
}

impl Stores {
    /// Use one backing store for every port.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: ConfigStore + MetricStore + AlarmStore + ConstructionStore + 'static,
    {
        Self {
            config: store.clone(),
            metrics: store.clone(),
            alarms: store.clone(),
            constructions: store,
        }
    }
}

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Postgres pool, when running against a database. Only used for health.
    pub pool: Option<DbPool>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// WebSocket session registry.
    pub ws_manager: Arc<WsManager>,
    /// Threshold classification, alarm persistence and push.
    pub alarm_engine: Arc<AlarmEngine>,
    /// Before/after effectiveness evaluation.
    pub evaluation_engine: Arc<EvaluationEngine>,
    /// Fusion score over the newest stored samples.
    pub fusion_engine: Arc<FusionEngine>,
}

impl AppState {
    /// Wire the engines, dispatcher and session registry over `stores`.
    pub fn new(config: ServerConfig, stores: Stores, pool: Option<DbPool>) -> Self {
        let ws_manager = Arc::new(WsManager::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(Arc::clone(&ws_manager)));
        let alarm_engine = Arc::new(AlarmEngine::new(stores.config, stores.alarms, dispatcher));
        let fusion_engine = Arc::new(FusionEngine::new(Arc::clone(&stores.metrics)));
        let evaluation_engine = Arc::new(EvaluationEngine::new(stores.constructions, stores.metrics));

        Self {
            pool,
            config: Arc::new(config),
            ws_manager,
            alarm_engine,
            evaluation_engine,
            fusion_engine,
        }
    }
}
