//! Threshold alarm engine.
//!
//! Every check reads the thresholds afresh from the config store, so an
//! operator update applies to the very next reading. A reading at or above
//! a tier boundary is persisted as an alarm and then pushed.

use std::sync::Arc;

use roofwatch_core::alarm::{AlarmEvent, AlarmLevel, NewAlarm};
use roofwatch_core::error::CoreError;
use roofwatch_core::metric::MetricType;
use roofwatch_core::stores::{AlarmStore, ConfigStore};
use roofwatch_core::thresholds::{
    classify, config_key, default_pair, parse_config_key, parse_threshold_value, ThresholdConfig,
    ThresholdPair, ThresholdTier,
};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::notifications::{DeliveryTarget, NotificationDispatcher};

/// Outcome of [`AlarmEngine::check_threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlarmCheck {
    pub triggered: bool,
    pub level: Option<AlarmLevel>,
}

impl AlarmCheck {
    pub const NOT_TRIGGERED: Self = Self {
        triggered: false,
        level: None,
    };
}

pub struct AlarmEngine {
    config_store: Arc<dyn ConfigStore>,
    alarm_store: Arc<dyn AlarmStore>,
    dispatcher: Arc<NotificationDispatcher>,
    /// Held across validate-then-write so two updates to the same pair
    /// cannot each pass against the value the other replaces.
    threshold_writes: Mutex<()>,
}

impl AlarmEngine {
    pub fn new(
        config_store: Arc<dyn ConfigStore>,
        alarm_store: Arc<dyn AlarmStore>,
        dispatcher: Arc<NotificationDispatcher>,
    ) -> Self {
        Self {
            config_store,
            alarm_store,
            dispatcher,
            threshold_writes: Mutex::new(()),
        }
    }

    /// Classify one reading and, on a tier hit, persist and push an alarm.
    ///
    /// Never fails: a store error is logged and reported as not triggered,
    /// and nothing is pushed.
    pub async fn check_threshold(
        &self,
        metric_type: MetricType,
        value: f64,
        target: DeliveryTarget,
    ) -> AlarmCheck {
        let thresholds = self.thresholds_for(metric_type).await;
        let Some((level, threshold)) = classify(value, &thresholds) else {
            return AlarmCheck::NOT_TRIGGERED;
        };

        let alarm = NewAlarm::new(metric_type, level, value, threshold);
        let event = match self.alarm_store.insert(&alarm).await {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(
                    metric_type = %metric_type,
                    level = level.name(),
                    value,
                    error = %e,
                    "Failed to persist alarm"
                );
                return AlarmCheck::NOT_TRIGGERED;
            }
        };

        tracing::info!(
            alarm_id = event.id,
            metric_type = %metric_type,
            level = level.name(),
            value,
            threshold,
            "Alarm raised"
        );
        self.dispatcher.send(&event, &target).await;

        AlarmCheck {
            triggered: true,
            level: Some(level),
        }
    }

    /// Effective thresholds for one metric.
    ///
    /// Missing keys take the built-in default. Unreadable or unparsable
    /// values, or a stored pair breaking `red > yellow >= 0`, are logged and
    /// replaced by the defaults.
    pub async fn thresholds_for(&self, metric_type: MetricType) -> ThresholdPair {
        let defaults = default_pair(metric_type);
        let mut pair = defaults;
        for tier in [ThresholdTier::Red, ThresholdTier::Yellow] {
            if let Some(value) = self.stored_threshold(metric_type, tier).await {
                pair = pair.with(tier, value);
            }
        }

        match pair.validate() {
            Ok(()) => pair,
            Err(e) => {
                tracing::warn!(
                    metric_type = %metric_type,
                    error = %e,
                    "Stored thresholds are inconsistent, using defaults"
                );
                defaults
            }
        }
    }

    async fn stored_threshold(&self, metric_type: MetricType, tier: ThresholdTier) -> Option<f64> {
        let key = config_key(metric_type, tier);
        let raw = match self.config_store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Config store read failed, using default");
                return None;
            }
        };
        match parse_threshold_value(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, raw = %raw, error = %e, "Unparsable threshold, using default");
                None
            }
        }
    }

    /// Effective thresholds for every metric type.
    pub async fn threshold_config(&self) -> ThresholdConfig {
        let mut config = ThresholdConfig::defaults();
        for metric_type in MetricType::ALL {
            let pair = self.thresholds_for(metric_type).await;
            config.0.insert(metric_type, pair);
        }
        config
    }

    /// Update one threshold boundary, e.g. `alarm.pressure.red`.
    ///
    /// The resulting pair must still satisfy `red > yellow >= 0`; otherwise
    /// nothing is written. Returns the full effective config after the write.
    pub async fn set_threshold(&self, key: &str, value: f64) -> Result<ThresholdConfig, CoreError> {
        let (metric_type, tier) = parse_config_key(key)?;
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "threshold value for '{key}' must be finite"
            )));
        }

        let guard = self.threshold_writes.lock().await;
        let updated = self.thresholds_for(metric_type).await.with(tier, value);
        updated.validate()?;

        self.config_store.set(key, &value.to_string()).await?;
        tracing::info!(key, value, "Alarm threshold updated");
        drop(guard);

        Ok(self.threshold_config().await)
    }

    /// Most recent alarms first.
    pub async fn alarm_history(&self, limit: i64) -> Result<Vec<AlarmEvent>, CoreError> {
        self.alarm_store.recent(limit).await
    }
}
