use std::sync::Arc;

use axum::extract::ws::Message;
use roofwatch_core::alarm::AlarmEvent;
use serde::Serialize;

use crate::ws::WsManager;

/// `type` field of the push payload for a freshly persisted alarm.
pub const NEW_ALARM_MESSAGE_TYPE: &str = "new_alarm";

/// Where an alarm notification goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryTarget {
    /// Every connected session.
    Broadcast,
    /// A single session by connection id.
    Session(String),
}

#[derive(Serialize)]
struct PushMessage<'a, T: Serialize> {
    #[serde(rename = "type")]
    kind: &'a str,
    data: &'a T,
}

/// Fire-and-forget alarm delivery.
///
/// At-most-once: a missing or closed session is logged and the message is
/// dropped. Nothing is retried or queued.
pub struct NotificationDispatcher {
    ws_manager: Arc<WsManager>,
}

impl NotificationDispatcher {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Push `event` to `target`. Returns how many sessions accepted it.
    pub async fn send(&self, event: &AlarmEvent, target: &DeliveryTarget) -> usize {
        let payload = PushMessage {
            kind: NEW_ALARM_MESSAGE_TYPE,
            data: event,
        };
        let text = match serde_json::to_string(&payload) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(alarm_id = event.id, error = %e, "Failed to serialize alarm");
                return 0;
            }
        };
        let message = Message::Text(text.into());

        match target {
            DeliveryTarget::Broadcast => {
                let delivered = self.ws_manager.broadcast(message).await;
                tracing::debug!(alarm_id = event.id, delivered, "Alarm broadcast");
                delivered
            }
            DeliveryTarget::Session(conn_id) => {
                if self.ws_manager.send_to(conn_id, message).await {
                    tracing::debug!(alarm_id = event.id, conn_id = %conn_id, "Alarm pushed");
                    1
                } else {
                    tracing::warn!(
                        alarm_id = event.id,
                        conn_id = %conn_id,
                        "Session gone, alarm notification dropped"
                    );
                    0
                }
            }
        }
    }
}
