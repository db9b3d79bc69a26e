use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use roofwatch_core::types::Timestamp;
use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// A background task bound to one session's lifetime.
pub struct SessionTask {
    pub cancel: CancellationToken,
    pub handle: JoinHandle<()>,
}

impl SessionTask {
    fn stop(&self) {
        self.cancel.cancel();
    }
}

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
    /// Alarm simulator running for this session, if any.
    pub simulator: Option<SessionTask>,
}

/// Manages all active WebSocket connections (the session registry).
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Removing a session cancels its simulator.
pub struct WsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
}

impl WsManager {
    /// Create a new, empty connection manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new connection.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink.
    pub async fn add(&self, conn_id: String) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            sender: tx,
            connected_at: chrono::Utc::now(),
            simulator: None,
        };
        if let Some(previous) = self.connections.write().await.insert(conn_id, conn) {
            if let Some(task) = previous.simulator {
                task.stop();
            }
        }
        rx
    }

    /// Bind a simulator task to a session.
    ///
    /// If the session is already gone the task is cancelled immediately and
    /// `false` is returned.
    pub async fn attach_simulator(&self, conn_id: &str, task: SessionTask) -> bool {
        let mut conns = self.connections.write().await;
        match conns.get_mut(conn_id) {
            Some(conn) => {
                if let Some(previous) = conn.simulator.replace(task) {
                    previous.stop();
                }
                true
            }
            None => {
                task.stop();
                false
            }
        }
    }

    /// Remove a connection by its ID, cancelling its simulator.
    ///
    /// Returns when the removed session connected, or `None` if it was unknown.
    pub async fn remove(&self, conn_id: &str) -> Option<Timestamp> {
        let removed = self.connections.write().await.remove(conn_id)?;
        if let Some(task) = &removed.simulator {
            task.stop();
            tracing::debug!(conn_id, "Session simulator cancelled");
        }
        Some(removed.connected_at)
    }

    /// Connection time of the longest-lived session.
    pub async fn oldest_connected_at(&self) -> Option<Timestamp> {
        self.connections
            .read()
            .await
            .values()
            .map(|conn| conn.connected_at)
            .min()
    }

    /// Send a message to one session.
    ///
    /// Returns `false` when the session is unknown or its channel is closed.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        let conns = self.connections.read().await;
        match conns.get(conn_id) {
            Some(conn) => conn.sender.send(message).is_ok(),
            None => false,
        }
    }

    /// Broadcast a message to all connected clients.
    ///
    /// Connections whose send channels are closed are skipped (they will be
    /// cleaned up on their next receive loop iteration). Returns the number
    /// of channels that accepted the message.
    pub async fn broadcast(&self, message: Message) -> usize {
        let conns = self.connections.read().await;
        conns
            .values()
            .filter(|conn| conn.sender.send(message.clone()).is_ok())
            .count()
    }

    /// Return the current number of active connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Cancel every simulator, send a Close frame to every connection, then
    /// clear the map.
    ///
    /// Used during graceful shutdown.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            if let Some(task) = &conn.simulator {
                task.stop();
            }
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }
}

impl Default for WsManager {
    fn default() -> Self {
        Self::new()
    }
}
