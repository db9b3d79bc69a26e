use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::background::simulator;
use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered with `WsManager` and,
/// when enabled, gets its own bounded alarm simulator.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Registers the session with `WsManager`.
///   2. Starts the session simulator if enabled.
///   3. Spawns a sender task that forwards messages from the manager channel.
///   4. Processes inbound messages on the current task.
///   5. Cleans up on disconnect (which also cancels the simulator).
async fn handle_socket(socket: WebSocket, state: AppState) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "WebSocket connected");

    let ws_manager = state.ws_manager.clone();
    let mut rx = ws_manager.add(conn_id.clone()).await;

    let sim_config = state.config.simulator;
    if sim_config.enabled {
        let task = simulator::spawn(conn_id.clone(), state.alarm_engine.clone(), sim_config);
        ws_manager.attach_simulator(&conn_id, task).await;
    }

    let (mut sink, mut stream) = socket.split();

    // Sender task: forward channel messages to the WebSocket sink.
    let sender_conn_id = conn_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %sender_conn_id, "WebSocket sink closed");
                break;
            }
        }
    });

    // Receiver loop: the push channel is one-way, inbound frames only keep
    // the session alive.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(_msg) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    let connected_at = ws_manager.remove(&conn_id).await;
    send_task.abort();
    let session_secs = connected_at.map(|at| (chrono::Utc::now() - at).num_seconds());
    tracing::info!(conn_id = %conn_id, ?session_secs, "WebSocket disconnected");
}
