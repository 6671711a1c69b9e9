use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use ordercast_core::frames::{ClientFrame, PushFrame, FRAME_PING};
use ordercast_core::types::EntityType;
use ordercast_db::repositories::ConnectionRepo;
use ordercast_dispatch::PushTransport;
use serde::Deserialize;

use crate::state::AppState;
use crate::ws::manager::WsManager;

/// Query parameters required to open a push channel.
#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub business_id: String,
    pub user_id: String,
    pub entity_type: EntityType,
}

/// HTTP handler that upgrades the connection to WebSocket.
///
/// After the upgrade the connection is registered both in the durable
/// `connections` table and with the in-process `WsManager`, then managed by
/// two tasks (sender + receiver) until disconnect.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<WsParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state, params))
}

/// Manage a single WebSocket connection after upgrade.
///
/// Splits the socket into a sink (outbound) and stream (inbound), then:
///   1. Inserts the durable registry row and registers with `WsManager`.
///   2. Spawns a sender task that forwards messages from the manager channel.
///   3. Processes inbound messages on the current task (PING gets a PONG).
///   4. Cleans up both registrations on disconnect.
async fn handle_socket(socket: WebSocket, state: AppState, params: WsParams) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(
        conn_id = %conn_id,
        business_id = %params.business_id,
        user_id = %params.user_id,
        entity_type = %params.entity_type.as_str(),
        "WebSocket connected"
    );

    // Durable registry row first; without it the dispatcher cannot see this
    // connection. The ID is a fresh UUID so collisions are not expected.
    if let Err(e) = ConnectionRepo::register(
        &state.pool,
        &conn_id,
        &params.business_id,
        &params.user_id,
        params.entity_type.as_str(),
    )
    .await
    {
        if ordercast_db::is_unique_violation(&e) {
            let dup = ordercast_core::CoreError::DuplicateConnection {
                connection_id: conn_id.clone(),
            };
            tracing::warn!(error = %dup, "Connection registration rejected");
        } else {
            tracing::error!(conn_id = %conn_id, error = %e, "Connection registration failed");
        }
        let mut socket = socket;
        let _ = socket.send(Message::Close(None)).await;
        return;
    }

    // Register with the live manager and get the receiver for outbound frames.
    let mut rx = state
        .ws_manager
        .add(
            conn_id.clone(),
            params.business_id.clone(),
            params.user_id.clone(),
            params.entity_type,
        )
        .await;

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

    // Receiver loop: process inbound messages.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) => break,
            Ok(Message::Pong(_)) => {
                tracing::trace!(conn_id = %conn_id, "Pong received");
            }
            Ok(Message::Text(text)) => {
                handle_client_frame(&state.ws_manager, &conn_id, &params.business_id, &text).await;
            }
            Ok(_msg) => {}
            Err(e) => {
                tracing::debug!(conn_id = %conn_id, error = %e, "WebSocket receive error");
                break;
            }
        }
    }

    // Clean up: remove both registrations and abort the sender task.
    state.ws_manager.remove(&conn_id).await;
    if let Err(e) = ConnectionRepo::unregister(&state.pool, &conn_id).await {
        tracing::warn!(conn_id = %conn_id, error = %e, "Connection unregistration failed");
    }
    send_task.abort();
    tracing::info!(conn_id = %conn_id, "WebSocket disconnected");
}

/// Handle a single inbound text frame from the client.
///
/// Application-level `PING` frames get a `PONG` reply; anything else is
/// logged and ignored.
async fn handle_client_frame(ws_manager: &Arc<WsManager>, conn_id: &str, business_id: &str, text: &str) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(conn_id = %conn_id, error = %e, "Unparseable client frame");
            return;
        }
    };

    if frame.frame_type == FRAME_PING {
        let pong = PushFrame::pong(business_id);
        if let Err(e) = ws_manager.push(conn_id, &pong).await {
            tracing::debug!(conn_id = %conn_id, error = %e, "Pong reply failed");
        }
    } else {
        tracing::debug!(conn_id = %conn_id, frame_type = %frame.frame_type, "Ignoring client frame");
    }
}
