use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use ordercast_core::frames::PushFrame;
use ordercast_core::types::{EntityType, Timestamp};
use ordercast_dispatch::{PushError, PushTransport};
use tokio::sync::{mpsc, RwLock};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single live WebSocket connection.
pub struct WsConnection {
    /// Business the connection is scoped to.
    pub business_id: String,
    /// User that opened the connection.
    pub user_id: String,
    /// Kind of client on the other end.
    pub entity_type: EntityType,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Manages all live WebSocket connections, keyed by connection ID.
///
/// The connection IDs here match the rows in the durable `connections` table;
/// this map is the authoritative "socket is actually open right now" signal.
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application.
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
    pub async fn add(
        &self,
        conn_id: String,
        business_id: String,
        user_id: String,
        entity_type: EntityType,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        let conn = WsConnection {
            business_id,
            user_id,
            entity_type,
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        self.connections.write().await.insert(conn_id, conn);
        rx
    }

    /// Remove a connection by its ID.
    pub async fn remove(&self, conn_id: &str) {
        self.connections.write().await.remove(conn_id);
    }

    /// Whether a connection with this ID currently has a live socket.
    pub async fn contains(&self, conn_id: &str) -> bool {
        self.connections.read().await.contains_key(conn_id)
    }

    /// Snapshot of all live connection IDs.
    ///
    /// Handed to the reaper so it never deletes a registry row whose socket
    /// is still open.
    pub async fn live_connection_ids(&self) -> HashSet<String> {
        self.connections.read().await.keys().cloned().collect()
    }

    /// Find all connection IDs scoped to a given business.
    pub async fn get_by_business(&self, business_id: &str) -> Vec<String> {
        self.connections
            .read()
            .await
            .iter()
            .filter_map(|(id, conn)| {
                if conn.business_id == business_id {
                    Some(id.clone())
                } else {
                    None
                }
            })
            .collect()
    }

    /// Return the current number of live connections.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Close frame to every connection, then clear the map.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        tracing::info!(count, "Closed all WebSocket connections");
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
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

#[async_trait::async_trait]
impl PushTransport for WsManager {
    /// Deliver a frame to a single live connection as a JSON text message.
    ///
    /// A connection ID with no live socket, or a closed send channel, both
    /// report `Gone` so the dispatcher can prune the stale registry row.
    async fn push(&self, connection_id: &str, frame: &PushFrame) -> Result<(), PushError> {
        let text = serde_json::to_string(frame)
            .map_err(|e| PushError::Transport(format!("frame serialization failed: {e}")))?;

        let conns = self.connections.read().await;
        let conn = conns.get(connection_id).ok_or(PushError::Gone)?;

        conn.sender
            .send(Message::Text(text.into()))
            .map_err(|_| PushError::Gone)
    }
}
