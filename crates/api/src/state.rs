use std::sync::Arc;

use ordercast_dispatch::Dispatcher;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: ordercast_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Live WebSocket connection manager (push transport).
    pub ws_manager: Arc<WsManager>,
    /// Order dispatch engine.
    pub dispatcher: Arc<Dispatcher>,
}
