pub mod business_status;
pub mod health;
pub mod orders;
pub mod subscriptions;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /ws                                  WebSocket upgrade (merchant push channel)
///
/// /businesses/{business_id}/status     get, set accepting-orders flag
/// /businesses/{business_id}/orders     recent orders for a business (GET)
///
/// /subscriptions                       subscribe (POST), unsubscribe (DELETE)
/// /subscriptions/{user_id}             list a user's subscriptions (GET)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // WebSocket push channel.
        .route("/ws", get(ws::ws_handler))
        // Business status and order history.
        .nest("/businesses", business_status::router())
        // Subscription registry.
        .nest("/subscriptions", subscriptions::router())
}
