//! Connection registry entity model.

use ordercast_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `connections` table: one push-channel session.
///
/// `is_virtual` marks synthetic/placeholder entries that must never receive
/// pushes or count as "online"; the reaper removes them.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection {
    pub connection_id: String,
    pub business_id: String,
    pub user_id: String,
    pub entity_type: String,
    pub is_virtual: bool,
    pub connected_at: Timestamp,
}
