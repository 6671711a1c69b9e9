//! Business status entity model and DTOs.

use ordercast_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `business_status` table.
///
/// Absence of a row means the business has never toggled its flag; readers
/// treat that as accepting.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessStatus {
    pub business_id: String,
    pub accepting_orders: bool,
    pub last_status_update: Timestamp,
}

/// DTO for `PUT /businesses/{id}/status`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessStatus {
    pub accepting_orders: bool,
}
