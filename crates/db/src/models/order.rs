//! Order entity models.

use ordercast_core::types::Timestamp;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `orders` table.
///
/// `items` is the ordered JSONB array exactly as submitted; the push frame
/// reuses this serialized form.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub order_id: String,
    pub platform_order_id: Option<String>,
    pub business_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub items: serde_json::Value,
    pub total_amount: f64,
    pub status: String,
    pub created_at: Timestamp,
}

/// Insert payload for a validated order (status is always `pending`).
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub order_id: String,
    pub platform_order_id: Option<String>,
    pub business_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub items: serde_json::Value,
    pub total_amount: f64,
}
