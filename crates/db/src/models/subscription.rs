//! Subscription registry entity models and DTOs.

use ordercast_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `subscriptions` table.
///
/// Rows are soft-deleted (`is_active = false`) so opt-out history survives.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub subscription_id: String,
    pub user_id: String,
    pub business_id: String,
    pub subscription_type: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO identifying a subscription key for create/deactivate requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionKey {
    pub user_id: String,
    pub business_id: String,
    pub subscription_type: String,
}
