//! JSON wire frames exchanged over the push channel.
//!
//! Every server frame carries `type`, `businessId`, and `timestamp`; the
//! remaining fields are frame-specific and flattened into the same object.

use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Frame type for a newly ingested order pushed to merchant connections.
pub const FRAME_NEW_ORDER: &str = "NEW_ORDER";

/// Frame type for a client-initiated application-level ping.
pub const FRAME_PING: &str = "PING";

/// Frame type for the server's reply to a [`FRAME_PING`].
pub const FRAME_PONG: &str = "PONG";

/// A server-to-client push frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushFrame {
    #[serde(rename = "type")]
    pub frame_type: String,
    pub business_id: String,
    pub timestamp: Timestamp,
    #[serde(flatten)]
    pub payload: serde_json::Value,
}

impl PushFrame {
    fn new(frame_type: &str, business_id: &str, payload: serde_json::Value) -> Self {
        Self {
            frame_type: frame_type.to_string(),
            business_id: business_id.to_string(),
            timestamp: chrono::Utc::now(),
            payload,
        }
    }

    /// Build a `NEW_ORDER` frame carrying the serialized order under `order`.
    pub fn new_order(business_id: &str, order: serde_json::Value) -> Self {
        Self::new(
            FRAME_NEW_ORDER,
            business_id,
            serde_json::json!({ "order": order }),
        )
    }

    /// Build the `PONG` reply to a client ping.
    pub fn pong(business_id: &str) -> Self {
        Self::new(FRAME_PONG, business_id, serde_json::json!({}))
    }
}

/// A client-to-server frame (only pings are recognized today; anything else
/// is ignored by the socket loop).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFrame {
    #[serde(rename = "type")]
    pub frame_type: String,
    #[serde(default)]
    pub business_id: Option<String>,
}
