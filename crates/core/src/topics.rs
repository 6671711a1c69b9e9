//! Well-known subscription topic constants.
//!
//! These must match the values stored in the `subscriptions.subscription_type`
//! column and referenced by the dispatch engine and API handlers.

/// Live push of newly ingested orders to merchant connections.
pub const SUB_ORDER_UPDATE: &str = "order_update";

/// Changes to a business's "accepting orders" flag.
pub const SUB_BUSINESS_STATUS: &str = "business_status";
