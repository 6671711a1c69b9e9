//! Order domain types and webhook payload validation.
//!
//! [`OrderSubmission`] mirrors the inbound webhook body. [`validate`] is the
//! single gatekeeper for malformed submissions: it collects every offending
//! field so the caller gets one complete error instead of a fix-resubmit loop.

use serde::{Deserialize, Serialize};

/// Tolerance when comparing the declared total against the computed item sum.
///
/// Amounts arrive as JSON floats, so sub-cent drift from upstream rounding is
/// expected and must not reject otherwise valid orders.
pub const TOTAL_EPSILON: f64 = 0.01;

/// Lifecycle state of a persisted order.
///
/// Ingestion always persists `Pending`; later states are driven by the
/// merchant's own systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    /// The string form stored in the `orders.status` column.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

/// A single line item on an inbound order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderItem {
    /// Line subtotal: `quantity * price`.
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}

/// The JSON body of `POST /webhooks/orders`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSubmission {
    /// Idempotency key. Server-generated when absent.
    pub order_id: Option<String>,
    /// Secondary idempotency key assigned by the source platform.
    pub platform_order_id: Option<String>,
    pub business_id: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub customer_phone: Option<String>,
    pub delivery_address: Option<String>,
    pub items: Vec<OrderItem>,
    pub total_amount: f64,
    pub notes: Option<String>,
}

/// Validation failure naming every offending field of a submission.
#[derive(Debug, thiserror::Error)]
#[error("invalid order fields: {}", fields.join(", "))]
pub struct OrderValidationError {
    pub fields: Vec<String>,
}

/// Sum of all line subtotals.
pub fn computed_total(items: &[OrderItem]) -> f64 {
    items.iter().map(OrderItem::subtotal).sum()
}

/// Validate an inbound submission, collecting all offending fields.
///
/// Checks: non-empty `businessId` and `customerId`, at least one item,
/// positive quantities, non-negative prices, and `totalAmount` matching the
/// computed item sum within [`TOTAL_EPSILON`].
pub fn validate(submission: &OrderSubmission) -> Result<(), OrderValidationError> {
    let mut fields = Vec::new();

    if submission.business_id.trim().is_empty() {
        fields.push("businessId".to_string());
    }
    if submission.customer_id.trim().is_empty() {
        fields.push("customerId".to_string());
    }

    if submission.items.is_empty() {
        fields.push("items".to_string());
    } else {
        for (i, item) in submission.items.iter().enumerate() {
            if item.quantity == 0 {
                fields.push(format!("items[{i}].quantity"));
            }
            if item.price < 0.0 {
                fields.push(format!("items[{i}].price"));
            }
        }

        let computed = computed_total(&submission.items);
        if (submission.total_amount - computed).abs() > TOTAL_EPSILON {
            fields.push("totalAmount".to_string());
        }
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(OrderValidationError { fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: u32, price: f64) -> OrderItem {
        OrderItem {
            product_id: "p-1".to_string(),
            name: "Espresso".to_string(),
            quantity,
            price,
        }
    }

    fn submission(items: Vec<OrderItem>, total_amount: f64) -> OrderSubmission {
        OrderSubmission {
            order_id: None,
            platform_order_id: None,
            business_id: "biz-1".to_string(),
            customer_id: "cust-1".to_string(),
            customer_name: None,
            customer_phone: None,
            delivery_address: None,
            items,
            total_amount,
            notes: None,
        }
    }

    #[test]
    fn valid_submission_passes() {
        let sub = submission(vec![item(2, 3.50), item(1, 1.25)], 8.25);
        assert!(validate(&sub).is_ok());
    }

    #[test]
    fn total_within_epsilon_passes() {
        let sub = submission(vec![item(3, 0.10)], 0.305);
        assert!(validate(&sub).is_ok());
    }

    #[test]
    fn mismatched_total_names_the_field() {
        let sub = submission(vec![item(2, 3.50)], 10.00);
        let err = validate(&sub).unwrap_err();
        assert_eq!(err.fields, vec!["totalAmount"]);
    }

    #[test]
    fn empty_items_rejected() {
        let sub = submission(vec![], 0.0);
        let err = validate(&sub).unwrap_err();
        assert_eq!(err.fields, vec!["items"]);
    }

    #[test]
    fn all_offending_fields_are_collected() {
        let mut sub = submission(vec![item(0, -1.0)], 99.0);
        sub.business_id = String::new();
        sub.customer_id = "  ".to_string();

        let err = validate(&sub).unwrap_err();
        assert_eq!(
            err.fields,
            vec![
                "businessId",
                "customerId",
                "items[0].quantity",
                "items[0].price",
                "totalAmount",
            ]
        );
    }

    #[test]
    fn webhook_body_deserializes_from_camel_case() {
        let body = serde_json::json!({
            "orderId": "ord-1",
            "businessId": "biz-1",
            "customerId": "cust-1",
            "customerName": "Ada",
            "items": [{"productId": "p-1", "name": "Espresso", "quantity": 2, "price": 3.5}],
            "totalAmount": 7.0,
            "platformOrderId": "plat-9"
        });

        let sub: OrderSubmission = serde_json::from_value(body).unwrap();
        assert_eq!(sub.order_id.as_deref(), Some("ord-1"));
        assert_eq!(sub.platform_order_id.as_deref(), Some("plat-9"));
        assert_eq!(sub.items[0].product_id, "p-1");
        assert!(validate(&sub).is_ok());
    }

    #[test]
    fn status_round_trips_through_serde() {
        let json = serde_json::to_string(&OrderStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
        assert_eq!(OrderStatus::Pending.as_str(), "pending");
    }
}
