//! Order webhook ingestion.
//!
//! `POST /webhooks/orders` is the single entry point for upstream platforms.
//! Its response shape (`{"success": ..., ...}`) is fixed by the external
//! contract and deliberately does not use the `DataResponse` envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use ordercast_core::order::{self, OrderSubmission};
use ordercast_db::models::order::NewOrder;
use ordercast_db::repositories::OrderRepo;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for the business order listing.
const DEFAULT_ORDER_LIMIT: i64 = 50;

/// Successful webhook acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WebhookAccepted {
    success: bool,
    order_id: String,
}

/// Webhook failure body: `{"success": false, "message": ...}`.
fn webhook_failure(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(json!({ "success": false, "message": message })),
    )
        .into_response()
}

/// POST /webhooks/orders -- validate, persist, and dispatch an inbound order.
///
/// Persistence is unconditional: a business with `accepting_orders = false`
/// still gets the order stored, only the live push is gated. Duplicate
/// submissions (same `orderId` or `platformOrderId`) acknowledge the
/// existing row without a second dispatch.
pub async fn ingest_order(
    State(state): State<AppState>,
    payload: Result<Json<OrderSubmission>, JsonRejection>,
) -> Response {
    // A body that fails to deserialize still gets the contract failure
    // shape, not the extractor's default plain-text rejection.
    let Json(submission) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Order submission body rejected");
            return webhook_failure(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };

    if let Err(e) = order::validate(&submission) {
        tracing::warn!(
            business_id = %submission.business_id,
            error = %e,
            "Order submission rejected"
        );
        return webhook_failure(StatusCode::BAD_REQUEST, e.to_string());
    }

    // Idempotency: an already-known order is acknowledged, never re-dispatched.
    match find_existing(&state, &submission).await {
        Ok(Some(existing)) => {
            tracing::info!(
                order_id = %existing.order_id,
                business_id = %existing.business_id,
                "Duplicate order submission acknowledged"
            );
            return (
                StatusCode::OK,
                Json(WebhookAccepted {
                    success: true,
                    order_id: existing.order_id,
                }),
            )
                .into_response();
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(error = %e, "Order lookup failed");
            return webhook_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "order lookup failed".to_string(),
            );
        }
    }

    let order_id = submission
        .order_id
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

    let new_order = NewOrder {
        order_id: order_id.clone(),
        platform_order_id: submission.platform_order_id.clone(),
        business_id: submission.business_id.clone(),
        customer_id: submission.customer_id.clone(),
        customer_name: submission.customer_name.clone(),
        customer_phone: submission.customer_phone.clone(),
        delivery_address: submission.delivery_address.clone(),
        notes: submission.notes.clone(),
        items: serde_json::to_value(&submission.items).unwrap_or_default(),
        total_amount: submission.total_amount,
    };

    let order = match OrderRepo::create(&state.pool, &new_order).await {
        Ok(order) => order,
        // Concurrent duplicate: another submission won the insert race.
        // Acknowledge its row instead of failing the webhook.
        Err(e) if ordercast_db::is_unique_violation(&e) => {
            match find_existing(&state, &submission).await {
                Ok(Some(existing)) => {
                    tracing::info!(
                        order_id = %existing.order_id,
                        "Duplicate order insert race, acknowledging existing row"
                    );
                    return (
                        StatusCode::OK,
                        Json(WebhookAccepted {
                            success: true,
                            order_id: existing.order_id,
                        }),
                    )
                        .into_response();
                }
                _ => {
                    return webhook_failure(
                        StatusCode::CONFLICT,
                        "duplicate order".to_string(),
                    );
                }
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "Order persistence failed");
            return webhook_failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "order persistence failed".to_string(),
            );
        }
    };

    // Dispatch synchronously so per-business submission order is preserved.
    // The order is already persisted, so a failed store read here is logged
    // but never turns the webhook response into a failure.
    match state.dispatcher.dispatch(&order).await {
        Ok(outcome) => {
            tracing::debug!(
                order_id = %order.order_id,
                gated = outcome.gated,
                targets = outcome.targets,
                delivered = outcome.delivered,
                pruned = outcome.pruned,
                "Webhook dispatch complete"
            );
        }
        Err(e) => {
            tracing::error!(
                order_id = %order.order_id,
                error = %e,
                "Dispatch failed after persistence, order remains queryable"
            );
        }
    }

    (
        StatusCode::CREATED,
        Json(WebhookAccepted {
            success: true,
            order_id: order.order_id,
        }),
    )
        .into_response()
}

/// Look up an existing row by either idempotency key.
async fn find_existing(
    state: &AppState,
    submission: &OrderSubmission,
) -> Result<Option<ordercast_db::models::order::Order>, sqlx::Error> {
    if let Some(order_id) = submission.order_id.as_deref() {
        if let Some(existing) = OrderRepo::find_by_order_id(&state.pool, order_id).await? {
            return Ok(Some(existing));
        }
    }
    if let Some(platform_order_id) = submission.platform_order_id.as_deref() {
        if let Some(existing) =
            OrderRepo::find_by_platform_order_id(&state.pool, platform_order_id).await?
        {
            return Ok(Some(existing));
        }
    }
    Ok(None)
}

/// Pagination parameters for the order listing.
#[derive(Debug, Deserialize)]
pub struct ListOrdersParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/businesses/{business_id}/orders -- recent orders, newest first.
pub async fn list_business_orders(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Query(params): Query<ListOrdersParams>,
) -> AppResult<impl IntoResponse> {
    let limit = params.limit.unwrap_or(DEFAULT_ORDER_LIMIT).clamp(1, 200);
    let orders = OrderRepo::list_for_business(&state.pool, &business_id, limit).await?;
    Ok(Json(DataResponse { data: orders }))
}

/// Mount the webhook route (root-level, NOT under `/api/v1`).
pub fn webhook_router() -> Router<AppState> {
    Router::new().route("/webhooks/orders", post(ingest_order))
}
