use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use ordercast_core::CoreError;
use ordercast_db::models::subscription::SubscriptionKey;
use ordercast_db::repositories::SubscriptionRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_key(key: &SubscriptionKey) -> Result<(), CoreError> {
    let mut missing = Vec::new();
    if key.user_id.trim().is_empty() {
        missing.push("userId");
    }
    if key.business_id.trim().is_empty() {
        missing.push("businessId");
    }
    if key.subscription_type.trim().is_empty() {
        missing.push("subscriptionType");
    }
    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "missing fields: {}",
            missing.join(", ")
        )))
    }
}

/// POST /subscriptions -- subscribe a user to a business topic.
///
/// Idempotent: re-subscribing to an existing active key returns the same
/// row with 200 instead of 201.
async fn subscribe(
    State(state): State<AppState>,
    Json(key): Json<SubscriptionKey>,
) -> AppResult<impl IntoResponse> {
    validate_key(&key)?;

    let (subscription, created) = SubscriptionRepo::subscribe(
        &state.pool,
        &key.user_id,
        &key.business_id,
        &key.subscription_type,
    )
    .await?;

    tracing::info!(
        user_id = %subscription.user_id,
        business_id = %subscription.business_id,
        subscription_type = %subscription.subscription_type,
        created,
        "Subscription upserted"
    );

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(DataResponse { data: subscription })))
}

/// DELETE /subscriptions -- deactivate a subscription.
///
/// Always 204: deactivating a key that was never active is a no-op.
async fn unsubscribe(
    State(state): State<AppState>,
    Json(key): Json<SubscriptionKey>,
) -> AppResult<StatusCode> {
    validate_key(&key)?;

    let deactivated = SubscriptionRepo::unsubscribe(
        &state.pool,
        &key.user_id,
        &key.business_id,
        &key.subscription_type,
    )
    .await?;

    tracing::info!(
        user_id = %key.user_id,
        business_id = %key.business_id,
        subscription_type = %key.subscription_type,
        deactivated,
        "Unsubscribe processed"
    );

    Ok(StatusCode::NO_CONTENT)
}

/// GET /subscriptions/{user_id} -- all of a user's subscriptions, including
/// deactivated history.
async fn list_for_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let subscriptions = SubscriptionRepo::list_for_user(&state.pool, &user_id).await?;
    Ok(Json(DataResponse {
        data: subscriptions,
    }))
}

/// Mount subscription routes (intended for nesting under `/subscriptions`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(subscribe).delete(unsubscribe))
        .route("/{user_id}", get(list_for_user))
}
