use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use ordercast_db::models::business_status::UpdateBusinessStatus;
use ordercast_db::repositories::{BusinessStatusRepo, ConnectionRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::handlers::orders;
use crate::response::DataResponse;
use crate::state::AppState;

/// Reconciled status view: the stored flag plus the derived online signal.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessStatusView {
    pub business_id: String,
    pub accepting_orders: bool,
    pub online: bool,
}

/// GET /businesses/{business_id}/status -- reconciled read.
///
/// `acceptingOrders` is the stored flag (absent row means accepting);
/// `online` is true when the business has a live connection OR the flag is
/// on, reconciled in a single query.
async fn get_status(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let accepting_orders = BusinessStatusRepo::get(&state.pool, &business_id).await?;
    let online = ConnectionRepo::is_online(&state.pool, &business_id).await?;

    Ok(Json(DataResponse {
        data: BusinessStatusView {
            business_id,
            accepting_orders,
            online,
        },
    }))
}

/// PUT /businesses/{business_id}/status -- upsert the accepting-orders flag.
async fn set_status(
    State(state): State<AppState>,
    Path(business_id): Path<String>,
    Json(body): Json<UpdateBusinessStatus>,
) -> AppResult<impl IntoResponse> {
    let status = BusinessStatusRepo::set(&state.pool, &business_id, body.accepting_orders).await?;

    tracing::info!(
        business_id = %status.business_id,
        accepting_orders = status.accepting_orders,
        "Business status updated"
    );

    Ok(Json(DataResponse { data: status }))
}

/// Mount business routes (intended for nesting under `/businesses`).
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{business_id}/status", get(get_status).put(set_status))
        .route("/{business_id}/orders", get(orders::list_business_orders))
}
