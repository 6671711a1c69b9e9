//! Integration tests for the business status endpoints: defaults, upserts,
//! and the reconciled online signal.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, get, request_json};
use ordercast_db::repositories::ConnectionRepo;
use serde_json::json;
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: unknown business defaults to accepting and online
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_business_defaults_to_accepting(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = get(app.router, "/api/v1/businesses/biz-new/status").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["businessId"], "biz-new");
    assert_eq!(json["data"]["acceptingOrders"], true);
    assert_eq!(json["data"]["online"], true);
}

// ---------------------------------------------------------------------------
// Test: PUT upserts the flag and GET reflects it
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn put_status_upserts_and_get_reflects(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = request_json(
        app.router.clone(),
        Method::PUT,
        "/api/v1/businesses/biz-1/status",
        json!({ "acceptingOrders": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["acceptingOrders"], false);

    // No live connection and the flag is off: offline.
    let response = get(app.router.clone(), "/api/v1/businesses/biz-1/status").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["acceptingOrders"], false);
    assert_eq!(json["data"]["online"], false);

    // Toggle back on.
    let response = request_json(
        app.router.clone(),
        Method::PUT,
        "/api/v1/businesses/biz-1/status",
        json!({ "acceptingOrders": true }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(app.router, "/api/v1/businesses/biz-1/status").await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["acceptingOrders"], true);
    assert_eq!(json["data"]["online"], true);
}

// ---------------------------------------------------------------------------
// Test: a live connection makes the business online despite the flag
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn live_connection_overrides_closed_flag_for_online(pool: PgPool) {
    let app = common::build_test_app(pool.clone());

    let response = request_json(
        app.router.clone(),
        Method::PUT,
        "/api/v1/businesses/biz-1/status",
        json!({ "acceptingOrders": false }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    ConnectionRepo::register(&pool, "c-1", "biz-1", "biz-1", "merchant")
        .await
        .unwrap();

    let response = get(app.router, "/api/v1/businesses/biz-1/status").await;
    let json = body_json(response).await;

    // Presence wins for the online signal; the flag stays authoritative for
    // the dispatch gate.
    assert_eq!(json["data"]["acceptingOrders"], false);
    assert_eq!(json["data"]["online"], true);
}
