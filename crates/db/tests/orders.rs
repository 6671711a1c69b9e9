//! Integration tests for order persistence and the business status store.

use sqlx::PgPool;
use ordercast_db::is_unique_violation;
use ordercast_db::models::order::NewOrder;
use ordercast_db::repositories::{BusinessStatusRepo, OrderRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_order(order_id: &str, platform_order_id: Option<&str>) -> NewOrder {
    NewOrder {
        order_id: order_id.to_string(),
        platform_order_id: platform_order_id.map(str::to_string),
        business_id: "biz-1".to_string(),
        customer_id: "cust-1".to_string(),
        customer_name: Some("Ada".to_string()),
        customer_phone: None,
        delivery_address: Some("1 Main St".to_string()),
        notes: None,
        items: serde_json::json!([
            {"productId": "p-1", "name": "Espresso", "quantity": 2, "price": 3.5}
        ]),
        total_amount: 7.0,
    }
}

// ---------------------------------------------------------------------------
// Orders
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn create_persists_with_pending_status(pool: PgPool) {
    let order = OrderRepo::create(&pool, &new_order("ord-1", None)).await.unwrap();

    assert_eq!(order.order_id, "ord-1");
    assert_eq!(order.status, "pending");
    assert_eq!(order.total_amount, 7.0);
    assert_eq!(order.items[0]["productId"], "p-1");
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_order_id_is_a_unique_violation(pool: PgPool) {
    OrderRepo::create(&pool, &new_order("ord-1", None)).await.unwrap();

    let err = OrderRepo::create(&pool, &new_order("ord-1", None)).await.unwrap_err();
    assert!(is_unique_violation(&err), "expected 23505, got: {err:?}");
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_platform_order_id_is_a_unique_violation(pool: PgPool) {
    OrderRepo::create(&pool, &new_order("ord-1", Some("plat-1")))
        .await
        .unwrap();

    let err = OrderRepo::create(&pool, &new_order("ord-2", Some("plat-1")))
        .await
        .unwrap_err();
    assert!(is_unique_violation(&err), "expected 23505, got: {err:?}");

    // Absent platform ids never collide with each other.
    OrderRepo::create(&pool, &new_order("ord-3", None)).await.unwrap();
    OrderRepo::create(&pool, &new_order("ord-4", None)).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn lookups_by_both_idempotency_keys(pool: PgPool) {
    OrderRepo::create(&pool, &new_order("ord-1", Some("plat-1")))
        .await
        .unwrap();

    let by_id = OrderRepo::find_by_order_id(&pool, "ord-1").await.unwrap();
    assert!(by_id.is_some());

    let by_platform = OrderRepo::find_by_platform_order_id(&pool, "plat-1")
        .await
        .unwrap();
    assert_eq!(by_platform.unwrap().order_id, "ord-1");

    assert!(OrderRepo::find_by_order_id(&pool, "missing").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn list_for_business_returns_newest_first(pool: PgPool) {
    OrderRepo::create(&pool, &new_order("ord-1", None)).await.unwrap();
    OrderRepo::create(&pool, &new_order("ord-2", None)).await.unwrap();

    let mut other = new_order("ord-other", None);
    other.business_id = "biz-2".to_string();
    OrderRepo::create(&pool, &other).await.unwrap();

    let orders = OrderRepo::list_for_business(&pool, "biz-1", 10).await.unwrap();
    assert_eq!(orders.len(), 2);
    assert!(orders.iter().all(|o| o.business_id == "biz-1"));
}

// ---------------------------------------------------------------------------
// Business status
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn status_defaults_to_accepting_when_never_set(pool: PgPool) {
    assert!(BusinessStatusRepo::get(&pool, "biz-1").await.unwrap());
    assert!(BusinessStatusRepo::find(&pool, "biz-1").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn set_upserts_and_bumps_the_update_timestamp(pool: PgPool) {
    let first = BusinessStatusRepo::set(&pool, "biz-1", false).await.unwrap();
    assert!(!first.accepting_orders);
    assert!(!BusinessStatusRepo::get(&pool, "biz-1").await.unwrap());

    let second = BusinessStatusRepo::set(&pool, "biz-1", true).await.unwrap();
    assert!(second.accepting_orders);
    assert!(second.last_status_update >= first.last_status_update);
    assert!(BusinessStatusRepo::get(&pool, "biz-1").await.unwrap());
}
