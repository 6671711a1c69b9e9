//! Repository for the `orders` table.
//!
//! `order_id` (and `platform_order_id`, when present) are idempotency keys:
//! ingestion checks for prior existence before inserting, and the unique
//! indexes close the race between concurrent submissions.

use sqlx::PgPool;

use crate::models::order::{NewOrder, Order};

/// Column list for `orders` queries.
const COLUMNS: &str = "order_id, platform_order_id, business_id, customer_id, customer_name, \
                       customer_phone, delivery_address, notes, items, total_amount, status, \
                       created_at";

/// Provides persistence for ingested orders.
pub struct OrderRepo;

impl OrderRepo {
    /// Persist a validated order with `status = 'pending'`.
    pub async fn create(pool: &PgPool, order: &NewOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders (order_id, platform_order_id, business_id, customer_id, \
                                 customer_name, customer_phone, delivery_address, notes, \
                                 items, total_amount, status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending') \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(&order.order_id)
            .bind(&order.platform_order_id)
            .bind(&order.business_id)
            .bind(&order.customer_id)
            .bind(&order.customer_name)
            .bind(&order.customer_phone)
            .bind(&order.delivery_address)
            .bind(&order.notes)
            .bind(&order.items)
            .bind(order.total_amount)
            .fetch_one(pool)
            .await
    }

    /// Look up an order by its primary idempotency key.
    pub async fn find_by_order_id(
        pool: &PgPool,
        order_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE order_id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(order_id)
            .fetch_optional(pool)
            .await
    }

    /// Look up an order by the source platform's idempotency key.
    pub async fn find_by_platform_order_id(
        pool: &PgPool,
        platform_order_id: &str,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE platform_order_id = $1");
        sqlx::query_as::<_, Order>(&query)
            .bind(platform_order_id)
            .fetch_optional(pool)
            .await
    }

    /// Orders for a business, newest first.
    pub async fn list_for_business(
        pool: &PgPool,
        business_id: &str,
        limit: i64,
    ) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders \
             WHERE business_id = $1 \
             ORDER BY created_at DESC, order_id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(business_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
