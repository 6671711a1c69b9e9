//! Repository for the `business_status` table (the "accepting orders" gate).

use sqlx::PgPool;

use crate::models::business_status::BusinessStatus;

/// Flag value assumed for a business that has never set one.
const DEFAULT_ACCEPTING: bool = true;

/// Provides read/write access to the per-business gating flag.
pub struct BusinessStatusRepo;

impl BusinessStatusRepo {
    /// The stored flag, or the default (`true`) when the business has never
    /// set one.
    pub async fn get(pool: &PgPool, business_id: &str) -> Result<bool, sqlx::Error> {
        let stored: Option<bool> = sqlx::query_scalar(
            "SELECT accepting_orders FROM business_status WHERE business_id = $1",
        )
        .bind(business_id)
        .fetch_optional(pool)
        .await?;
        Ok(stored.unwrap_or(DEFAULT_ACCEPTING))
    }

    /// The full status row, if one exists.
    pub async fn find(
        pool: &PgPool,
        business_id: &str,
    ) -> Result<Option<BusinessStatus>, sqlx::Error> {
        sqlx::query_as::<_, BusinessStatus>(
            "SELECT business_id, accepting_orders, last_status_update \
             FROM business_status WHERE business_id = $1",
        )
        .bind(business_id)
        .fetch_optional(pool)
        .await
    }

    /// Upsert the flag, updating `last_status_update` in the same statement.
    pub async fn set(
        pool: &PgPool,
        business_id: &str,
        accepting: bool,
    ) -> Result<BusinessStatus, sqlx::Error> {
        sqlx::query_as::<_, BusinessStatus>(
            "INSERT INTO business_status (business_id, accepting_orders, last_status_update) \
             VALUES ($1, $2, NOW()) \
             ON CONFLICT (business_id) \
             DO UPDATE SET accepting_orders = $2, last_status_update = NOW() \
             RETURNING business_id, accepting_orders, last_status_update",
        )
        .bind(business_id)
        .bind(accepting)
        .fetch_one(pool)
        .await
    }
}
