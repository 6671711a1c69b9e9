//! Repository for the `subscriptions` table.
//!
//! Enforces the registry invariant: at most one active subscription per
//! `(user_id, business_id, subscription_type)`. Rows are soft-deleted only.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::subscription::Subscription;

/// Column list for `subscriptions` queries.
const COLUMNS: &str = "subscription_id, user_id, business_id, subscription_type, is_active, \
                       created_at, updated_at";

/// Provides subscription registry operations.
pub struct SubscriptionRepo;

impl SubscriptionRepo {
    /// Create or return the active subscription for a key.
    ///
    /// Idempotent: an existing active row is returned unchanged with
    /// `created = false`. Otherwise any stale active row for the key is
    /// deactivated and a fresh active row inserted, inside one transaction.
    ///
    /// Two first-time subscribers can race past the row lock (there is no
    /// row to lock yet); the partial unique index rejects the losing insert
    /// and the loop re-reads the winner's committed row.
    pub async fn subscribe(
        pool: &PgPool,
        user_id: &str,
        business_id: &str,
        subscription_type: &str,
    ) -> Result<(Subscription, bool), sqlx::Error> {
        loop {
            let mut tx = pool.begin().await?;

            let existing_query = format!(
                "SELECT {COLUMNS} FROM subscriptions \
                 WHERE user_id = $1 AND business_id = $2 AND subscription_type = $3 AND is_active \
                 FOR UPDATE"
            );
            let existing = sqlx::query_as::<_, Subscription>(&existing_query)
                .bind(user_id)
                .bind(business_id)
                .bind(subscription_type)
                .fetch_optional(&mut *tx)
                .await?;

            if let Some(subscription) = existing {
                tx.commit().await?;
                return Ok((subscription, false));
            }

            // Guard against an active row appearing between the read and the
            // insert on another connection.
            sqlx::query(
                "UPDATE subscriptions \
                 SET is_active = FALSE, updated_at = NOW() \
                 WHERE user_id = $1 AND business_id = $2 AND subscription_type = $3 AND is_active",
            )
            .bind(user_id)
            .bind(business_id)
            .bind(subscription_type)
            .execute(&mut *tx)
            .await?;

            let insert_query = format!(
                "INSERT INTO subscriptions \
                 (subscription_id, user_id, business_id, subscription_type) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING {COLUMNS}"
            );
            let inserted = sqlx::query_as::<_, Subscription>(&insert_query)
                .bind(Uuid::new_v4().to_string())
                .bind(user_id)
                .bind(business_id)
                .bind(subscription_type)
                .fetch_one(&mut *tx)
                .await;

            match inserted {
                Ok(subscription) => {
                    tx.commit().await?;
                    return Ok((subscription, true));
                }
                // A concurrent subscribe won the insert race. Retry: the next
                // pass sees the committed row and returns it as not-created.
                Err(e) if crate::is_unique_violation(&e) => {
                    tx.rollback().await?;
                    continue;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Deactivate the active subscription for a key.
    ///
    /// Returns `false` (without error) when none is active.
    pub async fn unsubscribe(
        pool: &PgPool,
        user_id: &str,
        business_id: &str,
        subscription_type: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE subscriptions \
             SET is_active = FALSE, updated_at = NOW() \
             WHERE user_id = $1 AND business_id = $2 AND subscription_type = $3 AND is_active",
        )
        .bind(user_id)
        .bind(business_id)
        .bind(subscription_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// User IDs with an active subscription to a business/topic pair.
    ///
    /// Fan-out input for the dispatch engine.
    pub async fn list_active_subscribers(
        pool: &PgPool,
        business_id: &str,
        subscription_type: &str,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT user_id FROM subscriptions \
             WHERE business_id = $1 AND subscription_type = $2 AND is_active \
             ORDER BY created_at",
        )
        .bind(business_id)
        .bind(subscription_type)
        .fetch_all(pool)
        .await
    }

    /// All subscriptions for a user, active and inactive, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: &str,
    ) -> Result<Vec<Subscription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM subscriptions \
             WHERE user_id = $1 \
             ORDER BY updated_at DESC"
        );
        sqlx::query_as::<_, Subscription>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
