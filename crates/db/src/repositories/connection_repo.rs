//! Repository for the `connections` table (the durable connection registry).

use ordercast_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::connection::Connection;

/// Column list for `connections` queries.
const COLUMNS: &str = "connection_id, business_id, user_id, entity_type, is_virtual, connected_at";

/// Provides registry operations for push-channel connections.
pub struct ConnectionRepo;

impl ConnectionRepo {
    /// Register a new, non-virtual connection.
    ///
    /// Fails with a unique violation (see
    /// [`is_unique_violation`](crate::is_unique_violation)) when the
    /// `connection_id` is already present.
    pub async fn register(
        pool: &PgPool,
        connection_id: &str,
        business_id: &str,
        user_id: &str,
        entity_type: &str,
    ) -> Result<Connection, sqlx::Error> {
        let query = format!(
            "INSERT INTO connections (connection_id, business_id, user_id, entity_type, is_virtual) \
             VALUES ($1, $2, $3, $4, FALSE) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(connection_id)
            .bind(business_id)
            .bind(user_id)
            .bind(entity_type)
            .fetch_one(pool)
            .await
    }

    /// Register a virtual (placeholder) entry.
    ///
    /// Virtual entries never receive pushes and never count as online; the
    /// reaper removes them on its next sweep.
    pub async fn register_virtual(
        pool: &PgPool,
        connection_id: &str,
        business_id: &str,
        user_id: &str,
        entity_type: &str,
    ) -> Result<Connection, sqlx::Error> {
        let query = format!(
            "INSERT INTO connections (connection_id, business_id, user_id, entity_type, is_virtual) \
             VALUES ($1, $2, $3, $4, TRUE) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(connection_id)
            .bind(business_id)
            .bind(user_id)
            .bind(entity_type)
            .fetch_one(pool)
            .await
    }

    /// Remove a connection by its ID.
    ///
    /// Idempotent: returns `false` (without error) when the ID is absent.
    pub async fn unregister(pool: &PgPool, connection_id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM connections WHERE connection_id = $1")
            .bind(connection_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Look up a single connection.
    pub async fn find(
        pool: &PgPool,
        connection_id: &str,
    ) -> Result<Option<Connection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM connections WHERE connection_id = $1");
        sqlx::query_as::<_, Connection>(&query)
            .bind(connection_id)
            .fetch_optional(pool)
            .await
    }

    /// List all non-virtual connections for a business, oldest first.
    pub async fn list_active(
        pool: &PgPool,
        business_id: &str,
    ) -> Result<Vec<Connection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM connections \
             WHERE business_id = $1 AND NOT is_virtual \
             ORDER BY connected_at"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(business_id)
            .fetch_all(pool)
            .await
    }

    /// Whether a business is online.
    ///
    /// True iff it has at least one non-virtual connection OR its explicit
    /// `accepting_orders` flag is true (absent flag defaults to true). The
    /// two signals live in separate stores and are reconciled here at read
    /// time, never merged into one column.
    pub async fn is_online(pool: &PgPool, business_id: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM connections WHERE business_id = $1 AND NOT is_virtual) \
             OR COALESCE((SELECT accepting_orders FROM business_status WHERE business_id = $1), TRUE)",
        )
        .bind(business_id)
        .fetch_one(pool)
        .await
    }

    /// List every virtual entry (reaper input).
    pub async fn list_virtual(pool: &PgPool) -> Result<Vec<Connection>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM connections WHERE is_virtual");
        sqlx::query_as::<_, Connection>(&query).fetch_all(pool).await
    }

    /// List non-virtual entries connected before `cutoff` (reaper input).
    pub async fn list_older_than(
        pool: &PgPool,
        cutoff: Timestamp,
    ) -> Result<Vec<Connection>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM connections \
             WHERE NOT is_virtual AND connected_at < $1"
        );
        sqlx::query_as::<_, Connection>(&query)
            .bind(cutoff)
            .fetch_all(pool)
            .await
    }

    /// Delete a connection only if it still matches the scanned identity.
    ///
    /// The composite-key match means a sweep never deletes an entry that was
    /// registered (under a reused ID) after its scan began.
    pub async fn delete_if_match(
        pool: &PgPool,
        connection_id: &str,
        business_id: &str,
        user_id: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM connections \
             WHERE connection_id = $1 AND business_id = $2 AND user_id = $3",
        )
        .bind(connection_id)
        .bind(business_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
