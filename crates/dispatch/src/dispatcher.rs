//! Order dispatch: gate check, audience resolution, and concurrent fan-out.

use std::sync::Arc;
use std::time::Duration;

use ordercast_core::frames::PushFrame;
use ordercast_core::topics::SUB_ORDER_UPDATE;
use ordercast_core::types::EntityType;
use ordercast_db::models::connection::Connection;
use ordercast_db::models::order::Order;
use ordercast_db::repositories::{BusinessStatusRepo, ConnectionRepo, SubscriptionRepo};
use ordercast_db::DbPool;
use tokio::task::JoinSet;

use crate::transport::{PushError, PushTransport};

/// Default per-connection send deadline.
const DEFAULT_PUSH_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of one dispatch attempt.
///
/// An order is never lost because no socket was open: persistence succeeded
/// before dispatch began, so any of these outcomes is a success for the
/// submitter.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// The business had `accepting_orders = false`; no push was attempted.
    pub gated: bool,
    /// Eligible live connections at resolution time.
    pub targets: usize,
    /// Sends that completed within the deadline.
    pub delivered: usize,
    /// Dead connections unregistered after a `Gone` signal.
    pub pruned: usize,
}

enum SendResult {
    Delivered,
    Gone,
    TimedOut,
    Failed(String),
}

/// Resolves and pushes an order event to all currently eligible connections.
pub struct Dispatcher {
    pool: DbPool,
    transport: Arc<dyn PushTransport>,
    push_timeout: Duration,
}

impl Dispatcher {
    pub fn new(pool: DbPool, transport: Arc<dyn PushTransport>) -> Self {
        Self {
            pool,
            transport,
            push_timeout: DEFAULT_PUSH_TIMEOUT,
        }
    }

    /// Override the per-connection send deadline.
    pub fn with_push_timeout(mut self, push_timeout: Duration) -> Self {
        self.push_timeout = push_timeout;
        self
    }

    /// Dispatch a freshly persisted order.
    ///
    /// Store failures propagate; push failures never do. One connection's
    /// slow or dead socket cannot block delivery to its siblings: sends run
    /// concurrently, each under its own deadline, and a `Gone` signal
    /// unregisters that connection on the spot.
    pub async fn dispatch(&self, order: &Order) -> Result<DispatchOutcome, sqlx::Error> {
        let business_id = &order.business_id;

        // Gate: the order stays persisted and queryable either way.
        let accepting = BusinessStatusRepo::get(&self.pool, business_id).await?;
        if !accepting {
            tracing::info!(
                business_id = %business_id,
                order_id = %order.order_id,
                "Business not accepting orders, push gated"
            );
            return Ok(DispatchOutcome {
                gated: true,
                ..DispatchOutcome::default()
            });
        }

        let subscribers =
            SubscriptionRepo::list_active_subscribers(&self.pool, business_id, SUB_ORDER_UPDATE)
                .await?;
        let connections = ConnectionRepo::list_active(&self.pool, business_id).await?;

        let targets: Vec<Connection> = connections
            .into_iter()
            .filter(|conn| is_eligible(conn, &subscribers, business_id))
            .collect();

        if targets.is_empty() {
            tracing::debug!(
                business_id = %business_id,
                order_id = %order.order_id,
                "No eligible live connections, order remains queryable"
            );
            return Ok(DispatchOutcome::default());
        }

        let frame = PushFrame::new_order(
            business_id,
            serde_json::to_value(order).unwrap_or_else(|_| serde_json::Value::Null),
        );

        let mut sends = JoinSet::new();
        for conn in &targets {
            let transport = Arc::clone(&self.transport);
            let connection_id = conn.connection_id.clone();
            let frame = frame.clone();
            let deadline = self.push_timeout;

            sends.spawn(async move {
                let result = tokio::time::timeout(
                    deadline,
                    transport.push(&connection_id, &frame),
                )
                .await;
                let outcome = match result {
                    Ok(Ok(())) => SendResult::Delivered,
                    Ok(Err(PushError::Gone)) => SendResult::Gone,
                    Ok(Err(e)) => SendResult::Failed(e.to_string()),
                    Err(_) => SendResult::TimedOut,
                };
                (connection_id, outcome)
            });
        }

        let mut outcome = DispatchOutcome {
            targets: targets.len(),
            ..DispatchOutcome::default()
        };

        while let Some(joined) = sends.join_next().await {
            let Ok((connection_id, result)) = joined else {
                continue;
            };
            match result {
                SendResult::Delivered => outcome.delivered += 1,
                SendResult::Gone => {
                    // Self-healing: retire the dead endpoint immediately so
                    // future dispatches stop retrying it.
                    match ConnectionRepo::unregister(&self.pool, &connection_id).await {
                        Ok(_) => outcome.pruned += 1,
                        Err(e) => tracing::warn!(
                            connection_id = %connection_id,
                            error = %e,
                            "Failed to unregister dead connection"
                        ),
                    }
                }
                SendResult::TimedOut => tracing::warn!(
                    connection_id = %connection_id,
                    order_id = %order.order_id,
                    "Push timed out, abandoning this connection"
                ),
                SendResult::Failed(reason) => tracing::warn!(
                    connection_id = %connection_id,
                    order_id = %order.order_id,
                    error = %reason,
                    "Push failed, no in-place retry"
                ),
            }
        }

        tracing::info!(
            business_id = %business_id,
            order_id = %order.order_id,
            targets = outcome.targets,
            delivered = outcome.delivered,
            pruned = outcome.pruned,
            "Order dispatched"
        );

        Ok(outcome)
    }
}

/// Whether a live connection should receive pushes for a business.
///
/// Merchant connections qualify through an active subscription; a connection
/// whose `user_id` equals the `business_id` is the fallback merchant
/// identity and qualifies unconditionally.
fn is_eligible(conn: &Connection, subscribers: &[String], business_id: &str) -> bool {
    if conn.user_id == business_id {
        return true;
    }
    conn.entity_type == EntityType::Merchant.as_str()
        && subscribers.iter().any(|s| s == &conn.user_id)
}
