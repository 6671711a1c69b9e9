//! The seam between the dispatch engine and the live socket layer.

use async_trait::async_trait;
use ordercast_core::frames::PushFrame;

/// Failure modes of a single push attempt.
#[derive(Debug, thiserror::Error)]
pub enum PushError {
    /// The endpoint no longer exists (unknown handle or closed channel).
    /// The dispatcher reacts by unregistering the connection.
    #[error("connection is gone")]
    Gone,

    /// Any other transport-level failure. Not retried; the reaper and
    /// future reconnects are the recovery path.
    #[error("transport error: {0}")]
    Transport(String),
}

/// Pushes serialized frames to a live connection by its opaque handle.
///
/// Implemented by the API crate's WebSocket manager; tests substitute a
/// recording double.
#[async_trait]
pub trait PushTransport: Send + Sync {
    async fn push(&self, connection_id: &str, frame: &PushFrame) -> Result<(), PushError>;
}
