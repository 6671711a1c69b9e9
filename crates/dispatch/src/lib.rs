//! Dispatch engine and connection reaper.
//!
//! [`Dispatcher`] resolves "who should receive this order right now" from
//! three independently mutable stores (business status, subscriptions,
//! connections) and fans the push out to live sockets through the
//! [`PushTransport`] seam. [`reaper::sweep`] purges virtual and stale
//! registry entries.

pub mod dispatcher;
pub mod reaper;
pub mod transport;

pub use dispatcher::{DispatchOutcome, Dispatcher};
pub use reaper::{sweep, ReaperPolicy, SweepOutcome};
pub use transport::{PushError, PushTransport};
