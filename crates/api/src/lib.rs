//! Ordercast API server library.
//!
//! Exposes the building blocks (config, state, error handling, router,
//! WebSocket infrastructure, background jobs) so integration tests and the
//! binary entrypoint can both access them.

pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;
pub mod ws;
