//! Shared domain types for the ordercast platform.
//!
//! Pure logic only: identifier/timestamp aliases, the error taxonomy, order
//! validation, push-frame wire types, and subscription topic constants.
//! No I/O happens in this crate.

pub mod error;
pub mod frames;
pub mod order;
pub mod topics;
pub mod types;

pub use error::CoreError;
