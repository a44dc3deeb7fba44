//! Shared types for FlashDrop Market
//!
//! Error codes, the `AppError` type, and the wire models exchanged between
//! the order service and its clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
