//! Data models
//!
//! Wire types shared by the server and any client. JSON uses camelCase
//! field names; all IDs are snowflake `i64` and all timestamps are Unix
//! milliseconds.

pub mod order;
pub mod product;
pub mod user;

// Re-exports
pub use order::*;
pub use product::*;
pub use user::*;
