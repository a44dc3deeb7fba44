//! FlashDrop Market order service
//!
//! Catalog, checkout and the order lifecycle for a flash-sale shop paid by
//! mobile money and confirmed by hand.
//!
//! ```text
//! flashdrop-server/src/
//! ├── api/          # HTTP routes and handlers
//! ├── auth/         # JWT, CurrentUser extractor, authorization policy
//! ├── db/           # SQLite access (sqlx)
//! ├── orders/       # order lifecycle manager and status rules
//! ├── config.rs     # environment configuration
//! ├── error.rs      # ServiceError (sqlx -> AppError bridge)
//! ├── logger.rs     # tracing subscriber setup
//! ├── state.rs      # AppState
//! ├── util.rs       # password hashing
//! └── validation.rs # input limits and checks
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logger;
pub mod orders;
pub mod state;
pub mod util;
pub mod validation;

pub use api::create_router;
pub use auth::{CurrentUser, JwtService};
pub use config::Config;
pub use orders::OrderService;
pub use state::AppState;
