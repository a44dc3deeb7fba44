//! Authentication and authorization
//!
//! - [`jwt`]: session token issue/validation
//! - [`extractor`]: `CurrentUser` axum extractor
//! - [`policy`]: who may do what to which resource

mod extractor;
pub mod jwt;
pub mod policy;

pub use jwt::{Claims, CurrentUser, JwtError, JwtService};
pub use policy::{Action, Decision, DenyReason, Resource, authorize};
