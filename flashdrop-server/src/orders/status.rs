//! Order status rules
//!
//! Pure functions of `(status, expires_at, now)`; nothing here touches storage.

use shared::error::AppError;
use shared::models::OrderStatus;

/// Status an order really has at `now`
///
/// A PENDING order past its deadline is EXPIRED even if storage still says
/// PENDING. Terminal states never change.
pub fn effective_status(stored: OrderStatus, expires_at: i64, now: i64) -> OrderStatus {
    match stored {
        OrderStatus::Pending if now > expires_at => OrderStatus::Expired,
        other => other,
    }
}

/// Whether the stored status lags behind the effective one
pub fn needs_expiry(stored: OrderStatus, expires_at: i64, now: i64) -> bool {
    stored == OrderStatus::Pending && effective_status(stored, expires_at, now) == OrderStatus::Expired
}

/// Only PENDING moves, and only to a terminal state
pub fn can_transition(from: OrderStatus, to: OrderStatus) -> bool {
    from == OrderStatus::Pending && to.is_terminal()
}

/// State-conflict error unless `from -> to` is allowed
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), AppError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(AppError::order_not_pending(from.as_str()))
    }
}
