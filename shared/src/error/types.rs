//! Error type and the JSON error body returned to clients

use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// This is the primary error type of the service, providing:
/// - Standardized error codes via [`ErrorCode`]
/// - Human-readable messages
/// - Optional structured details (offending product, field name, ...)
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Get the HTTP status code for this error
    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    // ==================== Convenience constructors ====================

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    /// Create a not authenticated error
    pub fn not_authenticated() -> Self {
        Self::new(ErrorCode::NotAuthenticated)
    }

    /// Create a permission denied error with the default message
    pub fn forbidden() -> Self {
        Self::new(ErrorCode::PermissionDenied)
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PermissionDenied, msg)
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    /// Create an invalid token error
    pub fn invalid_token(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::TokenInvalid, msg)
    }

    /// Create a token expired error
    pub fn token_expired() -> Self {
        Self::new(ErrorCode::TokenExpired)
    }

    /// Create an invalid credentials error
    pub fn invalid_credentials() -> Self {
        Self::new(ErrorCode::InvalidCredentials)
    }

    /// Order is not in a state that allows the requested transition
    pub fn order_not_pending(status: impl Into<String>) -> Self {
        let s = status.into();
        Self::new(ErrorCode::OrderNotPending).with_detail("status", s)
    }

    /// Not enough stock for a product
    pub fn insufficient_stock(
        product_id: i64,
        product_name: &str,
        requested: i64,
        available: i64,
    ) -> Self {
        Self::with_message(
            ErrorCode::InsufficientStock,
            format!("Produit {product_name} non disponible en quantité suffisante"),
        )
        .with_detail("product_id", product_id)
        .with_detail("requested", requested)
        .with_detail("available", available)
    }

    /// Referenced product does not exist (reported as a stock problem at checkout)
    pub fn unknown_product(product_id: i64) -> Self {
        Self::with_message(
            ErrorCode::InsufficientStock,
            "Produit inconnu non disponible en quantité suffisante",
        )
        .with_detail("product_id", product_id)
    }
}

/// JSON body of every error response: `{ "error": "...", "code": n }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub error: String,
    /// Numeric error code
    pub code: u16,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl From<&AppError> for ErrorBody {
    fn from(err: &AppError) -> Self {
        Self {
            error: err.message.clone(),
            code: err.code.code(),
            details: err.details.clone(),
        }
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

// ===== Axum Integration =====

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::Json;

        let status = self.http_status();
        let body = ErrorBody::from(&self);

        if matches!(self.code.category(), super::category::ErrorCategory::System) {
            tracing::error!(
                code = %self.code,
                message = %self.message,
                "System error occurred"
            );
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderNotFound);
        assert_eq!(err.code, ErrorCode::OrderNotFound);
        assert_eq!(err.message, "Commande non trouvée");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::validation("Email invalide")
            .with_detail("field", "customerEmail")
            .with_detail("reason", "format");

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "customerEmail");
        assert_eq!(details.get("reason").unwrap(), "format");
    }

    #[test]
    fn test_insufficient_stock_names_product() {
        let err = AppError::insufficient_stock(7, "Ventilateur", 3, 2);
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert!(err.message.contains("Ventilateur"));
        let details = err.details.unwrap();
        assert_eq!(details.get("product_id").unwrap(), 7);
        assert_eq!(details.get("requested").unwrap(), 3);
        assert_eq!(details.get("available").unwrap(), 2);
    }

    #[test]
    fn test_unknown_product_message() {
        let err = AppError::unknown_product(99);
        assert!(err.message.contains("inconnu"));
        assert_eq!(err.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::OrderNotFound, "Commande 42 introuvable");
        assert_eq!(format!("{}", err), "Commande 42 introuvable");
    }

    #[test]
    fn test_error_body_serialize() {
        let err = AppError::order_not_pending("CONFIRMED");
        let json = serde_json::to_value(ErrorBody::from(&err)).unwrap();
        assert_eq!(json["error"], "Cette commande n'est plus en attente");
        assert_eq!(json["code"], 4002);
        assert_eq!(json["details"]["status"], "CONFIRMED");
    }

    #[test]
    fn test_error_body_omits_empty_details() {
        let err = AppError::forbidden();
        let json = serde_json::to_string(&ErrorBody::from(&err)).unwrap();
        assert!(!json.contains("details"));
        assert!(json.contains("\"code\":2001"));
    }
}
