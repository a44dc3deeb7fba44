//! Request body extractors
//!
//! Body rejections come back in the same `{ error, code }` shape as every
//! other error instead of axum's plain-text responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use shared::error::{AppError, ErrorCode};

/// `Json<T>` with [`AppError`] rejections
pub struct AppJson<T>(pub T);

impl<S, T> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(rejection_to_error(&rejection)),
        }
    }
}

/// JSON body that may be absent: an empty body yields `T::default()`
pub struct OptionalJson<T>(pub T);

impl<S, T> FromRequest<S> for OptionalJson<T>
where
    T: DeserializeOwned + Default,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = axum::body::Bytes::from_request(req, state)
            .await
            .map_err(|e| AppError::with_message(ErrorCode::InvalidRequest, e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalJson(T::default()));
        }
        serde_json::from_slice(&bytes)
            .map(OptionalJson)
            .map_err(|e| AppError::validation(format!("Données invalides: {e}")))
    }
}

fn rejection_to_error(rejection: &JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(e) => {
            AppError::validation(format!("Données invalides: {}", e.body_text()))
        }
        JsonRejection::JsonSyntaxError(_) => {
            AppError::with_message(ErrorCode::InvalidRequest, "Corps JSON invalide")
        }
        JsonRejection::MissingJsonContentType(_) => AppError::with_message(
            ErrorCode::InvalidRequest,
            "En-tête Content-Type: application/json attendu",
        ),
        other => AppError::with_message(ErrorCode::InvalidRequest, other.body_text()),
    }
}
