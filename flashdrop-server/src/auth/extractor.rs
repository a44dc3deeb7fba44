//! JWT Extractor
//!
//! Validates the bearer token on protected handlers and yields [`CurrentUser`].

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::state::AppState;

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => JwtService::extract_from_header(header)
                .ok_or_else(|| AppError::invalid_token("En-tête d'autorisation invalide"))?,
            None => {
                tracing::debug!(uri = %parts.uri, "Missing authorization header");
                return Err(AppError::not_authenticated());
            }
        };

        match state.jwt.validate_token(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims).map_err(|e| {
                    tracing::warn!(error = %e, "Malformed token claims");
                    AppError::invalid_token("Jeton d'authentification invalide")
                })?;
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(JwtError::ExpiredToken) => Err(AppError::token_expired()),
            Err(e) => {
                tracing::warn!(error = %e, uri = %parts.uri, "Token validation failed");
                Err(AppError::invalid_token("Jeton d'authentification invalide"))
            }
        }
    }
}
