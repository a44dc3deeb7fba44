//! Authentication endpoints: register, login, me

use axum::Json;
use axum::extract::State;
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{AuthResponse, LoginRequest, RegisterRequest, Role, User};
use shared::util::{now_millis, snowflake_id};

use crate::auth::CurrentUser;
use crate::db;
use crate::error::{ServiceError, is_unique_violation};
use crate::state::AppState;
use crate::util::{hash_password, verify_password};
use crate::validation::{
    MAX_NAME_LEN, normalize_email, validate_email, validate_password, validate_required_text,
};

use super::ApiResult;
use super::extract::AppJson;

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    AppJson(req): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    validate_required_text(&req.name, "name", MAX_NAME_LEN)?;
    validate_email(&req.email, "email")?;
    validate_password(&req.password)?;

    let email = normalize_email(&req.email);
    let existing = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(ServiceError::from)?;
    if existing.is_some() {
        return Err(AppError::new(ErrorCode::EmailAlreadyExists));
    }

    let password_hash = hash_password(&req.password).map_err(|e| {
        tracing::error!("Password hashing failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })?;

    let user = User {
        id: snowflake_id(),
        name: req.name.trim().to_string(),
        email,
        role: Role::User,
        created_at: now_millis(),
    };

    db::users::create(
        &state.pool,
        user.id,
        &user.name,
        &user.email,
        &password_hash,
        user.role,
        user.created_at,
    )
    .await
    .map_err(|e| -> AppError {
        if is_unique_violation(&e) {
            AppError::new(ErrorCode::EmailAlreadyExists)
        } else {
            ServiceError::from(e).into()
        }
    })?;

    tracing::info!(user_id = user.id, "User registered");

    let token = issue_token(&state, &user)?;
    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = normalize_email(&req.email);
    let row = db::users::find_by_email(&state.pool, &email)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(AppError::invalid_credentials)?;

    if !verify_password(&req.password, &row.password_hash) {
        tracing::debug!(user_id = row.id, "Login failed: wrong password");
        return Err(AppError::invalid_credentials());
    }

    let user = row.into_user();
    let token = issue_token(&state, &user)?;
    tracing::info!(user_id = user.id, role = user.role.as_str(), "User logged in");

    Ok(Json(AuthResponse { token, user }))
}

/// GET /auth/me
pub async fn me(State(state): State<AppState>, current: CurrentUser) -> ApiResult<User> {
    let row = db::users::find_by_id(&state.pool, current.id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(row.into_user()))
}

fn issue_token(state: &AppState, user: &User) -> Result<String, AppError> {
    state.jwt.generate_token(user).map_err(|e| {
        tracing::error!("JWT creation failed: {e}");
        AppError::new(ErrorCode::InternalError)
    })
}
