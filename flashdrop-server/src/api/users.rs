//! User administration endpoints (ADMIN only)

use axum::Json;
use axum::extract::{Path, State};
use shared::error::{AppError, ErrorCode};
use shared::models::{User, UserUpdate, UserWithStats};

use crate::auth::{Action, CurrentUser, Resource, authorize};
use crate::db;
use crate::error::{ServiceError, is_unique_violation};
use crate::state::AppState;
use crate::util::hash_password;
use crate::validation::{
    MAX_NAME_LEN, normalize_email, validate_email, validate_password, validate_required_text,
};

use super::ApiResult;
use super::extract::AppJson;

/// GET /users
pub async fn list(
    State(state): State<AppState>,
    current: CurrentUser,
) -> ApiResult<Vec<UserWithStats>> {
    authorize(&current, Action::ManageUsers, Resource::Users).require()?;

    let users = db::users::list_with_order_counts(&state.pool)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(users))
}

/// PUT /users/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    AppJson(req): AppJson<UserUpdate>,
) -> ApiResult<User> {
    authorize(&current, Action::ManageUsers, Resource::User { user_id: id }).require()?;

    let mut row = db::users::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if let Some(name) = req.name {
        validate_required_text(&name, "name", MAX_NAME_LEN)?;
        row.name = name.trim().to_string();
    }

    if let Some(email) = req.email {
        validate_email(&email, "email")?;
        let email = normalize_email(&email);
        let owner = db::users::find_by_email(&state.pool, &email)
            .await
            .map_err(ServiceError::from)?;
        if owner.is_some_and(|u| u.id != id) {
            return Err(AppError::new(ErrorCode::EmailAlreadyExists));
        }
        row.email = email;
    }

    if let Some(password) = req.password.filter(|p| !p.is_empty()) {
        validate_password(&password)?;
        row.password_hash = hash_password(&password).map_err(|e| {
            tracing::error!("Password hashing failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    }

    let role = req.role.unwrap_or_else(|| row.role());

    let updated = db::users::update(
        &state.pool,
        id,
        &row.name,
        &row.email,
        &row.password_hash,
        role,
    )
    .await
    .map_err(|e| -> AppError {
        if is_unique_violation(&e) {
            AppError::new(ErrorCode::EmailAlreadyExists)
        } else {
            ServiceError::from(e).into()
        }
    })?;
    if !updated {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }

    tracing::info!(user_id = id, admin_id = current.id, role = role.as_str(), "User updated");

    row.role = role.as_str().to_string();
    Ok(Json(row.into_user()))
}

/// DELETE /users/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    authorize(&current, Action::ManageUsers, Resource::User { user_id: id }).require()?;

    let orders = db::users::count_orders(&state.pool, id)
        .await
        .map_err(ServiceError::from)?;
    if orders > 0 {
        return Err(AppError::new(ErrorCode::UserHasOrders).with_detail("orders", orders));
    }

    let deleted = db::users::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::UserNotFound));
    }

    tracing::info!(user_id = id, admin_id = current.id, "User deleted");
    Ok(Json(true))
}
