//! Health check endpoint

use axum::Json;
use axum::extract::State;
use shared::error::{AppError, ErrorCode};

use crate::db;
use crate::state::AppState;

pub async fn health_check(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    db::ping(&state.pool).await.map_err(|e| {
        tracing::error!(error = %e, "Health check: database unreachable");
        AppError::new(ErrorCode::DatabaseError)
    })?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}
