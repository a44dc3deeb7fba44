//! Order endpoints
//!
//! Thin wrappers over [`OrderService`](crate::orders::OrderService); every
//! rule lives there.

use axum::Json;
use axum::extract::{Path, State};
use http::StatusCode;
use shared::error::AppError;
use shared::models::{ConfirmOrderRequest, Order, OrderCreate, RejectOrderRequest};
use shared::util::now_millis;

use crate::auth::CurrentUser;
use crate::state::AppState;

use super::ApiResult;
use super::extract::{AppJson, OptionalJson};

/// POST /orders
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(input): AppJson<OrderCreate>,
) -> Result<(StatusCode, Json<Order>), AppError> {
    let order = state.orders.create(&current, input, now_millis()).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

/// GET /orders
pub async fn list(State(state): State<AppState>, current: CurrentUser) -> ApiResult<Vec<Order>> {
    let orders = state.orders.list(&current, now_millis()).await?;
    Ok(Json(orders))
}

/// GET /orders/{id}
pub async fn get(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Order> {
    let order = state.orders.get(&current, id, now_millis()).await?;
    Ok(Json(order))
}

/// POST /orders/{id}/confirm
pub async fn confirm(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    OptionalJson(req): OptionalJson<ConfirmOrderRequest>,
) -> ApiResult<Order> {
    let order = state
        .orders
        .confirm(&current, id, req.payment_ref, now_millis())
        .await?;
    Ok(Json(order))
}

/// POST /orders/{id}/reject
pub async fn reject(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    OptionalJson(req): OptionalJson<RejectOrderRequest>,
) -> ApiResult<Order> {
    let order = state
        .orders
        .reject(&current, id, req.rejection_reason, now_millis())
        .await?;
    Ok(Json(order))
}
