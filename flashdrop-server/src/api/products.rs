//! Catalog endpoints
//!
//! Reads are public; writes need [`Action::ManageCatalog`].

use axum::Json;
use axum::extract::{Path, Query, State};
use http::StatusCode;
use shared::error::{AppError, ErrorCode};
use shared::models::{Product, ProductCreate, ProductQuery, ProductUpdate, in_stock};
use shared::util::{now_millis, snowflake_id};

use crate::auth::{Action, CurrentUser, Resource, authorize};
use crate::db;
use crate::error::ServiceError;
use crate::state::AppState;
use crate::validation::{
    MAX_LONG_TEXT_LEN, MAX_NAME_LEN, MAX_NOTE_LEN, MAX_URL_LEN, validate_optional_text,
    validate_required_text,
};

use super::ApiResult;
use super::extract::AppJson;

/// GET /products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> ApiResult<Vec<Product>> {
    let products = db::products::list(&state.pool, &query)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(products))
}

/// GET /products/{id}
pub async fn get(State(state): State<AppState>, Path(id): Path<i64>) -> ApiResult<Product> {
    let product = find(&state, id).await?;
    Ok(Json(product))
}

/// POST /products
pub async fn create(
    State(state): State<AppState>,
    current: CurrentUser,
    AppJson(req): AppJson<ProductCreate>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    authorize(&current, Action::ManageCatalog, Resource::Catalog).require()?;

    let now = now_millis();
    let product = Product {
        id: snowflake_id(),
        name: req.name.trim().to_string(),
        description: req.description.trim().to_string(),
        long_description: req.long_description,
        price: req.price,
        original_price: req.original_price,
        category: req.category.trim().to_string(),
        stock_quantity: req.stock_quantity,
        in_stock: in_stock(req.stock_quantity),
        images: req.images,
        features: req.features,
        warranty: req.warranty,
        delivery: req.delivery,
        installation: req.installation,
        is_new: req.is_new,
        is_promo: req.is_promo,
        created_at: now,
        updated_at: now,
    };
    validate_product(&product)?;

    db::products::create(&state.pool, &product)
        .await
        .map_err(ServiceError::from)?;

    tracing::info!(product_id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// PUT /products/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
    AppJson(req): AppJson<ProductUpdate>,
) -> ApiResult<Product> {
    authorize(&current, Action::ManageCatalog, Resource::Catalog).require()?;

    let req = normalize_update(req);
    let mut preview = find(&state, id).await?;
    apply_update(&mut preview, &req);
    validate_product(&preview)?;

    let updated = db::products::update(&state.pool, id, &req, now_millis())
        .await
        .map_err(ServiceError::from)?;
    if !updated {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }

    let product = find(&state, id).await?;
    tracing::info!(product_id = id, stock = product.stock_quantity, "Product updated");
    Ok(Json(product))
}

/// DELETE /products/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<bool> {
    authorize(&current, Action::ManageCatalog, Resource::Catalog).require()?;

    let references = db::products::count_order_items(&state.pool, id)
        .await
        .map_err(ServiceError::from)?;
    if references > 0 {
        return Err(AppError::new(ErrorCode::ProductInUse).with_detail("order_items", references));
    }

    let deleted = db::products::delete(&state.pool, id)
        .await
        .map_err(ServiceError::from)?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }

    tracing::info!(product_id = id, "Product deleted");
    Ok(Json(true))
}

async fn find(state: &AppState, id: i64) -> Result<Product, AppError> {
    db::products::find_by_id(&state.pool, id)
        .await
        .map_err(ServiceError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))
}

fn normalize_update(mut req: ProductUpdate) -> ProductUpdate {
    let trim = |v: String| v.trim().to_string();
    req.name = req.name.map(trim);
    req.description = req.description.map(trim);
    req.category = req.category.map(trim);
    req
}

/// Merge a patch into a copy of the stored row, for validation and tests
fn apply_update(product: &mut Product, req: &ProductUpdate) {
    if let Some(v) = &req.name {
        product.name = v.clone();
    }
    if let Some(v) = &req.description {
        product.description = v.clone();
    }
    if let Some(v) = &req.long_description {
        product.long_description = Some(v.clone());
    }
    if let Some(v) = req.price {
        product.price = v;
    }
    if let Some(v) = req.original_price {
        product.original_price = Some(v);
    }
    if let Some(v) = &req.category {
        product.category = v.clone();
    }
    if let Some(v) = req.stock_quantity {
        product.stock_quantity = v;
        product.in_stock = in_stock(v);
    }
    if let Some(v) = &req.images {
        product.images = v.clone();
    }
    if let Some(v) = &req.features {
        product.features = v.clone();
    }
    if let Some(v) = &req.warranty {
        product.warranty = Some(v.clone());
    }
    if let Some(v) = &req.delivery {
        product.delivery = Some(v.clone());
    }
    if let Some(v) = req.installation {
        product.installation = v;
    }
    if let Some(v) = req.is_new {
        product.is_new = v;
    }
    if let Some(v) = req.is_promo {
        product.is_promo = v;
    }
}

fn validate_product(p: &Product) -> Result<(), AppError> {
    validate_required_text(&p.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&p.description, "description", MAX_LONG_TEXT_LEN)?;
    validate_required_text(&p.category, "category", MAX_NAME_LEN)?;
    validate_optional_text(&p.long_description, "longDescription", MAX_LONG_TEXT_LEN)?;
    validate_optional_text(&p.warranty, "warranty", MAX_NOTE_LEN)?;
    validate_optional_text(&p.delivery, "delivery", MAX_NOTE_LEN)?;

    if p.price <= 0 {
        return Err(AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", "price"));
    }
    if p.original_price.is_some_and(|op| op <= 0) {
        return Err(
            AppError::new(ErrorCode::ProductInvalidPrice).with_detail("field", "originalPrice")
        );
    }
    if p.stock_quantity < 0 {
        return Err(AppError::validation("Le stock ne peut pas être négatif")
            .with_detail("field", "stockQuantity"));
    }
    if p.images.iter().any(|url| url.trim().is_empty() || url.len() > MAX_URL_LEN) {
        return Err(AppError::validation("URL d'image invalide").with_detail("field", "images"));
    }
    for feature in &p.features {
        validate_required_text(feature, "features", MAX_NAME_LEN)?;
    }
    Ok(())
}
