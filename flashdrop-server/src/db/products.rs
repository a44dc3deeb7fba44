use shared::models::{Product, ProductQuery, ProductUpdate, in_stock};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

#[derive(Debug, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub long_description: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    pub category: String,
    pub stock_quantity: i64,
    pub in_stock: bool,
    pub images: Json<Vec<String>>,
    pub features: Json<Vec<String>>,
    pub warranty: Option<String>,
    pub delivery: Option<String>,
    pub installation: bool,
    pub is_new: bool,
    pub is_promo: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<ProductRow> for Product {
    fn from(r: ProductRow) -> Self {
        Product {
            id: r.id,
            name: r.name,
            description: r.description,
            long_description: r.long_description,
            price: r.price,
            original_price: r.original_price,
            category: r.category,
            stock_quantity: r.stock_quantity,
            in_stock: r.in_stock,
            images: r.images.0,
            features: r.features.0,
            warranty: r.warranty,
            delivery: r.delivery,
            installation: r.installation,
            is_new: r.is_new,
            is_promo: r.is_promo,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

/// Name, price and stock read at checkout and confirmation time
#[derive(Debug, sqlx::FromRow)]
pub struct StockRow {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub stock_quantity: i64,
    pub in_stock: bool,
}

/// Insert a full product record (`in_stock` is derived from the stock here)
pub async fn create(pool: &SqlitePool, p: &Product) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO products (id, name, description, long_description, price, original_price,
             category, stock_quantity, in_stock, images, features, warranty, delivery,
             installation, is_new, is_promo, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(p.id)
    .bind(&p.name)
    .bind(&p.description)
    .bind(&p.long_description)
    .bind(p.price)
    .bind(p.original_price)
    .bind(&p.category)
    .bind(p.stock_quantity)
    .bind(in_stock(p.stock_quantity))
    .bind(Json(&p.images))
    .bind(Json(&p.features))
    .bind(&p.warranty)
    .bind(&p.delivery)
    .bind(p.installation)
    .bind(p.is_new)
    .bind(p.is_promo)
    .bind(p.created_at)
    .bind(p.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write only the columns present in `patch`
///
/// `stock_quantity` and `in_stock` are left alone unless the patch sets the
/// stock, so an edit never overwrites a concurrent confirmation's decrement.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    patch: &ProductUpdate,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE products SET ");
    let mut set = qb.separated(", ");
    if let Some(v) = &patch.name {
        set.push("name = ").push_bind_unseparated(v);
    }
    if let Some(v) = &patch.description {
        set.push("description = ").push_bind_unseparated(v);
    }
    if let Some(v) = &patch.long_description {
        set.push("long_description = ").push_bind_unseparated(v);
    }
    if let Some(v) = patch.price {
        set.push("price = ").push_bind_unseparated(v);
    }
    if let Some(v) = patch.original_price {
        set.push("original_price = ").push_bind_unseparated(v);
    }
    if let Some(v) = &patch.category {
        set.push("category = ").push_bind_unseparated(v);
    }
    if let Some(v) = patch.stock_quantity {
        set.push("stock_quantity = ").push_bind_unseparated(v);
        set.push("in_stock = ").push_bind_unseparated(in_stock(v));
    }
    if let Some(v) = &patch.images {
        set.push("images = ").push_bind_unseparated(Json(v));
    }
    if let Some(v) = &patch.features {
        set.push("features = ").push_bind_unseparated(Json(v));
    }
    if let Some(v) = &patch.warranty {
        set.push("warranty = ").push_bind_unseparated(v);
    }
    if let Some(v) = &patch.delivery {
        set.push("delivery = ").push_bind_unseparated(v);
    }
    if let Some(v) = patch.installation {
        set.push("installation = ").push_bind_unseparated(v);
    }
    if let Some(v) = patch.is_new {
        set.push("is_new = ").push_bind_unseparated(v);
    }
    if let Some(v) = patch.is_promo {
        set.push("is_promo = ").push_bind_unseparated(v);
    }
    set.push("updated_at = ").push_bind_unseparated(now);
    qb.push(" WHERE id = ").push_bind(id);

    let result = qb.build().execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    let row: Option<ProductRow> = sqlx::query_as("SELECT * FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row.map(Product::from))
}

/// Catalog listing, newest first
pub async fn list(pool: &SqlitePool, query: &ProductQuery) -> Result<Vec<Product>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT * FROM products WHERE 1 = 1");
    if let Some(category) = &query.category {
        qb.push(" AND category = ").push_bind(category);
    }
    if let Some(promo) = query.promo {
        qb.push(" AND is_promo = ").push_bind(promo);
    }
    if let Some(new) = query.new {
        qb.push(" AND is_new = ").push_bind(new);
    }
    if let Some(stocked) = query.in_stock {
        qb.push(" AND in_stock = ").push_bind(stocked);
    }
    qb.push(" ORDER BY created_at DESC, id DESC");

    let rows: Vec<ProductRow> = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows.into_iter().map(Product::from).collect())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Number of order lines (any status) that reference the product
pub async fn count_order_items(pool: &SqlitePool, id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE product_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await
}

pub async fn find_stock(
    conn: &mut SqliteConnection,
    id: i64,
) -> Result<Option<StockRow>, sqlx::Error> {
    sqlx::query_as("SELECT id, name, price, stock_quantity, in_stock FROM products WHERE id = ?")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

/// Guarded stock decrement; returns false when the stock no longer covers `quantity`
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    id: i64,
    quantity: i64,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE products
         SET stock_quantity = stock_quantity - ?1,
             in_stock = (stock_quantity - ?1) > 0,
             updated_at = ?2
         WHERE id = ?3 AND stock_quantity >= ?1",
    )
    .bind(quantity)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
