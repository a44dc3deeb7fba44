use std::collections::HashMap;

use shared::models::{Order, OrderItem, OrderStatus, ProductSummary, UserSummary};
use sqlx::types::Json;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

const ORDER_SELECT: &str = "SELECT o.*, u.name AS owner_name, u.email AS owner_email
     FROM orders o JOIN users u ON u.id = o.user_id";

#[derive(Debug, sqlx::FromRow)]
pub struct OrderRow {
    pub id: i64,
    pub user_id: i64,
    pub total: i64,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub payment_ref: Option<String>,
    pub rejection_reason: Option<String>,
    pub expires_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
    pub owner_name: String,
    pub owner_email: String,
}

impl OrderRow {
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_db(&self.status).unwrap_or_default()
    }

    /// Build the API model; the owner summary is only attached when requested
    pub fn into_order(self, items: Vec<OrderItem>, with_owner: bool) -> Order {
        let user = with_owner.then(|| UserSummary {
            name: self.owner_name.clone(),
            email: self.owner_email.clone(),
        });
        Order {
            status: self.status(),
            id: self.id,
            user_id: self.user_id,
            total: self.total,
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            customer_address: self.customer_address,
            payment_ref: self.payment_ref,
            rejection_reason: self.rejection_reason,
            expires_at: self.expires_at,
            created_at: self.created_at,
            updated_at: self.updated_at,
            items,
            user,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: i64,
    order_id: i64,
    product_id: i64,
    quantity: i64,
    price: i64,
    product_name: Option<String>,
    product_images: Option<Json<Vec<String>>>,
}

impl From<OrderItemRow> for OrderItem {
    fn from(r: OrderItemRow) -> Self {
        let product = r.product_name.map(|name| ProductSummary {
            id: r.product_id,
            name,
            image: r
                .product_images
                .and_then(|Json(images)| images.into_iter().next()),
        });
        OrderItem {
            id: r.id,
            order_id: r.order_id,
            product_id: r.product_id,
            quantity: r.quantity,
            price: r.price,
            product,
        }
    }
}

pub async fn insert_order(conn: &mut SqliteConnection, order: &Order) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO orders (id, user_id, total, status, customer_name, customer_email,
             customer_phone, customer_address, payment_ref, rejection_reason, expires_at,
             created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.total)
    .bind(order.status.as_str())
    .bind(&order.customer_name)
    .bind(&order.customer_email)
    .bind(&order.customer_phone)
    .bind(&order.customer_address)
    .bind(&order.payment_ref)
    .bind(&order.rejection_reason)
    .bind(order.expires_at)
    .bind(order.created_at)
    .bind(order.updated_at)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn insert_item(conn: &mut SqliteConnection, item: &OrderItem) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, quantity, price)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(item.id)
    .bind(item.order_id)
    .bind(item.product_id)
    .bind(item.quantity)
    .bind(item.price)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<OrderRow>, sqlx::Error> {
    let sql = format!("{ORDER_SELECT} WHERE o.id = ?");
    sqlx::query_as(&sql).bind(id).fetch_optional(pool).await
}

/// Orders newest first; `owner` restricts the list to one user's orders
pub async fn list(pool: &SqlitePool, owner: Option<i64>) -> Result<Vec<OrderRow>, sqlx::Error> {
    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(ORDER_SELECT);
    if let Some(user_id) = owner {
        qb.push(" WHERE o.user_id = ").push_bind(user_id);
    }
    qb.push(" ORDER BY o.created_at DESC, o.id DESC");
    let rows = qb.build_query_as().fetch_all(pool).await?;
    Ok(rows)
}

pub async fn items_for_order(pool: &SqlitePool, order_id: i64) -> Result<Vec<OrderItem>, sqlx::Error> {
    let mut grouped = items_for_orders(pool, &[order_id]).await?;
    Ok(grouped.remove(&order_id).unwrap_or_default())
}

/// Items of several orders in one query, keyed by order id
pub async fn items_for_orders(
    pool: &SqlitePool,
    order_ids: &[i64],
) -> Result<HashMap<i64, Vec<OrderItem>>, sqlx::Error> {
    let mut grouped: HashMap<i64, Vec<OrderItem>> = HashMap::new();
    if order_ids.is_empty() {
        return Ok(grouped);
    }

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT oi.*, p.name AS product_name, p.images AS product_images
         FROM order_items oi LEFT JOIN products p ON p.id = oi.product_id
         WHERE oi.order_id IN (",
    );
    let mut ids = qb.separated(", ");
    for id in order_ids {
        ids.push_bind(*id);
    }
    qb.push(") ORDER BY oi.order_id, oi.id");

    let rows: Vec<OrderItemRow> = qb.build_query_as().fetch_all(pool).await?;
    for row in rows {
        grouped.entry(row.order_id).or_default().push(row.into());
    }
    Ok(grouped)
}

/// Items of one order as seen inside a transaction
pub async fn items_in_tx(
    conn: &mut SqliteConnection,
    order_id: i64,
) -> Result<Vec<(i64, i64)>, sqlx::Error> {
    sqlx::query_as("SELECT product_id, quantity FROM order_items WHERE order_id = ? ORDER BY product_id")
        .bind(order_id)
        .fetch_all(&mut *conn)
        .await
}

/// PENDING → EXPIRED, only once the deadline has passed
pub async fn mark_expired(pool: &SqlitePool, id: i64, now: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'EXPIRED', updated_at = ?1
         WHERE id = ?2 AND status = 'PENDING' AND expires_at < ?1",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// PENDING → REJECTED
pub async fn mark_rejected(
    pool: &SqlitePool,
    id: i64,
    reason: &str,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'REJECTED', rejection_reason = ?, updated_at = ?
         WHERE id = ? AND status = 'PENDING'",
    )
    .bind(reason)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// PENDING → CONFIRMED, inside the confirm transaction
pub async fn mark_confirmed(
    conn: &mut SqliteConnection,
    id: i64,
    payment_ref: Option<&str>,
    now: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE orders SET status = 'CONFIRMED', payment_ref = COALESCE(?, payment_ref),
             updated_at = ?
         WHERE id = ? AND status = 'PENDING'",
    )
    .bind(payment_ref)
    .bind(now)
    .bind(id)
    .execute(&mut *conn)
    .await?;
    Ok(result.rows_affected() > 0)
}
