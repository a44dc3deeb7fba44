use shared::models::{Role, User, UserWithStats};
use sqlx::SqlitePool;

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub created_at: i64,
}

impl UserRow {
    pub fn role(&self) -> Role {
        Role::from_db(&self.role).unwrap_or_default()
    }

    pub fn into_user(self) -> User {
        User {
            role: self.role(),
            id: self.id,
            name: self.name,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserStatsRow {
    #[sqlx(flatten)]
    user: UserRow,
    order_count: i64,
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = ?")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<UserRow>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, name, email, password_hash, role, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

pub async fn list_with_order_counts(pool: &SqlitePool) -> Result<Vec<UserWithStats>, sqlx::Error> {
    let rows: Vec<UserStatsRow> = sqlx::query_as(
        "SELECT u.*, (SELECT COUNT(*) FROM orders o WHERE o.user_id = u.id) AS order_count
         FROM users u
         ORDER BY u.created_at DESC, u.id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|r| UserWithStats {
            user: r.user.into_user(),
            order_count: r.order_count,
        })
        .collect())
}

/// Overwrite the editable columns; returns false if the user does not exist
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    name: &str,
    email: &str,
    password_hash: &str,
    role: Role,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET name = ?, email = ?, password_hash = ?, role = ? WHERE id = ?",
    )
    .bind(name)
    .bind(email)
    .bind(password_hash)
    .bind(role.as_str())
    .bind(id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn count_orders(pool: &SqlitePool, user_id: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await
}
