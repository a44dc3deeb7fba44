#![allow(dead_code)]

use flashdrop_server::auth::CurrentUser;
use flashdrop_server::{AppState, Config, db};
use shared::models::{OrderCreate, OrderItemInput, Product, Role, User};
use shared::util::{now_millis, snowflake_id};

pub const TEST_SECRET: &str = "integration-test-secret-0123456789abcdef";

/// Fresh in-memory database with migrations applied
pub async fn test_state() -> AppState {
    let pool = db::connect("sqlite::memory:", 1).await.unwrap();
    state_with_pool(pool).await
}

/// File-backed WAL database with several connections, for tests where
/// transactions must really overlap; keep the `TempDir` alive
pub async fn file_state(max_connections: u32) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("flashdrop.db").display());
    let pool = db::connect(&url, max_connections).await.unwrap();
    (state_with_pool(pool).await, dir)
}

async fn state_with_pool(pool: sqlx::SqlitePool) -> AppState {
    db::migrate(&pool).await.unwrap();
    let config = Config {
        jwt_secret: TEST_SECRET.to_string(),
        ..Config::default()
    };
    AppState::with_pool(pool, &config)
}

/// Insert a user with the given role; `password_hash` is not a real hash
/// unless one is passed in
pub async fn seed_user_with_hash(
    state: &AppState,
    name: &str,
    role: Role,
    password_hash: &str,
) -> CurrentUser {
    let id = snowflake_id();
    let email = format!("{}@example.ml", name.to_lowercase());
    db::users::create(&state.pool, id, name, &email, password_hash, role, now_millis())
        .await
        .unwrap();
    CurrentUser {
        id,
        email,
        name: name.to_string(),
        role,
    }
}

pub async fn seed_user(state: &AppState, name: &str, role: Role) -> CurrentUser {
    seed_user_with_hash(state, name, role, "not-a-hash").await
}

pub async fn seed_product(state: &AppState, name: &str, price: i64, stock: i64) -> Product {
    let now = now_millis();
    let product = Product {
        id: snowflake_id(),
        name: name.to_string(),
        description: format!("{name} en promotion"),
        long_description: None,
        price,
        original_price: None,
        category: "Électronique".to_string(),
        stock_quantity: stock,
        in_stock: stock > 0,
        images: vec![format!("/uploads/{}.jpg", name.to_lowercase())],
        features: vec![],
        warranty: None,
        delivery: None,
        installation: false,
        is_new: false,
        is_promo: true,
        created_at: now,
        updated_at: now,
    };
    db::products::create(&state.pool, &product).await.unwrap();
    product
}

pub async fn stock_of(state: &AppState, product_id: i64) -> (i64, bool) {
    let p = db::products::find_by_id(&state.pool, product_id)
        .await
        .unwrap()
        .unwrap();
    (p.stock_quantity, p.in_stock)
}

pub fn cart(items: &[(i64, i64)]) -> OrderCreate {
    OrderCreate {
        items: items
            .iter()
            .map(|&(product_id, quantity)| OrderItemInput {
                product_id,
                quantity,
            })
            .collect(),
        customer_name: "Aminata Diallo".to_string(),
        customer_email: "aminata@example.ml".to_string(),
        customer_phone: "+223 66 77 88 99".to_string(),
        customer_address: "Badalabougou, Bamako".to_string(),
    }
}

pub fn token_for(state: &AppState, user: &CurrentUser) -> String {
    state
        .jwt
        .generate_token(&User {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            created_at: 0,
        })
        .unwrap()
}
