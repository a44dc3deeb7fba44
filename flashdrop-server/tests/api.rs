mod common;

use axum::Router;
use axum::body::Body;
use common::{seed_product, seed_user, seed_user_with_hash, stock_of, test_state, token_for};
use flashdrop_server::create_router;
use flashdrop_server::util::hash_password;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use shared::models::Role;
use tower::util::ServiceExt;

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn checkout(product_id: i64, quantity: i64) -> Value {
    json!({
        "items": [{ "productId": product_id, "quantity": quantity }],
        "customerName": "Boubacar Coulibaly",
        "customerEmail": "boubacar@example.ml",
        "customerPhone": "+223 79 00 11 22",
        "customerAddress": "Kalaban Coura, Bamako"
    })
}

#[tokio::test]
async fn test_health() {
    let app = create_router(test_state().await);
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_orders_require_authentication() {
    let app = create_router(test_state().await);

    let (status, body) = send(&app, Method::GET, "/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, Method::GET, "/orders", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_register_login_me() {
    let app = create_router(test_state().await);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Nana", "email": "Nana@Example.ML", "password": "motdepasse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "USER");
    assert_eq!(body["user"]["email"], "nana@example.ml");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Nana", "email": "nana@example.ml", "password": "motdepasse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8002);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nana@example.ml", "password": "mauvais" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nana@example.ml", "password": "motdepasse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Nana");
}

#[tokio::test]
async fn test_register_validation() {
    let app = create_router(test_state().await);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "name": "Nana", "email": "nana@example.ml", "password": "12345" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 1005);

    let (status, _) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "nana@example.ml" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_checkout_confirm_flow() {
    let state = test_state().await;
    let user = seed_user(&state, "Client", Role::User).await;
    let manager = seed_user(&state, "Gerant", Role::Manager).await;
    let product = seed_product(&state, "Refrigerateur", 275_000, 5).await;
    let user_token = token_for(&state, &user);
    let manager_token = token_for(&state, &manager);
    let app = create_router(state.clone());

    let (status, order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(&user_token),
        Some(checkout(product.id, 5)),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["total"], 1_375_000);
    assert_eq!(order["items"][0]["price"], 275_000);
    assert_eq!(order["items"][0]["product"]["name"], "Refrigerateur");
    assert!(order.get("user").is_none());
    let id = order["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/orders/{id}"),
        Some(&manager_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Client");

    // Staff confirm without a body
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/orders/{id}/confirm"),
        Some(&manager_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CONFIRMED");
    assert_eq!(stock_of(&state, product.id).await, (0, false));

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/orders/{id}/confirm"),
        Some(&manager_token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let (status, body) = send(&app, Method::GET, "/products", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["inStock"], false);
}

#[tokio::test]
async fn test_checkout_rejects_bad_input() {
    let state = test_state().await;
    let user = seed_user(&state, "Client", Role::User).await;
    let product = seed_product(&state, "Bouilloire", 10_000, 1).await;
    let token = token_for(&state, &user);
    let app = create_router(state);

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders",
        Some(&token),
        Some(checkout(product.id, 2)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6003);
    assert!(body["error"].as_str().unwrap().contains("Bouilloire"));

    let mut short_phone = checkout(product.id, 1);
    short_phone["customerPhone"] = json!("1234");
    let (status, body) = send(&app, Method::POST, "/orders", Some(&token), Some(short_phone)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2);

    let (status, _) = send(
        &app,
        Method::POST,
        "/orders",
        Some(&token),
        Some(json!({ "items": "nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_users_order_is_forbidden() {
    let state = test_state().await;
    let owner = seed_user(&state, "Owner", Role::User).await;
    let other = seed_user(&state, "Other", Role::User).await;
    let product = seed_product(&state, "Ordinateur", 400_000, 2).await;
    let owner_token = token_for(&state, &owner);
    let other_token = token_for(&state, &other);
    let app = create_router(state);

    let (_, order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(&owner_token),
        Some(checkout(product.id, 1)),
    )
    .await;
    let id = order["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/orders/{id}"),
        Some(&other_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);

    let (status, body) = send(&app, Method::GET, "/orders", Some(&other_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 0);

    let (status, _) = send(
        &app,
        Method::GET,
        "/orders/123456789",
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reject_without_reason_is_a_validation_error() {
    let state = test_state().await;
    let user = seed_user(&state, "Client", Role::User).await;
    let admin = seed_user(&state, "Patron", Role::Admin).await;
    let product = seed_product(&state, "Imprimante", 60_000, 3).await;
    let user_token = token_for(&state, &user);
    let admin_token = token_for(&state, &admin);
    let app = create_router(state);

    let (_, order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(&user_token),
        Some(checkout(product.id, 1)),
    )
    .await;
    let id = order["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/orders/{id}/reject"),
        Some(&admin_token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4008);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/orders/{id}/reject"),
        Some(&user_token),
        Some(json!({ "rejectionReason": "Annulation" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2001);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/orders/{id}/reject"),
        Some(&admin_token),
        Some(json!({ "rejectionReason": "Paiement non reçu" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "REJECTED");
    assert_eq!(body["rejectionReason"], "Paiement non reçu");
}

#[tokio::test]
async fn test_catalog_management_is_admin_only() {
    let state = test_state().await;
    let admin = seed_user(&state, "Patron", Role::Admin).await;
    let manager = seed_user(&state, "Gerant", Role::Manager).await;
    let user = seed_user(&state, "Client", Role::User).await;
    let admin_token = token_for(&state, &admin);
    let manager_token = token_for(&state, &manager);
    let user_token = token_for(&state, &user);
    let app = create_router(state);

    let payload = json!({
        "name": "Congelateur",
        "description": "200 litres",
        "price": 180_000,
        "originalPrice": 220_000,
        "category": "Electromenager",
        "stockQuantity": 0,
        "images": ["/uploads/congelateur.jpg"],
        "isPromo": true
    });

    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(&manager_token),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, created) = send(
        &app,
        Method::POST,
        "/products",
        Some(&admin_token),
        Some(payload),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["inStock"], false);
    let id = created["id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/products/{id}"),
        Some(&admin_token),
        Some(json!({ "stockQuantity": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["inStock"], true);
    assert_eq!(updated["stockQuantity"], 4);

    let (status, list) = send(&app, Method::GET, "/products?promo=true", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (_, order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(&user_token),
        Some(checkout(id, 1)),
    )
    .await;
    assert!(order["id"].is_i64());

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/products/{id}"),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6004);

    let (status, _) = send(&app, Method::GET, &format!("/products/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_user_administration() {
    let state = test_state().await;
    let hash = hash_password("secret123").unwrap();
    let admin = seed_user_with_hash(&state, "Patron", Role::Admin, &hash).await;
    let client = seed_user(&state, "Client", Role::User).await;
    let idle = seed_user(&state, "Inactif", Role::User).await;
    let product = seed_product(&state, "Batterie", 35_000, 3).await;
    let admin_token = token_for(&state, &admin);
    let client_token = token_for(&state, &client);
    let app = create_router(state);

    send(
        &app,
        Method::POST,
        "/orders",
        Some(&client_token),
        Some(checkout(product.id, 1)),
    )
    .await;

    let (status, _) = send(&app, Method::GET, "/users", Some(&client_token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, users) = send(&app, Method::GET, "/users", Some(&admin_token), None).await;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().unwrap();
    assert_eq!(users.len(), 3);
    let client_entry = users.iter().find(|u| u["name"] == "Client").unwrap();
    assert_eq!(client_entry["orderCount"], 1);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/users/{}", admin.id),
        Some(&admin_token),
        Some(json!({ "role": "USER" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 2004);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/users/{}", client.id),
        Some(&admin_token),
        Some(json!({ "role": "MANAGER" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "MANAGER");

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/users/{}", client.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 8003);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/users/{}", idle.id),
        Some(&admin_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": admin.email, "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "ADMIN");
}
