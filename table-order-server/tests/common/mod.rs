#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use table_order_server::db::DbService;
use table_order_server::{Config, Server, ServerState};
use tempfile::TempDir;
use tower::ServiceExt;

/// In-memory database, temp image dir; keep the `TempDir` alive for the test
pub async fn test_state() -> (ServerState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_tests(dir.path().join("images"));
    let db = DbService::in_memory().await.unwrap();
    let state = ServerState::with_pool(config, db.pool).await.unwrap();
    (state, dir)
}

/// File-backed WAL database with a multi-connection pool
pub async fn file_state() -> (ServerState, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_tests(dir.path().join("images"));
    let url = format!("sqlite://{}", dir.path().join("orders.db").display());
    let db = DbService::new(&url).await.unwrap();
    let state = ServerState::with_pool(config, db.pool).await.unwrap();
    (state, dir)
}

pub fn app(state: &ServerState) -> Router {
    Server::with_state(state.config.clone(), state.clone()).app()
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
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
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into()))
    };
    (status, value)
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    send(app, "GET", uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", uri, Some(body)).await
}

pub async fn create_category(app: &Router, name: &str, order: i32) -> i64 {
    let (status, body) = post(app, "/api/categories", json!({ "name": name, "display_order": order })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

pub async fn create_item(app: &Router, category_id: i64, name: &str, price: i64) -> i64 {
    let (status, body) = post(
        app,
        "/api/menu-items",
        json!({ "category_id": category_id, "name": name, "price": price }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

pub async fn create_table(app: &Router, number: i32) -> i64 {
    let (status, body) = post(app, "/api/tables", json!({ "table_number": number })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

/// Two mains and a drink: 1680 + 2×1580 = 4840
pub struct Menu {
    pub table_id: i64,
    pub teriyaki: i64,
    pub ramen: i64,
    pub tea: i64,
}

pub async fn seed_menu(app: &Router) -> Menu {
    let mains = create_category(app, "Mains", 1).await;
    let drinks = create_category(app, "Drinks", 2).await;
    Menu {
        table_id: create_table(app, 4).await,
        teriyaki: create_item(app, mains, "Chicken Teriyaki", 1680).await,
        ramen: create_item(app, mains, "Miso Ramen", 1580).await,
        tea: create_item(app, drinks, "Green Tea", 300).await,
    }
}

pub async fn submit(app: &Router, table_id: i64, lines: &[(i64, i32)]) -> (StatusCode, Value) {
    let items: Vec<Value> = lines
        .iter()
        .map(|(id, qty)| json!({ "menu_item_id": id, "quantity": qty }))
        .collect();
    post(app, "/api/orders", json!({ "table_id": table_id, "items": items })).await
}
