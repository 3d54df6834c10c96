mod common;

use common::*;
use http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_health() {
    let (state, _dir) = test_state().await;
    let app = app(&state);

    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");

    let (status, body) = get(&app, "/health/detailed").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "ok");
    assert_eq!(body["checks"]["image_store"]["status"], "ok");
}

#[tokio::test]
async fn test_happy_path_order_totals_4840() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let (status, order) = submit(&app, menu.table_id, &[(menu.teriyaki, 1), (menu.ramen, 2)]).await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["status"], "pending");
    assert_eq!(order["total_amount"], 4840);
    assert_eq!(order["table_number"], 4);
    assert_eq!(order["items"].as_array().unwrap().len(), 2);
    assert_eq!(order["items"][0]["unit_price"], 1680);
    assert_eq!(order["items"][1]["quantity"], 2);
    assert_eq!(order["items"][1]["menu_item_name"], "Miso Ramen");

    let id = order["id"].as_i64().unwrap();
    let (status, detail) = get(&app, &format!("/api/orders/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail, order);
}

#[tokio::test]
async fn test_unit_price_is_snapshotted() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let (_, order) = submit(&app, menu.table_id, &[(menu.tea, 3)]).await;
    let id = order["id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/menu-items/{}", menu.tea),
        Some(json!({ "price": 350 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, detail) = get(&app, &format!("/api/orders/{id}")).await;
    assert_eq!(detail["items"][0]["unit_price"], 300);
    assert_eq!(detail["total_amount"], 900);
}

#[tokio::test]
async fn test_submit_rejections() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    // 空购物车
    let (status, body) = submit(&app, menu.table_id, &[]).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4002);

    let (status, body) = submit(&app, 999, &[(menu.tea, 1)]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 7001);

    let (status, body) = submit(&app, menu.table_id, &[(999, 1)]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);

    let (status, _) = submit(&app, menu.table_id, &[(menu.tea, 0)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    post(&app, &format!("/api/menu-items/{}/toggle-availability", menu.tea), json!({})).await;
    let (status, body) = submit(&app, menu.table_id, &[(menu.tea, 1)]).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4006);

    // 失败的提交不留下任何数据
    let (_, orders) = get(&app, "/api/orders").await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_expected_total_mismatch() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let payload = |expected: i64| {
        json!({
            "table_id": menu.table_id,
            "items": [{ "menu_item_id": menu.teriyaki, "quantity": 1 }],
            "expected_total": expected,
        })
    };

    let (status, body) = post(&app, "/api/orders", payload(1500)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4005);
    assert_eq!(body["details"]["actual_total"], 1680);

    let (status, _) = post(&app, "/api/orders", payload(1680)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_idempotent_submission() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let payload = json!({
        "table_id": menu.table_id,
        "items": [{ "menu_item_id": menu.ramen, "quantity": 1 }],
        "idempotency_key": "5f0c6b0e-2f7e-4a53-9a57-1f2d3c4b5a69",
    });
    let (first_status, first) = post(&app, "/api/orders", payload.clone()).await;
    let (second_status, second) = post(&app, "/api/orders", payload).await;

    assert_eq!(first_status, StatusCode::CREATED);
    assert_eq!(second_status, StatusCode::OK);
    assert_eq!(first["id"], second["id"]);

    let (_, orders) = get(&app, "/api/orders").await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_idempotent_submissions() {
    let (state, _dir) = file_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let payload = json!({
        "table_id": menu.table_id,
        "items": [{ "menu_item_id": menu.tea, "quantity": 2 }],
        "idempotency_key": "0b7e4a1c-93d5-4f0e-8c2a-6d1f5e3b9a07",
    });
    let submissions = (0..8).map(|_| post(&app, "/api/orders", payload.clone()));
    let results = futures::future::join_all(submissions).await;

    let created = results.iter().filter(|(s, _)| *s == StatusCode::CREATED).count();
    assert_eq!(created, 1, "{results:?}");
    assert!(results.iter().all(|(s, _)| *s == StatusCode::CREATED || *s == StatusCode::OK));
    let id = &results[0].1["id"];
    assert!(results.iter().all(|(_, body)| &body["id"] == id));

    let (_, orders) = get(&app, "/api/orders").await;
    assert_eq!(orders.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_duplicate_lines_are_merged() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let (status, order) = submit(&app, menu.table_id, &[(menu.tea, 1), (menu.ramen, 1), (menu.tea, 2)]).await;
    assert_eq!(status, StatusCode::CREATED);
    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["menu_item_id"], menu.tea);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(order["total_amount"], 900 + 1580);
}

#[tokio::test]
async fn test_large_quantities_are_accepted_after_merge() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let (status, order) = submit(&app, menu.table_id, &[(menu.tea, 99), (menu.tea, 99)]).await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["items"][0]["quantity"], 198);
    assert_eq!(order["total_amount"], 198 * 300);

    let (status, order) = submit(&app, menu.table_id, &[(menu.ramen, 100)]).await;
    assert_eq!(status, StatusCode::CREATED, "{order}");
    assert_eq!(order["total_amount"], 100 * 1580);
}

#[tokio::test]
async fn test_total_overflow_is_rejected() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    // Bypasses the API price bound, as a legacy row would
    sqlx::query("UPDATE menu_items SET price = ?1 WHERE id = ?2")
        .bind(i64::MAX / 2)
        .bind(menu.teriyaki)
        .execute(&state.pool)
        .await
        .unwrap();

    let (status, body) = submit(&app, menu.table_id, &[(menu.teriyaki, 3)]).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 8);

    let (_, orders) = get(&app, "/api/orders").await;
    assert!(orders.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_status_lifecycle() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;
    let (_, order) = submit(&app, menu.table_id, &[(menu.tea, 1)]).await;
    let uri = format!("/api/orders/{}/status", order["id"]);

    for next in ["confirmed", "preparing", "ready"] {
        let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": next }))).await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["status"], next);
    }

    // 不能回退
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "pending" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4003);

    // 旧数据中的 completed 视为 served
    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "status": "completed" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "served");

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "status": "cancelled" }))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "PATCH", &uri, Some(json!({ "status": "shipped" }))).await;
    assert!(status.is_client_error());

    let (status, body) = get(&app, &format!("/api/orders/{}/timeline", order["id"])).await;
    assert_eq!(status, StatusCode::OK);
    let steps = body.as_array().unwrap();
    assert!(steps.iter().all(|s| s["completed"] == true));
}

#[tokio::test]
async fn test_delete_order_only_when_cancelled() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;
    let (_, order) = submit(&app, menu.table_id, &[(menu.tea, 1)]).await;
    let id = order["id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 4004);

    send(&app, "PATCH", &format!("/api/orders/{id}/status"), Some(json!({ "status": "cancelled" }))).await;
    let (status, _) = send(&app, "DELETE", &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = get(&app, &format!("/api/orders/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    // 订单删除后菜品和桌台不再被引用
    let (status, _) = send(&app, "DELETE", &format!("/api/menu-items/{}", menu.tea), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "DELETE", &format!("/api/tables/{}", menu.table_id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_referential_guards() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;
    submit(&app, menu.table_id, &[(menu.teriyaki, 1)]).await;

    let (_, items) = get(&app, "/api/menu-items").await;
    let mains = items.as_array().unwrap()[0]["category_id"].as_i64().unwrap();

    let (status, body) = send(&app, "DELETE", &format!("/api/categories/{mains}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6003);

    let (status, body) = send(&app, "DELETE", &format!("/api/menu-items/{}", menu.teriyaki), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6004);

    let (status, body) = send(&app, "DELETE", &format!("/api/tables/{}", menu.table_id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7003);

    // 无订单的菜品可以删除
    let (status, _) = send(&app, "DELETE", &format!("/api/menu-items/{}", menu.ramen), None).await;
    assert_eq!(status, StatusCode::OK);

    let empty = create_category(&app, "Seasonal", 9).await;
    let (status, _) = send(&app, "DELETE", &format!("/api/categories/{empty}"), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_menu_listing_and_availability_toggle() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    let (_, before) = get(&app, &format!("/api/menu-items/{}", menu.ramen)).await;
    let (status, after) = post(&app, &format!("/api/menu-items/{}/toggle-availability", menu.ramen), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["is_available"], false);
    // 只改变 is_available
    assert_eq!(after["name"], before["name"]);
    assert_eq!(after["price"], before["price"]);
    assert_eq!(after["category_id"], before["category_id"]);

    let (_, all) = get(&app, "/api/menu-items").await;
    let names: Vec<&str> = all.as_array().unwrap().iter().map(|i| i["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Chicken Teriyaki", "Miso Ramen", "Green Tea"]);
    assert_eq!(all[2]["category_name"], "Drinks");

    let (_, available) = get(&app, "/api/menu-items?available_only=true").await;
    assert_eq!(available.as_array().unwrap().len(), 2);

    let drinks = all[2]["category_id"].as_i64().unwrap();
    let (_, filtered) = get(&app, &format!("/api/menu-items?category_id={drinks}")).await;
    assert_eq!(filtered.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_menu_item_validation() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let category = create_category(&app, "Mains", 1).await;

    let (status, body) = post(&app, "/api/menu-items", json!({ "category_id": category, "name": "Free", "price": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6005);

    let (status, body) = post(
        &app,
        "/api/menu-items",
        json!({ "category_id": category, "name": "Gold Leaf", "price": i64::MAX }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6005);

    let (status, body) = post(&app, "/api/menu-items", json!({ "category_id": 999, "name": "Ghost", "price": 100 })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6002);

    let (status, body) = post(
        &app,
        "/api/menu-items",
        json!({ "category_id": category, "name": "Tamagoyaki", "price": 480, "allergens": ["egg", " egg ", "soy"] }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["allergens"], json!(["egg", "soy"]));
    assert_eq!(body["is_available"], true);

    let (status, _) = post(&app, "/api/categories", json!({ "name": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_tables() {
    let (state, _dir) = test_state().await;
    let app = app(&state);

    let (status, table) = post(&app, "/api/tables", json!({ "table_number": 12 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(table["qr_code"], "http://localhost:3000/table/12/menu");
    assert_eq!(table["status"], "available");
    create_table(&app, 3).await;

    let (status, body) = post(&app, "/api/tables", json!({ "table_number": 12 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 7002);

    let (status, body) = post(&app, "/api/tables", json!({ "table_number": 0 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 7004);

    let (_, list) = get(&app, "/api/tables").await;
    let numbers: Vec<i64> = list.as_array().unwrap().iter().map(|t| t["table_number"].as_i64().unwrap()).collect();
    assert_eq!(numbers, vec![3, 12]);

    let (status, found) = get(&app, "/api/tables/by-number/12").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["id"], table["id"]);
    let (status, _) = get(&app, "/api/tables/by-number/99").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // maintenance 是 cleaning 的旧名
    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/tables/{}/status", table["id"]),
        Some(json!({ "status": "maintenance" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "cleaning");
}

#[tokio::test]
async fn test_order_filters_and_stats() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;
    let other_table = create_table(&app, 7).await;

    let (_, a) = submit(&app, menu.table_id, &[(menu.teriyaki, 1)]).await;
    let (_, b) = submit(&app, other_table, &[(menu.ramen, 2)]).await;
    let (_, c) = submit(&app, menu.table_id, &[(menu.tea, 1)]).await;
    send(&app, "PATCH", &format!("/api/orders/{}/status", c["id"]), Some(json!({ "status": "cancelled" }))).await;

    let (_, all) = get(&app, "/api/orders").await;
    let ids: Vec<i64> = all.as_array().unwrap().iter().map(|o| o["id"].as_i64().unwrap()).collect();
    // 新→旧
    assert_eq!(ids, vec![c["id"].as_i64().unwrap(), b["id"].as_i64().unwrap(), a["id"].as_i64().unwrap()]);

    let (_, by_table) = get(&app, &format!("/api/orders?table_id={}", menu.table_id)).await;
    assert_eq!(by_table.as_array().unwrap().len(), 2);

    let (_, cancelled) = get(&app, "/api/orders?status=cancelled").await;
    assert_eq!(cancelled.as_array().unwrap().len(), 1);

    let (_, future) = get(&app, "/api/orders?date_from=2999-01-01").await;
    assert!(future.as_array().unwrap().is_empty());

    let (status, _) = get(&app, "/api/orders?date_from=01/01/2024").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, stats) = get(&app, "/api/orders/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_orders"], 3);
    assert_eq!(stats["pending"], 2);
    assert_eq!(stats["cancelled"], 1);
    assert_eq!(stats["total_revenue"], 1680 + 3160);
    assert_eq!(stats["average_order_value"], (1680 + 3160) / 2);
}

#[tokio::test]
async fn test_sales_report_excludes_cancelled() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;

    submit(&app, menu.table_id, &[(menu.teriyaki, 1), (menu.ramen, 2)]).await;
    submit(&app, menu.table_id, &[(menu.ramen, 1)]).await;
    let (_, cancelled) = submit(&app, menu.table_id, &[(menu.tea, 5)]).await;
    send(
        &app,
        "PATCH",
        &format!("/api/orders/{}/status", cancelled["id"]),
        Some(json!({ "status": "cancelled" })),
    )
    .await;

    let (status, report) = get(&app, "/api/reports?period=today").await;
    assert_eq!(status, StatusCode::OK, "{report}");
    assert_eq!(report["summary"]["total_orders"], 2);
    assert_eq!(report["summary"]["total_revenue"], 4840 + 1580);
    assert_eq!(report["daily_sales"].as_array().unwrap().len(), 1);
    assert_eq!(report["popular_items"][0]["name"], "Miso Ramen");
    assert_eq!(report["popular_items"][0]["quantity"], 3);
    assert_eq!(report["hourly"].as_array().unwrap().len(), 24);
    assert!(
        report["popular_items"]
            .as_array()
            .unwrap()
            .iter()
            .all(|p| p["name"] != "Green Tea")
    );

    let (status, _) = get(&app, "/api/reports?period=custom").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, empty) = get(&app, "/api/reports?period=custom&date_from=2020-01-01&date_to=2020-01-31").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(empty["summary"]["total_orders"], 0);
}
