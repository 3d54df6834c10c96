mod common;

use common::*;
use serde_json::json;
use shared::order::OrderStatus;
use shared::realtime::{ChangeKind, ChannelScope};
use tokio::sync::broadcast::error::TryRecvError;

#[tokio::test]
async fn test_writes_publish_committed_changes() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;
    let mut rx = state.hub.subscribe();

    let (_, order) = submit(&app, menu.table_id, &[(menu.ramen, 1)]).await;
    let id = order["id"].as_i64().unwrap();

    let change = rx.recv().await.unwrap();
    assert_eq!(change.kind, ChangeKind::Insert);
    assert_eq!(change.order.id, id);
    assert_eq!(change.order.status, OrderStatus::Pending);

    send(&app, "PATCH", &format!("/api/orders/{id}/status"), Some(json!({ "status": "preparing" }))).await;
    let change = rx.recv().await.unwrap();
    assert_eq!(change.kind, ChangeKind::Update);
    assert_eq!(change.order.status, OrderStatus::Preparing);

    send(&app, "PATCH", &format!("/api/orders/{id}/status"), Some(json!({ "status": "cancelled" }))).await;
    send(&app, "DELETE", &format!("/api/orders/{id}"), None).await;
    assert_eq!(rx.recv().await.unwrap().order.status, OrderStatus::Cancelled);
    let deleted = rx.recv().await.unwrap();
    assert_eq!(deleted.kind, ChangeKind::Delete);
    assert_eq!(deleted.order.id, id);
}

#[tokio::test]
async fn test_rejected_and_noop_writes_publish_nothing() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;
    let (_, order) = submit(&app, menu.table_id, &[(menu.tea, 1)]).await;
    let id = order["id"].as_i64().unwrap();
    let mut rx = state.hub.subscribe();

    // 同状态: 不写库不广播
    send(&app, "PATCH", &format!("/api/orders/{id}/status"), Some(json!({ "status": "pending" }))).await;
    // 非法: 未取消的订单不能删除
    send(&app, "DELETE", &format!("/api/orders/{id}"), None).await;
    // 失败的提交
    submit(&app, menu.table_id, &[]).await;

    assert!(matches!(rx.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn test_scope_filters_single_order() {
    let (state, _dir) = test_state().await;
    let app = app(&state);
    let menu = seed_menu(&app).await;
    let mut rx = state.hub.subscribe();

    let (_, mine) = submit(&app, menu.table_id, &[(menu.tea, 1)]).await;
    let (_, other) = submit(&app, menu.table_id, &[(menu.ramen, 1)]).await;
    let scope = ChannelScope::Order(mine["id"].as_i64().unwrap());

    let first = rx.recv().await.unwrap();
    let second = rx.recv().await.unwrap();
    assert!(scope.matches(&first));
    assert!(!scope.matches(&second));
    assert_eq!(second.order.id, other["id"].as_i64().unwrap());
    assert!(ChannelScope::AllOrders.matches(&second));
}
