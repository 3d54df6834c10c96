//! Realtime WebSocket 路由
//!
//! | 路径 | 说明 |
//! |------|------|
//! | /api/realtime/orders | 全部订单变更 (员工看板) |
//! | /api/realtime/orders/{id} | 单个订单变更 (顾客进度页) |
//!
//! 协议 (Server → Client, JSON text frame, [`RealtimeMessage`](shared::realtime::RealtimeMessage)):
//! - `Ready` 订阅建立后发送一次，客户端此时拉取基线数据
//! - `Change` 已提交的 INSERT / UPDATE / DELETE
//! - `Resync` 订阅者落后，需重新拉取基线
//!
//! 客户端发送的文本帧被忽略；30 秒一次 Ping。

mod session;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/realtime/orders", get(session::all_orders))
        .route("/api/realtime/orders/{id}", get(session::single_order))
}
