//! Order API 模块
//!
//! | 路径 | 方法 | 说明 |
//! |------|------|------|
//! | /api/orders | POST | 顾客提交订单 |
//! | /api/orders | GET | 订单列表 (status / table_id / date_from / date_to) |
//! | /api/orders/stats | GET | 最近 24 小时统计 |
//! | /api/orders/{id} | GET | 订单详情 (含明细) |
//! | /api/orders/{id} | DELETE | 删除已取消订单 |
//! | /api/orders/{id}/status | PATCH | 更新订单状态 |
//! | /api/orders/{id}/timeline | GET | 顾客进度时间线 |
//!
//! 写操作成功提交后向 [`OrderHub`](crate::realtime::OrderHub) 广播变更。

mod handler;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::submit))
        .route("/stats", get(handler::stats))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/status", patch(handler::update_status))
        .route("/{id}/timeline", get(handler::timeline))
}
