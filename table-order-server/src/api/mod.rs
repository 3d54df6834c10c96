//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`categories`] - 菜单分类
//! - [`menu_items`] - 菜品 (含供应状态切换)
//! - [`tables`] - 桌台 (含 QR 码 URL)
//! - [`orders`] - 订单提交、状态流转、统计
//! - [`reports`] - 销售报表
//! - [`images`] - 菜品图片上传/删除
//! - [`realtime`] - 订单变更 WebSocket

pub mod categories;
pub mod health;
pub mod images;
pub mod menu_items;
pub mod orders;
pub mod realtime;
pub mod reports;
pub mod tables;

use axum::Router;
use tower_http::services::ServeDir;

use crate::core::ServerState;
use crate::services::image_store::PUBLIC_PREFIX;

/// 组装全部路由并绑定状态
///
/// 中间件 (trace / timeout / cors) 由 [`Server`](crate::core::Server) 叠加
pub fn build_router(state: ServerState) -> Router {
    health::mark_started();
    let images = ServeDir::new(state.images.root());

    Router::new()
        .merge(health::router())
        .merge(categories::router())
        .merge(menu_items::router())
        .merge(tables::router())
        .merge(orders::router())
        .merge(reports::router())
        .merge(images::router())
        .merge(realtime::router())
        .nest_service(PUBLIC_PREFIX, images)
        .with_state(state)
}
