//! Image API 模块
//!
//! 上传/删除走 `/api/images`，读取走静态路由 `/images/...`

mod handler;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, post},
};

use crate::core::ServerState;
use crate::services::image_store::MAX_IMAGE_SIZE;

/// Multipart overhead allowed on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/images", post(handler::upload))
        .route("/api/images/{*path}", delete(handler::delete))
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + MULTIPART_OVERHEAD))
}
