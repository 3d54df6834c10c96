//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use shared::error::AppError;
use shared::models::{DashboardStats, Order, OrderCreate, OrderDetail, OrderQuery, OrderStatusUpdate};
use shared::order::{TimelineStep, status_timeline};
use shared::realtime::OrderChange;
use shared::util::now_millis;

use crate::core::{ServerState, ServiceResult};
use crate::db::repository::order::{self, OrderFilter};
use crate::utils::time::date_range_millis;
use crate::utils::validation::{MAX_NOTE_LEN, MAX_ORDER_LINES, validate_optional_text};

/// Dashboard window
const STATS_WINDOW_MS: i64 = 24 * 60 * 60 * 1000;

fn validate_submission(payload: &OrderCreate) -> Result<(), AppError> {
    validate_optional_text(&payload.special_requests, "special_requests", MAX_NOTE_LEN)?;
    if payload.items.len() > MAX_ORDER_LINES {
        return Err(AppError::validation(format!(
            "Too many lines ({}, max {MAX_ORDER_LINES})",
            payload.items.len()
        )));
    }
    Ok(())
}

/// POST /api/orders - 提交订单
///
/// 201 新建；重复的 idempotency_key 返回 200 和已有订单
pub async fn submit(
    State(state): State<ServerState>,
    Json(payload): Json<OrderCreate>,
) -> ServiceResult<(StatusCode, Json<OrderDetail>)> {
    validate_submission(&payload)?;

    let submitted = order::create(&state.pool, &payload).await?;
    if !submitted.created {
        return Ok((StatusCode::OK, Json(submitted.order)));
    }

    state
        .hub
        .publish(OrderChange::insert(submitted.order.order.clone()));
    Ok((StatusCode::CREATED, Json(submitted.order)))
}

/// GET /api/orders - 订单列表 (新→旧)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<OrderQuery>,
) -> ServiceResult<Json<Vec<OrderDetail>>> {
    let (from, to) = date_range_millis(
        query.date_from.as_deref(),
        query.date_to.as_deref(),
        state.config.timezone,
    )?;
    let filter = OrderFilter {
        status: query.status,
        table_id: query.table_id,
        from,
        to,
        ..Default::default()
    };
    let orders = order::find_all(&state.pool, &filter).await?;
    Ok(Json(orders))
}

/// GET /api/orders/{id} - 订单详情
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<OrderDetail>> {
    let detail = order::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| order::not_found(id))?;
    Ok(Json(detail))
}

/// GET /api/orders/{id}/timeline - 订单进度
pub async fn timeline(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<Vec<TimelineStep>>> {
    let header = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| order::not_found(id))?;
    Ok(Json(status_timeline(header.status)))
}

/// PATCH /api/orders/{id}/status - 更新订单状态
///
/// 相同状态不写库也不广播
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> ServiceResult<Json<Order>> {
    let change = order::update_status(&state.pool, id, payload.status).await?;
    if change.changed {
        state.hub.publish(OrderChange::update(change.order.clone()));
    }
    Ok(Json(change.order))
}

/// DELETE /api/orders/{id} - 删除订单 (仅限已取消)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<bool>> {
    let deleted = order::delete(&state.pool, id).await?;
    tracing::info!(order_id = id, "Order deleted");
    state.hub.publish(OrderChange::delete(deleted));
    Ok(Json(true))
}

/// GET /api/orders/stats - 最近 24 小时统计
pub async fn stats(State(state): State<ServerState>) -> ServiceResult<Json<DashboardStats>> {
    let stats = order::dashboard_stats(&state.pool, now_millis() - STATS_WINDOW_MS).await?;
    Ok(Json(stats))
}
