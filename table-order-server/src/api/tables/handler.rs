//! Dining Table API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{DiningTable, DiningTableCreate, TableStatusUpdate};

use crate::core::{ServerState, ServiceResult};
use crate::db::repository::dining_table;
use crate::utils::validation::validate_table_number;

/// GET /api/tables - 获取所有桌台 (按桌号)
pub async fn list(State(state): State<ServerState>) -> ServiceResult<Json<Vec<DiningTable>>> {
    let tables = dining_table::find_all(&state.pool).await?;
    Ok(Json(tables))
}

/// GET /api/tables/{id} - 获取单个桌台
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<DiningTable>> {
    let table = dining_table::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| dining_table::not_found(id))?;
    Ok(Json(table))
}

/// GET /api/tables/by-number/{number} - 按桌号查询 (顾客扫码入口)
pub async fn get_by_number(
    State(state): State<ServerState>,
    Path(number): Path<i32>,
) -> ServiceResult<Json<DiningTable>> {
    let table = dining_table::find_by_number(&state.pool, number)
        .await?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::TableNotFound, format!("Table number {number} not found"))
                .with_detail("table_number", number)
        })?;
    Ok(Json(table))
}

/// POST /api/tables - 创建桌台，生成 QR 码 URL
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<DiningTableCreate>,
) -> ServiceResult<Json<DiningTable>> {
    validate_table_number(payload.table_number)?;

    let qr_code = state.config.table_menu_url(payload.table_number);
    let table = dining_table::create(&state.pool, payload.table_number, &qr_code).await?;
    tracing::info!(table_id = table.id, table_number = table.table_number, "Table created");
    Ok(Json(table))
}

/// PUT /api/tables/{id}/status - 更新桌台状态
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<TableStatusUpdate>,
) -> ServiceResult<Json<DiningTable>> {
    let table = dining_table::update_status(&state.pool, id, payload.status).await?;
    tracing::info!(table_id = id, status = %table.status, "Table status updated");
    Ok(Json(table))
}

/// DELETE /api/tables/{id} - 删除桌台 (有订单时拒绝)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> ServiceResult<Json<bool>> {
    dining_table::delete(&state.pool, id).await?;
    tracing::info!(table_id = id, "Table deleted");
    Ok(Json(true))
}
