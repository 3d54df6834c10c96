//! Dining Table Repository

use shared::error::{AppError, ErrorCode};
use shared::models::DiningTable;
use shared::order::TableStatus;
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::{guard_violation, unique_violation};
use crate::core::ServiceResult;

const COLUMNS: &str = "id, table_number, qr_code, status, created_at";

/// Find all tables ordered by number
pub async fn find_all(pool: &SqlitePool) -> ServiceResult<Vec<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM tables ORDER BY table_number");
    let tables = sqlx::query_as::<_, DiningTable>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(tables)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM tables WHERE id = ?");
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(table)
}

/// Find table by its printed number
pub async fn find_by_number(
    pool: &SqlitePool,
    table_number: i32,
) -> ServiceResult<Option<DiningTable>> {
    let sql = format!("SELECT {COLUMNS} FROM tables WHERE table_number = ?");
    let table = sqlx::query_as::<_, DiningTable>(&sql)
        .bind(table_number)
        .fetch_optional(pool)
        .await?;
    Ok(table)
}

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::TableNotFound, format!("Table {id} not found"))
        .with_detail("table_id", id)
}

fn number_taken(table_number: i32) -> AppError {
    AppError::with_message(
        ErrorCode::TableNumberTaken,
        format!("Table number {table_number} already exists"),
    )
    .with_detail("table_number", table_number)
}

/// Create a table with its QR code URL; starts as available
pub async fn create(
    pool: &SqlitePool,
    table_number: i32,
    qr_code: &str,
) -> ServiceResult<DiningTable> {
    if find_by_number(pool, table_number).await?.is_some() {
        return Err(number_taken(table_number).into());
    }

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO tables (table_number, qr_code, status, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(table_number)
    .bind(qr_code)
    .bind(TableStatus::Available)
    .bind(now_millis())
    .fetch_one(pool)
    .await
    .map_err(|e| unique_violation(e, number_taken(table_number)))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::database("Failed to create table").into())
}

pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: TableStatus,
) -> ServiceResult<DiningTable> {
    let rows = sqlx::query("UPDATE tables SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id).into());
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| not_found(id).into())
}

/// Delete a table that has no orders
pub async fn delete(pool: &SqlitePool, id: i64) -> ServiceResult<()> {
    let mut tx = super::begin_write(pool).await?;

    let orders: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM orders WHERE table_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let guard = AppError::new(ErrorCode::TableHasOrders)
        .with_detail("table_id", id)
        .with_detail("orders", orders);
    if orders > 0 {
        return Err(guard.into());
    }

    let rows = sqlx::query("DELETE FROM tables WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| guard_violation(e, guard))?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id).into());
    }

    tx.commit().await?;
    Ok(())
}
