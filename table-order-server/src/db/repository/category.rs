//! Menu Category Repository

use shared::error::{AppError, ErrorCode};
use shared::models::{MenuCategory, MenuCategoryCreate, MenuCategoryUpdate};
use shared::util::now_millis;
use sqlx::SqlitePool;

use super::guard_violation;
use crate::core::ServiceResult;

const COLUMNS: &str = "id, name, description, display_order, created_at";

pub async fn find_all(pool: &SqlitePool) -> ServiceResult<Vec<MenuCategory>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_categories ORDER BY display_order, id");
    let categories = sqlx::query_as::<_, MenuCategory>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(categories)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<MenuCategory>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_categories WHERE id = ?");
    let category = sqlx::query_as::<_, MenuCategory>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(category)
}

fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
        .with_detail("category_id", id)
}

pub async fn create(pool: &SqlitePool, data: MenuCategoryCreate) -> ServiceResult<MenuCategory> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_categories (name, description, display_order, created_at) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.display_order.unwrap_or(0))
    .bind(now_millis())
    .fetch_one(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::database("Failed to create category").into())
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: MenuCategoryUpdate,
) -> ServiceResult<MenuCategory> {
    let rows = sqlx::query(
        "UPDATE menu_categories SET name = COALESCE(?1, name), description = COALESCE(?2, description), display_order = COALESCE(?3, display_order) WHERE id = ?4",
    )
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.display_order)
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

/// Delete a category that no menu item references
pub async fn delete(pool: &SqlitePool, id: i64) -> ServiceResult<()> {
    let mut tx = super::begin_write(pool).await?;

    let items: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM menu_items WHERE category_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let guard = AppError::new(ErrorCode::CategoryHasItems)
        .with_detail("category_id", id)
        .with_detail("menu_items", items);
    if items > 0 {
        return Err(guard.into());
    }

    let rows = sqlx::query("DELETE FROM menu_categories WHERE id = ?")
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
