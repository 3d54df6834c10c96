//! Menu Item Repository

use shared::error::{AppError, ErrorCode};
use shared::models::{MenuItem, MenuItemCreate, MenuItemQuery, MenuItemUpdate, MenuItemWithCategory};
use shared::util::now_millis;
use sqlx::SqlitePool;
use sqlx::types::Json;

use super::{category, guard_violation};
use crate::core::ServiceResult;

const COLUMNS: &str = "mi.id, mi.category_id, mi.name, mi.description, mi.price, mi.image_url, \
     mi.is_available, mi.allergens, mi.created_at, mi.updated_at";

/// List menu items, ordered by category display order then name
pub async fn find_all(
    pool: &SqlitePool,
    query: &MenuItemQuery,
) -> ServiceResult<Vec<MenuItemWithCategory>> {
    let sql = format!(
        "SELECT {COLUMNS}, c.name AS category_name FROM menu_items mi \
         LEFT JOIN menu_categories c ON c.id = mi.category_id \
         WHERE (?1 IS NULL OR mi.category_id = ?1) AND (?2 = 0 OR mi.is_available = 1) \
         ORDER BY c.display_order, mi.name, mi.id"
    );
    let items = sqlx::query_as::<_, MenuItemWithCategory>(&sql)
        .bind(query.category_id)
        .bind(query.available_only)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<MenuItem>> {
    let sql = format!("SELECT {COLUMNS} FROM menu_items mi WHERE mi.id = ?");
    let item = sqlx::query_as::<_, MenuItem>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(item)
}

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::MenuItemNotFound, format!("Menu item {id} not found"))
        .with_detail("menu_item_id", id)
}

async fn ensure_category(pool: &SqlitePool, category_id: i64) -> ServiceResult<()> {
    if category::find_by_id(pool, category_id).await?.is_none() {
        return Err(AppError::with_message(
            ErrorCode::CategoryNotFound,
            format!("Category {category_id} not found"),
        )
        .with_detail("category_id", category_id)
        .into());
    }
    Ok(())
}

pub async fn create(pool: &SqlitePool, data: MenuItemCreate) -> ServiceResult<MenuItem> {
    ensure_category(pool, data.category_id).await?;

    let now = now_millis();
    let allergens = data.allergens.unwrap_or_default();
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO menu_items (category_id, name, description, price, image_url, is_available, allergens, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.category_id)
    .bind(data.name.trim())
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(data.is_available.unwrap_or(true))
    .bind(Json(&allergens))
    .bind(now)
    .bind(now)
    .fetch_one(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::database("Failed to create menu item").into())
}

pub async fn update(pool: &SqlitePool, id: i64, data: MenuItemUpdate) -> ServiceResult<MenuItem> {
    if let Some(category_id) = data.category_id {
        ensure_category(pool, category_id).await?;
    }

    let rows = sqlx::query(
        "UPDATE menu_items SET \
         category_id = COALESCE(?1, category_id), \
         name = COALESCE(?2, name), \
         description = COALESCE(?3, description), \
         price = COALESCE(?4, price), \
         image_url = COALESCE(?5, image_url), \
         is_available = COALESCE(?6, is_available), \
         allergens = COALESCE(?7, allergens), \
         updated_at = ?8 \
         WHERE id = ?9",
    )
    .bind(data.category_id)
    .bind(data.name.as_deref().map(str::trim))
    .bind(&data.description)
    .bind(data.price)
    .bind(&data.image_url)
    .bind(data.is_available)
    .bind(data.allergens.as_ref().map(Json))
    .bind(now_millis())
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

/// Flip `is_available` and return the updated row
pub async fn toggle_availability(pool: &SqlitePool, id: i64) -> ServiceResult<MenuItem> {
    let rows = sqlx::query(
        "UPDATE menu_items SET is_available = NOT is_available, updated_at = ? WHERE id = ?",
    )
    .bind(now_millis())
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

/// Delete a menu item that no order line references
///
/// Items with order history should be marked unavailable instead.
/// Returns the deleted row so the caller can clean up its image.
pub async fn delete(pool: &SqlitePool, id: i64) -> ServiceResult<MenuItem> {
    let existing = find_by_id(pool, id).await?.ok_or_else(|| not_found(id))?;

    let mut tx = super::begin_write(pool).await?;
    let lines: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM order_items WHERE menu_item_id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    let guard = AppError::new(ErrorCode::MenuItemHasOrders)
        .with_detail("menu_item_id", id)
        .with_detail("order_items", lines);
    if lines > 0 {
        return Err(guard.into());
    }

    let rows = sqlx::query("DELETE FROM menu_items WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| guard_violation(e, guard))?;
    if rows.rows_affected() == 0 {
        return Err(not_found(id).into());
    }
    tx.commit().await?;

    Ok(existing)
}
