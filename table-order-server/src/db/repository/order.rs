//! Order Repository
//!
//! Submission, status changes and listings. Header and lines are written in
//! one transaction; line prices are snapshotted from the live menu here and
//! never trusted from the client.

use std::collections::{BTreeMap, HashMap};

use shared::error::{AppError, ErrorCode};
use shared::models::{DashboardStats, Order, OrderCreate, OrderDetail, OrderLine};
use shared::order::OrderStatus;
use shared::util::now_millis;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::{dining_table, menu_item};
use crate::core::ServiceResult;

const HEADER_COLUMNS: &str = "o.id, o.table_id, o.status, o.total_amount, o.special_requests, \
     o.created_at, o.updated_at";

/// Lines fetched per `IN (...)` query
const LINE_CHUNK: usize = 500;

#[derive(sqlx::FromRow)]
struct HeaderRow {
    #[sqlx(flatten)]
    order: Order,
    table_number: Option<i32>,
}

#[derive(sqlx::FromRow)]
struct PricedItem {
    name: String,
    price: i64,
    is_available: bool,
}

/// Listing filter, timestamps are Unix millis with `[from, to)` semantics
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
    pub from: Option<i64>,
    pub to: Option<i64>,
    pub exclude_cancelled: bool,
    /// Oldest first; listings default to newest first
    pub oldest_first: bool,
}

/// Outcome of a submission
#[derive(Debug, Clone)]
pub struct Submitted {
    pub order: OrderDetail,
    /// False when an earlier submission with the same idempotency key was returned
    pub created: bool,
}

pub(crate) fn not_found(id: i64) -> AppError {
    AppError::with_message(ErrorCode::OrderNotFound, format!("Order {id} not found"))
        .with_detail("order_id", id)
}

/// Merge duplicate lines and reject empty or non-positive input
fn normalize_lines(data: &OrderCreate) -> ServiceResult<BTreeMap<i64, i64>> {
    if data.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty).into());
    }
    let mut merged: BTreeMap<i64, i64> = BTreeMap::new();
    for line in &data.items {
        if line.quantity < 1 {
            return Err(AppError::validation(format!(
                "Quantity for menu item {} must be at least 1",
                line.menu_item_id
            ))
            .with_detail("menu_item_id", line.menu_item_id)
            .into());
        }
        *merged.entry(line.menu_item_id).or_default() += i64::from(line.quantity);
    }
    Ok(merged)
}

/// Submit an order
///
/// Preserves the caller's line order after merging duplicates by menu item.
pub async fn create(pool: &SqlitePool, data: &OrderCreate) -> ServiceResult<Submitted> {
    let merged = normalize_lines(data)?;
    let mut lines: Vec<(i64, i64)> = Vec::with_capacity(merged.len());
    for line in &data.items {
        if let Some(qty) = merged.get(&line.menu_item_id)
            && !lines.iter().any(|(id, _)| *id == line.menu_item_id)
        {
            lines.push((line.menu_item_id, *qty));
        }
    }

    let key = data
        .idempotency_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty());
    if let Some(key) = key
        && let Some(existing) = find_by_idempotency_key(pool, key).await?
    {
        tracing::info!(order_id = existing.order.id, "Duplicate submission, returning existing order");
        return Ok(Submitted {
            order: existing,
            created: false,
        });
    }

    let mut tx = super::begin_write(pool).await?;

    // A racing submission with the same key may have committed while we waited
    if let Some(key) = key {
        let committed: Option<i64> = sqlx::query_scalar("SELECT id FROM orders WHERE idempotency_key = ?")
            .bind(key)
            .fetch_optional(&mut *tx)
            .await?;
        if committed.is_some() {
            drop(tx);
            let existing = find_by_idempotency_key(pool, key)
                .await?
                .ok_or_else(|| AppError::database("Idempotent order vanished"))?;
            tracing::info!(order_id = existing.order.id, "Duplicate submission, returning existing order");
            return Ok(Submitted {
                order: existing,
                created: false,
            });
        }
    }

    let table_exists: Option<i64> = sqlx::query_scalar("SELECT id FROM tables WHERE id = ?")
        .bind(data.table_id)
        .fetch_optional(&mut *tx)
        .await?;
    if table_exists.is_none() {
        return Err(dining_table::not_found(data.table_id).into());
    }

    let mut priced: Vec<(i64, i64, i64)> = Vec::with_capacity(lines.len());
    let mut total: i64 = 0;
    for (menu_item_id, quantity) in &lines {
        let item: Option<PricedItem> =
            sqlx::query_as("SELECT name, price, is_available FROM menu_items WHERE id = ?")
                .bind(menu_item_id)
                .fetch_optional(&mut *tx)
                .await?;
        let item = item.ok_or_else(|| menu_item::not_found(*menu_item_id))?;
        if !item.is_available {
            return Err(AppError::with_message(
                ErrorCode::MenuItemUnavailable,
                format!("{} is not available", item.name),
            )
            .with_detail("menu_item_id", *menu_item_id)
            .into());
        }
        total = quantity
            .checked_mul(item.price)
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::ValueOutOfRange, "Order total is out of range")
                    .with_detail("menu_item_id", *menu_item_id)
            })?;
        priced.push((*menu_item_id, *quantity, item.price));
    }

    if let Some(expected) = data.expected_total
        && expected != total
    {
        return Err(AppError::new(ErrorCode::PriceChanged)
            .with_detail("expected_total", expected)
            .with_detail("actual_total", total)
            .into());
    }

    let now = now_millis();
    let inserted: Result<i64, sqlx::Error> = sqlx::query_scalar(
        "INSERT INTO orders (table_id, status, total_amount, special_requests, idempotency_key, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(data.table_id)
    .bind(OrderStatus::Pending)
    .bind(total)
    .bind(
        data.special_requests
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty()),
    )
    .bind(key)
    .bind(now)
    .bind(now)
    .fetch_one(&mut *tx)
    .await;

    let order_id = match inserted {
        Ok(id) => id,
        Err(e) => {
            if let (Some(key), sqlx::Error::Database(db)) = (key, &e)
                && db.is_unique_violation()
            {
                // 并发重复提交: 另一个请求已写入
                drop(tx);
                let existing = find_by_idempotency_key(pool, key)
                    .await?
                    .ok_or_else(|| AppError::database("Idempotent order vanished"))?;
                return Ok(Submitted {
                    order: existing,
                    created: false,
                });
            }
            return Err(e.into());
        }
    };

    for (menu_item_id, quantity, unit_price) in &priced {
        sqlx::query(
            "INSERT INTO order_items (order_id, menu_item_id, quantity, unit_price, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(order_id)
        .bind(menu_item_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(order_id, table_id = data.table_id, total, "Order submitted");

    let order = find_detail(pool, order_id)
        .await?
        .ok_or_else(|| AppError::database("Failed to load submitted order"))?;
    Ok(Submitted {
        order,
        created: true,
    })
}

async fn find_by_idempotency_key(pool: &SqlitePool, key: &str) -> ServiceResult<Option<OrderDetail>> {
    let id: Option<i64> = sqlx::query_scalar("SELECT id FROM orders WHERE idempotency_key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;
    match id {
        Some(id) => find_detail(pool, id).await,
        None => Ok(None),
    }
}

/// Order header only
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> ServiceResult<Option<Order>> {
    let sql = format!("SELECT {HEADER_COLUMNS} FROM orders o WHERE o.id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(order)
}

/// Order with table number and lines
pub async fn find_detail(pool: &SqlitePool, id: i64) -> ServiceResult<Option<OrderDetail>> {
    let sql = format!(
        "SELECT {HEADER_COLUMNS}, t.table_number FROM orders o \
         LEFT JOIN tables t ON t.id = o.table_id WHERE o.id = ?"
    );
    let row = sqlx::query_as::<_, HeaderRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(row) = row else {
        return Ok(None);
    };
    let mut lines = load_lines(pool, &[id]).await?;
    Ok(Some(OrderDetail {
        order: row.order,
        table_number: row.table_number,
        items: lines.remove(&id).unwrap_or_default(),
    }))
}

/// Filtered listing with lines embedded
pub async fn find_all(pool: &SqlitePool, filter: &OrderFilter) -> ServiceResult<Vec<OrderDetail>> {
    let direction = if filter.oldest_first { "ASC" } else { "DESC" };
    let sql = format!(
        "SELECT {HEADER_COLUMNS}, t.table_number FROM orders o \
         LEFT JOIN tables t ON t.id = o.table_id \
         WHERE (?1 IS NULL OR o.status = ?1) \
           AND (?2 IS NULL OR o.table_id = ?2) \
           AND (?3 IS NULL OR o.created_at >= ?3) \
           AND (?4 IS NULL OR o.created_at < ?4) \
           AND (?5 = 0 OR o.status != 'cancelled') \
         ORDER BY o.created_at {direction}, o.id {direction}"
    );
    let rows = sqlx::query_as::<_, HeaderRow>(&sql)
        .bind(filter.status)
        .bind(filter.table_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(filter.exclude_cancelled)
        .fetch_all(pool)
        .await?;

    let ids: Vec<i64> = rows.iter().map(|r| r.order.id).collect();
    let mut lines = load_lines(pool, &ids).await?;
    Ok(rows
        .into_iter()
        .map(|row| OrderDetail {
            items: lines.remove(&row.order.id).unwrap_or_default(),
            table_number: row.table_number,
            order: row.order,
        })
        .collect())
}

async fn load_lines(pool: &SqlitePool, ids: &[i64]) -> ServiceResult<HashMap<i64, Vec<OrderLine>>> {
    let mut grouped: HashMap<i64, Vec<OrderLine>> = HashMap::new();
    for chunk in ids.chunks(LINE_CHUNK) {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT oi.id, oi.order_id, oi.menu_item_id, oi.quantity, oi.unit_price, oi.created_at, \
             mi.name AS menu_item_name FROM order_items oi \
             LEFT JOIN menu_items mi ON mi.id = oi.menu_item_id WHERE oi.order_id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in chunk {
            separated.push_bind(*id);
        }
        separated.push_unseparated(") ORDER BY oi.order_id, oi.id");

        let rows: Vec<OrderLine> = qb.build_query_as().fetch_all(pool).await?;
        for line in rows {
            grouped.entry(line.item.order_id).or_default().push(line);
        }
    }
    Ok(grouped)
}

/// Outcome of a status update
#[derive(Debug, Clone)]
pub struct StatusChange {
    pub order: Order,
    /// False when the order already had the requested status
    pub changed: bool,
}

/// Move an order to `next`, enforcing the lifecycle
///
/// The write is conditional on the status read, so two racing updates
/// cannot both apply.
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    next: OrderStatus,
) -> ServiceResult<StatusChange> {
    let current = find_by_id(pool, id).await?.ok_or_else(|| not_found(id))?;
    if current.status == next {
        return Ok(StatusChange {
            order: current,
            changed: false,
        });
    }
    current.status.transition_to(next)?;

    let rows = sqlx::query(
        "UPDATE orders SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
    )
    .bind(next)
    .bind(now_millis())
    .bind(id)
    .bind(current.status)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::with_message(
            ErrorCode::InvalidStatusTransition,
            format!("Order {id} was changed concurrently"),
        )
        .with_detail("order_id", id)
        .into());
    }

    let order = find_by_id(pool, id).await?.ok_or_else(|| not_found(id))?;
    tracing::info!(order_id = id, from = %current.status, to = %next, "Order status updated");
    Ok(StatusChange {
        order,
        changed: true,
    })
}

/// Delete a cancelled order and its lines; returns the deleted header
pub async fn delete(pool: &SqlitePool, id: i64) -> ServiceResult<Order> {
    let mut tx = super::begin_write(pool).await?;

    let sql = format!("SELECT {HEADER_COLUMNS} FROM orders o WHERE o.id = ?");
    let order = sqlx::query_as::<_, Order>(&sql)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| not_found(id))?;
    if order.status != OrderStatus::Cancelled {
        return Err(AppError::new(ErrorCode::OrderNotCancelled)
            .with_detail("order_id", id)
            .with_detail("status", order.status.as_str())
            .into());
    }

    sqlx::query("DELETE FROM order_items WHERE order_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(order)
}

/// Counts and revenue for orders created at or after `since`
pub async fn dashboard_stats(pool: &SqlitePool, since: i64) -> ServiceResult<DashboardStats> {
    let rows: Vec<(OrderStatus, i64, i64)> = sqlx::query_as(
        "SELECT status, COUNT(*), COALESCE(SUM(total_amount), 0) FROM orders \
         WHERE created_at >= ? GROUP BY status",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    let mut stats = DashboardStats::default();
    for (status, count, amount) in rows {
        stats.total_orders += count;
        if status != OrderStatus::Cancelled {
            stats.total_revenue += amount;
        }
        let slot = match status {
            OrderStatus::Pending => &mut stats.pending,
            OrderStatus::Confirmed => &mut stats.confirmed,
            OrderStatus::Preparing => &mut stats.preparing,
            OrderStatus::Ready => &mut stats.ready,
            OrderStatus::Served => &mut stats.served,
            OrderStatus::Cancelled => &mut stats.cancelled,
        };
        *slot += count;
    }
    let billable = stats.total_orders - stats.cancelled;
    if billable > 0 {
        stats.average_order_value = stats.total_revenue / billable;
    }
    Ok(stats)
}
