//! Report Repository

use chrono_tz::Tz;
use shared::report::{SalesReport, build_report};
use sqlx::SqlitePool;

use super::order::{self, OrderFilter};
use crate::core::ServiceResult;

/// Sales report over `[from, to)` Unix millis; cancelled orders are excluded
pub async fn sales_report(pool: &SqlitePool, from: i64, to: i64, tz: Tz) -> ServiceResult<SalesReport> {
    let filter = OrderFilter {
        from: Some(from),
        to: Some(to),
        exclude_cancelled: true,
        oldest_first: true,
        ..Default::default()
    };
    let orders = order::find_all(pool, &filter).await?;
    tracing::debug!(orders = orders.len(), from, to, "Building sales report");
    Ok(build_report(&orders, tz))
}
