//! Sales Report API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::error::AppError;
use shared::report::{ReportPeriod, SalesReport};

use crate::core::{ServerState, ServiceResult};
use crate::db::repository::report;
use crate::utils::time::{day_end_millis, day_start_millis, parse_date, today};

#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    #[serde(default)]
    pub period: ReportPeriod,
    /// Required for `custom`, YYYY-MM-DD inclusive
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// GET /api/reports - 销售报表 (不含已取消订单)
pub async fn sales_report(
    State(state): State<ServerState>,
    Query(query): Query<ReportQuery>,
) -> ServiceResult<Json<SalesReport>> {
    let tz = state.config.timezone;
    let (start, end) = match query.period.date_range(today(tz)) {
        Some(range) => range,
        None => {
            let (Some(from), Some(to)) = (query.date_from.as_deref(), query.date_to.as_deref())
            else {
                return Err(AppError::validation(
                    "date_from and date_to are required for a custom period",
                )
                .into());
            };
            (parse_date(from)?, parse_date(to)?)
        }
    };
    if start > end {
        return Err(AppError::validation(format!("date_from {start} is after date_to {end}")).into());
    }

    let report = report::sales_report(
        &state.pool,
        day_start_millis(start, tz),
        day_end_millis(end, tz),
        tz,
    )
    .await?;
    Ok(Json(report))
}
