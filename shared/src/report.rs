//! Sales report rollups
//!
//! Pure transforms over a date-filtered list of orders with their lines.
//! Cancelled orders are expected to be filtered out by the query.
//!
//! Popular items are grouped by menu item *name*: two different items that
//! share a name are merged into one row.

use std::collections::{BTreeMap, HashMap};
use std::ops::RangeInclusive;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::models::OrderDetail;

pub const POPULAR_ITEMS_LIMIT: usize = 10;

/// Hours shown on the hourly chart
pub const BUSINESS_HOURS: RangeInclusive<u32> = 11..=22;

/// Placeholder until kitchen timing is recorded
pub const PLACEHOLDER_AVERAGE_ORDER_MINUTES: u32 = 18;

/// Placeholder until customer feedback is collected
pub const PLACEHOLDER_CUSTOMER_SATISFACTION: f64 = 4.6;

pub const UNKNOWN_ITEM_NAME: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySales {
    /// `YYYY-MM-DD` in the business time zone
    pub date: String,
    pub revenue: i64,
    pub order_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularItem {
    pub name: String,
    pub quantity: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlySales {
    pub hour: u32,
    pub order_count: i64,
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total_revenue: i64,
    pub total_orders: i64,
    pub average_order_value: i64,
    /// Placeholder constant, not measured
    pub average_order_minutes: u32,
    /// Placeholder constant, not measured
    pub customer_satisfaction: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub summary: ReportSummary,
    pub daily_sales: Vec<DailySales>,
    pub popular_items: Vec<PopularItem>,
    /// All 24 buckets; use [`business_hours`] for display
    pub hourly: Vec<HourlySales>,
}

fn local_time(millis: i64, tz: Tz) -> DateTime<Tz> {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .unwrap_or_default()
        .with_timezone(&tz)
}

/// Revenue and order count per local calendar date, ascending by date
pub fn daily_sales(orders: &[OrderDetail], tz: Tz) -> Vec<DailySales> {
    let mut by_date: BTreeMap<NaiveDate, (i64, i64)> = BTreeMap::new();
    for detail in orders {
        let date = local_time(detail.order.created_at, tz).date_naive();
        let entry = by_date.entry(date).or_default();
        entry.0 += detail.order.total_amount;
        entry.1 += 1;
    }
    by_date
        .into_iter()
        .map(|(date, (revenue, order_count))| DailySales {
            date: date.format("%Y-%m-%d").to_string(),
            revenue,
            order_count,
        })
        .collect()
}

/// Best sellers by quantity, at most `limit` rows
///
/// Ties keep first-appearance order.
pub fn popular_items(orders: &[OrderDetail], limit: usize) -> Vec<PopularItem> {
    let mut rows: Vec<PopularItem> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in orders.iter().flat_map(|d| d.items.iter()) {
        let name = line
            .menu_item_name
            .clone()
            .unwrap_or_else(|| UNKNOWN_ITEM_NAME.to_string());
        let quantity = i64::from(line.item.quantity);
        let revenue = line.item.line_total();

        match index.get(&name) {
            Some(&i) => {
                rows[i].quantity += quantity;
                rows[i].revenue += revenue;
            }
            None => {
                index.insert(name.clone(), rows.len());
                rows.push(PopularItem {
                    name,
                    quantity,
                    revenue,
                });
            }
        }
    }

    // sort_by is stable
    rows.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    rows.truncate(limit);
    rows
}

/// 24 hourly buckets by local hour of creation
pub fn hourly_distribution(orders: &[OrderDetail], tz: Tz) -> Vec<HourlySales> {
    let mut buckets: Vec<HourlySales> = (0..24)
        .map(|hour| HourlySales {
            hour,
            order_count: 0,
            revenue: 0,
        })
        .collect();
    for detail in orders {
        let hour = local_time(detail.order.created_at, tz).hour() as usize;
        let bucket = &mut buckets[hour];
        bucket.order_count += 1;
        bucket.revenue += detail.order.total_amount;
    }
    buckets
}

/// Buckets inside [`BUSINESS_HOURS`]
pub fn business_hours(hourly: &[HourlySales]) -> Vec<HourlySales> {
    hourly
        .iter()
        .filter(|h| BUSINESS_HOURS.contains(&h.hour))
        .cloned()
        .collect()
}

/// Totals derived from the daily rows so both views always agree
pub fn summarize(daily: &[DailySales]) -> ReportSummary {
    let total_revenue: i64 = daily.iter().map(|d| d.revenue).sum();
    let total_orders: i64 = daily.iter().map(|d| d.order_count).sum();
    let average_order_value = if total_orders > 0 {
        total_revenue / total_orders
    } else {
        0
    };
    ReportSummary {
        total_revenue,
        total_orders,
        average_order_value,
        average_order_minutes: PLACEHOLDER_AVERAGE_ORDER_MINUTES,
        customer_satisfaction: PLACEHOLDER_CUSTOMER_SATISFACTION,
    }
}

pub fn build_report(orders: &[OrderDetail], tz: Tz) -> SalesReport {
    let daily_sales = daily_sales(orders, tz);
    SalesReport {
        summary: summarize(&daily_sales),
        popular_items: popular_items(orders, POPULAR_ITEMS_LIMIT),
        hourly: hourly_distribution(orders, tz),
        daily_sales,
    }
}

/// Preset report ranges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Today,
    #[default]
    Week,
    Month,
    Custom,
}

impl ReportPeriod {
    /// Inclusive local date range ending today; `None` for `Custom`
    pub fn date_range(&self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        let start = match self {
            Self::Today => today,
            Self::Week => today - Duration::days(7),
            Self::Month => today.with_day(1).unwrap_or(today),
            Self::Custom => return None,
        };
        Some((start, today))
    }
}
