//! Order Model

use serde::{Deserialize, Serialize};

use crate::order::OrderStatus;

/// Order header row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    pub table_id: i64,
    pub status: OrderStatus,
    /// Σ quantity × unit_price at submission; tax is not included
    pub total_amount: i64,
    pub special_requests: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub menu_item_id: i64,
    pub quantity: i32,
    /// Price snapshot taken at submission, never re-derived from the menu
    pub unit_price: i64,
    pub created_at: i64,
}

impl OrderItem {
    pub fn line_total(&self) -> i64 {
        i64::from(self.quantity) * self.unit_price
    }
}

/// Order line joined with the menu item name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderLine {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub item: OrderItem,
    pub menu_item_name: Option<String>,
}

/// Order with table number and lines embedded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub table_number: Option<i32>,
    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl OrderDetail {
    /// Apply a changed header row from a realtime update
    ///
    /// Only header fields are replaced; lines are kept as loaded. Returns
    /// false when the row belongs to another order.
    pub fn merge_update(&mut self, row: &Order) -> bool {
        if row.id != self.order.id {
            return false;
        }
        self.order = row.clone();
        true
    }

    /// Σ quantity × unit_price over the embedded lines
    pub fn lines_total(&self) -> i64 {
        self.items.iter().map(|l| l.item.line_total()).sum()
    }
}

/// One requested line of a submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub menu_item_id: i64,
    pub quantity: i32,
}

/// Submit order payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub table_id: i64,
    pub special_requests: Option<String>,
    pub items: Vec<OrderLineInput>,
    /// Total the customer saw; a mismatch with live prices rejects the order
    pub expected_total: Option<i64>,
    /// Repeated submissions with the same key return the first order
    pub idempotency_key: Option<String>,
}

/// Update order status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

/// Order listing filters
///
/// Dates are `YYYY-MM-DD` in the business time zone, both inclusive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    pub table_id: Option<i64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

/// Rolling 24h dashboard figures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_orders: i64,
    /// Excludes cancelled orders
    pub total_revenue: i64,
    pub average_order_value: i64,
    pub pending: i64,
    pub confirmed: i64,
    pub preparing: i64,
    pub ready: i64,
    pub served: i64,
    pub cancelled: i64,
}
