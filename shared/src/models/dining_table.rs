//! Dining Table Model

use serde::{Deserialize, Serialize};

use crate::order::TableStatus;

/// Dining table entity (桌台)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct DiningTable {
    pub id: i64,
    /// Positive, unique within the restaurant
    pub table_number: i32,
    /// Menu URL encoded into the printed QR code; fixed at creation
    pub qr_code: String,
    pub status: TableStatus,
    pub created_at: i64,
}

/// Create dining table payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiningTableCreate {
    pub table_number: i32,
}

/// Update table status payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableStatusUpdate {
    pub status: TableStatus,
}
