//! Data models
//!
//! Shared between the server and clients (via the HTTP API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! IDs are `i64` (SQLite INTEGER PRIMARY KEY), timestamps are Unix millis,
//! money is `i64` in the smallest currency unit.

pub mod category;
pub mod dining_table;
pub mod menu_item;
pub mod order;

// Re-exports
pub use category::*;
pub use dining_table::*;
pub use menu_item::*;
pub use order::*;
