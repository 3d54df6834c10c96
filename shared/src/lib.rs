//! Shared types for the table-order workspace
//!
//! Domain models, the order lifecycle state machine, the cart aggregate,
//! report rollups and realtime change payloads. Used by both the server
//! and the client crate; everything here is free of I/O except the
//! `CartStorage` seam.

pub mod cart;
pub mod error;
pub mod models;
pub mod order;
pub mod realtime;
pub mod report;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use order::{OrderStatus, TableStatus};
pub use realtime::{ChangeKind, ChannelScope, OrderChange, RealtimeMessage};
