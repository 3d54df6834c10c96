//! 订单生命周期
//!
//! ```text
//! pending ─► confirmed ─► preparing ─► ready ─► served
//!    │           │            │          │
//!    └───────────┴────────────┴──────────┴─────► cancelled
//! ```
//!
//! `served` and `cancelled` are terminal. Forward moves may skip steps;
//! backward moves and moves out of a terminal state are rejected.

mod display;
mod status;
mod table_status;
mod timeline;

pub use display::{StatusColor, StatusIcon};
pub use status::OrderStatus;
pub use table_status::TableStatus;
pub use timeline::{TimelineStep, status_timeline};
