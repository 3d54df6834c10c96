//! Realtime change payloads
//!
//! Server → client frames on the order channels:
//!
//! ```text
//! Ready { scope }        handshake, sent once per subscription
//! Change(OrderChange)    row-level INSERT / UPDATE / DELETE
//! Resync                 subscriber lagged; refetch the baseline
//! ```
//!
//! Changes carry the row's new field values only, never joined lines.

use serde::{Deserialize, Serialize};

use crate::models::Order;

/// Row-level change kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A change to one order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderChange {
    pub kind: ChangeKind,
    /// New values (last known values for `Delete`)
    pub order: Order,
}

impl OrderChange {
    pub fn insert(order: Order) -> Self {
        Self {
            kind: ChangeKind::Insert,
            order,
        }
    }

    pub fn update(order: Order) -> Self {
        Self {
            kind: ChangeKind::Update,
            order,
        }
    }

    pub fn delete(order: Order) -> Self {
        Self {
            kind: ChangeKind::Delete,
            order,
        }
    }
}

/// Subscription scope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "id", rename_all = "snake_case")]
pub enum ChannelScope {
    /// Every order (staff dashboard / order list)
    AllOrders,
    /// A single order by id (customer status page)
    Order(i64),
}

impl ChannelScope {
    pub fn matches(&self, change: &OrderChange) -> bool {
        match self {
            Self::AllOrders => true,
            Self::Order(id) => change.order.id == *id,
        }
    }

    /// Channel name, `orders` or `order_{id}`
    pub fn channel_name(&self) -> String {
        match self {
            Self::AllOrders => "orders".to_string(),
            Self::Order(id) => format!("order_{id}"),
        }
    }

    /// WebSocket path relative to the server base URL
    pub fn ws_path(&self) -> String {
        match self {
            Self::AllOrders => "/api/realtime/orders".to_string(),
            Self::Order(id) => format!("/api/realtime/orders/{id}"),
        }
    }
}

/// Server → client frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum RealtimeMessage {
    Ready { scope: ChannelScope },
    Change(OrderChange),
    Resync,
}
