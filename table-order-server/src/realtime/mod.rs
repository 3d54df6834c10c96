//! OrderHub - 订单变更实时分发
//!
//! ```text
//! orders handler (insert / status update / delete)
//!       │ OrderChange
//!       ▼
//! OrderHub ── broadcast::Sender<OrderChange>
//!       │
//!       ├── WS session (scope = all orders)
//!       └── WS session (scope = order_{id})
//! ```
//!
//! Publishing happens after the database commit, so a subscriber never
//! sees a change that was rolled back. Filtering by scope is done per
//! session.

use shared::realtime::OrderChange;
use tokio::sync::broadcast;

/// Broadcast channel 容量
const BROADCAST_CAPACITY: usize = 256;

/// Fan-out of committed order changes
#[derive(Clone)]
pub struct OrderHub {
    tx: broadcast::Sender<OrderChange>,
}

impl Default for OrderHub {
    fn default() -> Self {
        Self::new()
    }
}

impl OrderHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    /// 广播（无订阅者时 send 返回 Err，安全忽略）
    pub fn publish(&self, change: OrderChange) {
        tracing::debug!(
            order_id = change.order.id,
            kind = ?change.kind,
            subscribers = self.tx.receiver_count(),
            "Publishing order change"
        );
        let _ = self.tx.send(change);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<OrderChange> {
        self.tx.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
