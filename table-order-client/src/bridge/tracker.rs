use std::sync::Arc;

use async_trait::async_trait;
use shared::error::ErrorCode;
use shared::models::OrderDetail;
use shared::order::{OrderStatus, TimelineStep, status_timeline};
use shared::realtime::{ChangeKind, ChannelScope, OrderChange};
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::{ConnectionState, FeedHandler, run_bridge};
use crate::feed::ChangeFeed;
use crate::source::OrderSource;
use crate::{BridgeConfig, ClientError, ClientResult};

/// Customer-facing view of one order
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedOrder {
    pub order: OrderDetail,
    pub connection: ConnectionState,
    /// The order was deleted on the server
    pub removed: bool,
}

impl TrackedOrder {
    pub fn status(&self) -> OrderStatus {
        self.order.order.status
    }

    pub fn timeline(&self) -> Vec<TimelineStep> {
        status_timeline(self.status())
    }
}

/// Live status of a single order
///
/// `open` fetches the order once, then follows `order_{id}` updates and
/// merges header fields into the loaded copy. Lines are never touched by
/// an update.
pub struct OrderStatusTracker {
    order_id: i64,
    state: watch::Receiver<TrackedOrder>,
    _guard: DropGuard,
}

impl OrderStatusTracker {
    pub async fn open(
        source: Arc<dyn OrderSource>,
        feed: Arc<dyn ChangeFeed>,
        order_id: i64,
        config: BridgeConfig,
    ) -> ClientResult<Self> {
        let baseline = source.fetch_order(order_id).await?;
        let (tx, rx) = watch::channel(TrackedOrder {
            order: baseline,
            connection: ConnectionState::Connecting,
            removed: false,
        });

        let cancel = CancellationToken::new();
        let handler = TrackerHandler {
            order_id,
            source,
            tx,
        };
        tokio::spawn(run_bridge(
            feed,
            ChannelScope::Order(order_id),
            config,
            handler,
            cancel.clone(),
        ));
        tracing::debug!(order_id, "Order tracker opened");

        Ok(Self {
            order_id,
            state: rx,
            _guard: cancel.drop_guard(),
        })
    }

    pub fn order_id(&self) -> i64 {
        self.order_id
    }

    /// Snapshot of the current view
    pub fn current(&self) -> TrackedOrder {
        self.state.borrow().clone()
    }

    /// Receiver for observing every change of the view
    pub fn watch(&self) -> watch::Receiver<TrackedOrder> {
        self.state.clone()
    }

    /// Wait until the view satisfies `predicate`
    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&TrackedOrder) -> bool,
    ) -> ClientResult<TrackedOrder> {
        let state = self
            .state
            .wait_for(predicate)
            .await
            .map_err(|_| ClientError::Closed)?;
        Ok(state.clone())
    }
}

struct TrackerHandler {
    order_id: i64,
    source: Arc<dyn OrderSource>,
    tx: watch::Sender<TrackedOrder>,
}

#[async_trait]
impl FeedHandler for TrackerHandler {
    async fn refetch(&mut self) -> ClientResult<()> {
        match self.source.fetch_order(self.order_id).await {
            Ok(order) => {
                self.tx.send_modify(|view| {
                    view.order = order;
                    view.removed = false;
                });
                Ok(())
            }
            Err(e) if matches!(e.code(), Some(ErrorCode::OrderNotFound | ErrorCode::NotFound)) => {
                self.tx.send_modify(|view| view.removed = true);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    async fn on_change(&mut self, change: OrderChange) -> ClientResult<()> {
        if change.order.id != self.order_id {
            return Ok(());
        }
        tracing::debug!(
            order_id = self.order_id,
            kind = ?change.kind,
            status = %change.order.status,
            "Order change received"
        );
        self.tx.send_modify(|view| {
            view.order.merge_update(&change.order);
            if change.kind == ChangeKind::Delete {
                view.removed = true;
            }
        });
        Ok(())
    }

    fn on_connection(&mut self, state: ConnectionState) {
        self.tx.send_if_modified(|view| {
            let changed = view.connection != state;
            view.connection = state;
            changed
        });
    }
}
