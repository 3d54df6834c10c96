use std::sync::Arc;

use async_trait::async_trait;
use shared::models::{OrderDetail, OrderQuery};
use shared::realtime::{ChannelScope, OrderChange};
use tokio::sync::watch;
use tokio_util::sync::{CancellationToken, DropGuard};

use super::{ConnectionState, FeedHandler, run_bridge};
use crate::feed::ChangeFeed;
use crate::source::OrderSource;
use crate::{BridgeConfig, ClientError, ClientResult};

/// Staff order list
#[derive(Debug, Clone, PartialEq)]
pub struct BoardState {
    pub orders: Vec<OrderDetail>,
    pub connection: ConnectionState,
    /// Completed list loads, baseline included
    pub loads: u64,
}

/// Order list that reloads on any change
///
/// Change payloads carry no lines, so every insert, update or delete
/// triggers a full refetch with the board's filters.
pub struct OrderBoard {
    state: watch::Receiver<BoardState>,
    _guard: DropGuard,
}

impl OrderBoard {
    pub async fn open(
        source: Arc<dyn OrderSource>,
        feed: Arc<dyn ChangeFeed>,
        query: OrderQuery,
        config: BridgeConfig,
    ) -> ClientResult<Self> {
        let orders = source.fetch_orders(&query).await?;
        let (tx, rx) = watch::channel(BoardState {
            orders,
            connection: ConnectionState::Connecting,
            loads: 1,
        });

        let cancel = CancellationToken::new();
        let handler = BoardHandler { source, query, tx };
        tokio::spawn(run_bridge(
            feed,
            ChannelScope::AllOrders,
            config,
            handler,
            cancel.clone(),
        ));

        Ok(Self {
            state: rx,
            _guard: cancel.drop_guard(),
        })
    }

    pub fn current(&self) -> BoardState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<BoardState> {
        self.state.clone()
    }

    pub async fn wait_for(
        &mut self,
        predicate: impl FnMut(&BoardState) -> bool,
    ) -> ClientResult<BoardState> {
        let state = self
            .state
            .wait_for(predicate)
            .await
            .map_err(|_| ClientError::Closed)?;
        Ok(state.clone())
    }
}

struct BoardHandler {
    source: Arc<dyn OrderSource>,
    query: OrderQuery,
    tx: watch::Sender<BoardState>,
}

#[async_trait]
impl FeedHandler for BoardHandler {
    async fn refetch(&mut self) -> ClientResult<()> {
        let orders = self.source.fetch_orders(&self.query).await?;
        self.tx.send_modify(|board| {
            board.orders = orders;
            board.loads += 1;
        });
        Ok(())
    }

    async fn on_change(&mut self, change: OrderChange) -> ClientResult<()> {
        tracing::debug!(order_id = change.order.id, kind = ?change.kind, "Board refetch");
        self.refetch().await
    }

    fn on_connection(&mut self, state: ConnectionState) {
        self.tx.send_if_modified(|board| {
            let changed = board.connection != state;
            board.connection = state;
            changed
        });
    }
}
