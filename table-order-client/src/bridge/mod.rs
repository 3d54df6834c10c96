//! Realtime propagation bridge
//!
//! Keeps a local view of server orders current:
//!
//! ```text
//! open ──► baseline fetch ──► subscribe ──► Ready ──► refetch ──► Live
//!                                ▲                                 │ feed ends / error / silent
//!                                └── backoff ◄─────────────────────┘
//! ```
//!
//! - [`OrderStatusTracker`]: one order, merges header updates in place
//! - [`OrderBoard`]: an order list, refetched on any change
//!
//! Both run one background task and publish through a `watch` channel.
//! Dropping the tracker or board cancels the task, which drops the feed
//! stream and with it the subscription.

mod board;
mod tracker;

pub use board::{BoardState, OrderBoard};
pub use tracker::{OrderStatusTracker, TrackedOrder};

use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use serde::Serialize;
use shared::realtime::{ChannelScope, OrderChange, RealtimeMessage};
use tokio_util::sync::CancellationToken;

use crate::feed::{ChangeFeed, ChangeStream, FeedEvent};
use crate::{BridgeConfig, ClientResult};

/// Feed connection state as seen by a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionState {
    Connecting,
    Live,
    /// Waiting to retry after `attempt` consecutive failures
    Reconnecting { attempt: u32 },
    /// Retries exhausted; the view is no longer updated
    Failed,
}

impl ConnectionState {
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }
}

/// View-specific reactions to feed events
#[async_trait]
pub(crate) trait FeedHandler: Send + 'static {
    /// Reload the authoritative state
    async fn refetch(&mut self) -> ClientResult<()>;

    async fn on_change(&mut self, change: OrderChange) -> ClientResult<()>;

    fn on_connection(&mut self, state: ConnectionState);
}

enum StreamExit {
    Cancelled,
    Disconnected,
}

/// Drive `handler` from `feed` until cancelled or retries run out
///
/// Every `Ready`, the first one included, is followed by a refetch. The
/// server subscribes before sending `Ready`, so a load made after it
/// cannot miss a change committed between the caller's baseline fetch
/// and the subscription.
pub(crate) async fn run_bridge<H: FeedHandler>(
    feed: Arc<dyn ChangeFeed>,
    scope: ChannelScope,
    config: BridgeConfig,
    mut handler: H,
    cancel: CancellationToken,
) {
    let channel = scope.channel_name();
    let mut failures = 0u32;
    let mut refetch_on_ready = true;

    handler.on_connection(ConnectionState::Connecting);

    loop {
        let subscribed = tokio::select! {
            _ = cancel.cancelled() => return,
            result = feed.subscribe(scope) => result,
        };

        match subscribed {
            Ok(mut stream) => {
                let exit = pump(
                    &mut stream,
                    &mut handler,
                    &config,
                    &cancel,
                    &mut refetch_on_ready,
                    &mut failures,
                )
                .await;
                if let StreamExit::Cancelled = exit {
                    tracing::debug!(channel = %channel, "Bridge cancelled");
                    return;
                }
            }
            Err(e) => {
                tracing::warn!(channel = %channel, error = %e, "Realtime subscribe failed");
            }
        }

        // 断开后需重新拉取基线, 中间的变更可能已丢失
        refetch_on_ready = true;
        failures += 1;
        if !config.may_retry(failures) {
            tracing::error!(
                channel = %channel,
                attempts = failures - 1,
                "Realtime reconnect attempts exhausted"
            );
            handler.on_connection(ConnectionState::Failed);
            return;
        }

        handler.on_connection(ConnectionState::Reconnecting { attempt: failures });
        let delay = config.backoff(failures);
        tracing::info!(
            channel = %channel,
            attempt = failures,
            delay_ms = delay.as_millis() as u64,
            "Reconnecting realtime feed"
        );

        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
    }
}

async fn pump<H: FeedHandler>(
    stream: &mut ChangeStream,
    handler: &mut H,
    config: &BridgeConfig,
    cancel: &CancellationToken,
    refetch_on_ready: &mut bool,
    failures: &mut u32,
) -> StreamExit {
    loop {
        let next = tokio::select! {
            _ = cancel.cancelled() => return StreamExit::Cancelled,
            next = tokio::time::timeout(config.heartbeat_timeout, stream.next()) => next,
        };

        let event = match next {
            Err(_) => {
                tracing::warn!(
                    timeout_ms = config.heartbeat_timeout.as_millis() as u64,
                    "Realtime feed silent, treating as disconnected"
                );
                return StreamExit::Disconnected;
            }
            Ok(None) => {
                tracing::info!("Realtime feed closed");
                return StreamExit::Disconnected;
            }
            Ok(Some(Err(e))) => {
                tracing::warn!(error = %e, "Realtime feed error");
                return StreamExit::Disconnected;
            }
            Ok(Some(Ok(event))) => event,
        };

        let result = match event {
            FeedEvent::Heartbeat => Ok(()),
            FeedEvent::Message(RealtimeMessage::Ready { .. }) => {
                *failures = 0;
                let result = if *refetch_on_ready {
                    handler.refetch().await
                } else {
                    Ok(())
                };
                *refetch_on_ready = false;
                handler.on_connection(ConnectionState::Live);
                result
            }
            FeedEvent::Message(RealtimeMessage::Change(change)) => handler.on_change(change).await,
            FeedEvent::Message(RealtimeMessage::Resync) => {
                tracing::debug!("Realtime feed asked for resync");
                handler.refetch().await
            }
        };

        // 拉取失败不断开连接, 等下一条事件再试
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to apply realtime event");
        }
    }
}
