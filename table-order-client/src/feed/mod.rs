//! Realtime change feeds
//!
//! A feed turns a [`ChannelScope`] into a stream of [`FeedEvent`]s. The
//! stream is the subscription: dropping it releases the underlying
//! connection or channel receiver.
//!
//! - [`WsChangeFeed`]: WebSocket connection to the server
//! - [`MemoryChangeFeed`]: in-process feed, used by tests and embedders

mod memory;
mod ws;

pub use memory::MemoryChangeFeed;
pub use ws::WsChangeFeed;

use async_trait::async_trait;
use futures::stream::BoxStream;
use shared::realtime::{ChannelScope, RealtimeMessage};

use crate::ClientResult;

/// One item read from a feed
#[derive(Debug, Clone, PartialEq)]
pub enum FeedEvent {
    /// Decoded server frame
    Message(RealtimeMessage),
    /// Keep-alive (ping/pong); carries no data but proves the feed is live
    Heartbeat,
}

/// Stream of feed events; ends when the connection closes
pub type ChangeStream = BoxStream<'static, ClientResult<FeedEvent>>;

#[async_trait]
pub trait ChangeFeed: Send + Sync {
    /// Open a subscription. The first message is `Ready`.
    async fn subscribe(&self, scope: ChannelScope) -> ClientResult<ChangeStream>;
}
