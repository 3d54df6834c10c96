use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

use async_trait::async_trait;
use futures::{StreamExt, stream};
use shared::realtime::{ChannelScope, OrderChange, RealtimeMessage};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

use super::{ChangeFeed, ChangeStream, FeedEvent};
use crate::{ClientError, ClientResult};

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
enum Signal {
    Change(OrderChange),
    Heartbeat,
    Disconnect,
}

#[derive(Debug)]
struct Inner {
    tx: broadcast::Sender<Signal>,
    refuse_next: AtomicU32,
    subscriptions: AtomicU64,
}

/// In-process change feed
///
/// Same framing as the WebSocket feed (`Ready` first, scope filtering,
/// `Resync` on lag) without a network hop. Clones share one channel.
#[derive(Debug, Clone)]
pub struct MemoryChangeFeed {
    inner: Arc<Inner>,
}

impl Default for MemoryChangeFeed {
    fn default() -> Self {
        Self::with_capacity(CHANNEL_CAPACITY)
    }
}

impl MemoryChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            inner: Arc::new(Inner {
                tx,
                refuse_next: AtomicU32::new(0),
                subscriptions: AtomicU64::new(0),
            }),
        }
    }

    /// Deliver a change to every live subscription whose scope matches.
    /// Returns the number of live subscriptions.
    pub fn publish(&self, change: OrderChange) -> usize {
        self.inner.tx.send(Signal::Change(change)).unwrap_or(0)
    }

    pub fn heartbeat(&self) {
        let _ = self.inner.tx.send(Signal::Heartbeat);
    }

    /// End every open stream, as if the connection dropped
    pub fn disconnect_all(&self) {
        let _ = self.inner.tx.send(Signal::Disconnect);
    }

    /// Make the next `count` subscribe calls fail
    pub fn refuse_next(&self, count: u32) {
        self.inner.refuse_next.store(count, Ordering::SeqCst);
    }

    /// Streams currently holding a receiver
    pub fn subscriber_count(&self) -> usize {
        self.inner.tx.receiver_count()
    }

    /// Successful subscribe calls so far
    pub fn subscription_count(&self) -> u64 {
        self.inner.subscriptions.load(Ordering::SeqCst)
    }

    fn take_refusal(&self) -> bool {
        self.inner
            .refuse_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl ChangeFeed for MemoryChangeFeed {
    async fn subscribe(&self, scope: ChannelScope) -> ClientResult<ChangeStream> {
        if self.take_refusal() {
            return Err(ClientError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "memory feed refused subscription",
            )));
        }

        // 先订阅再发 Ready, 之后发布的变更不会丢
        let rx = self.inner.tx.subscribe();
        self.inner.subscriptions.fetch_add(1, Ordering::SeqCst);

        let ready = stream::once(async move {
            Ok(FeedEvent::Message(RealtimeMessage::Ready { scope }))
        });
        let changes = stream::unfold(rx, move |mut rx| async move {
            loop {
                match rx.recv().await {
                    Ok(Signal::Change(change)) if scope.matches(&change) => {
                        let event = FeedEvent::Message(RealtimeMessage::Change(change));
                        return Some((Ok(event), rx));
                    }
                    Ok(Signal::Change(_)) => continue,
                    Ok(Signal::Heartbeat) => return Some((Ok(FeedEvent::Heartbeat), rx)),
                    Ok(Signal::Disconnect) | Err(RecvError::Closed) => return None,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "Memory feed subscriber lagged");
                        return Some((Ok(FeedEvent::Message(RealtimeMessage::Resync)), rx));
                    }
                }
            }
        });

        Ok(ready.chain(changes).boxed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Order;
    use shared::order::OrderStatus;

    fn order(id: i64, status: OrderStatus) -> Order {
        Order {
            id,
            table_id: 1,
            status,
            total_amount: 1000,
            special_requests: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    async fn next(stream: &mut ChangeStream) -> FeedEvent {
        stream.next().await.unwrap().unwrap()
    }

    #[tokio::test]
    async fn test_ready_then_scoped_changes() {
        let feed = MemoryChangeFeed::new();
        let mut stream = feed.subscribe(ChannelScope::Order(2)).await.unwrap();
        assert_eq!(
            next(&mut stream).await,
            FeedEvent::Message(RealtimeMessage::Ready {
                scope: ChannelScope::Order(2)
            })
        );

        feed.publish(OrderChange::update(order(1, OrderStatus::Ready)));
        feed.publish(OrderChange::update(order(2, OrderStatus::Preparing)));

        match next(&mut stream).await {
            FeedEvent::Message(RealtimeMessage::Change(change)) => {
                assert_eq!(change.order.id, 2);
                assert_eq!(change.order.status, OrderStatus::Preparing);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_disconnect_ends_stream_and_releases_receiver() {
        let feed = MemoryChangeFeed::new();
        let mut stream = feed.subscribe(ChannelScope::AllOrders).await.unwrap();
        assert_eq!(feed.subscriber_count(), 1);
        next(&mut stream).await;

        feed.disconnect_all();
        assert!(stream.next().await.is_none());

        drop(stream);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_refuse_next() {
        let feed = MemoryChangeFeed::new();
        feed.refuse_next(1);
        assert!(feed.subscribe(ChannelScope::AllOrders).await.is_err());
        assert!(feed.subscribe(ChannelScope::AllOrders).await.is_ok());
        assert_eq!(feed.subscription_count(), 1);
    }

    #[tokio::test]
    async fn test_lag_yields_resync() {
        let feed = MemoryChangeFeed::with_capacity(2);
        let mut stream = feed.subscribe(ChannelScope::AllOrders).await.unwrap();
        next(&mut stream).await;

        for id in 0..5 {
            feed.publish(OrderChange::insert(order(id, OrderStatus::Pending)));
        }
        assert_eq!(
            next(&mut stream).await,
            FeedEvent::Message(RealtimeMessage::Resync)
        );
    }
}
