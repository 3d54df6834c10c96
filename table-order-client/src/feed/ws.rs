use async_trait::async_trait;
use futures::{StreamExt, stream};
use shared::realtime::{ChannelScope, RealtimeMessage};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use super::{ChangeFeed, ChangeStream, FeedEvent};
use crate::{ClientError, ClientResult, HttpClient};

/// WebSocket change feed against `/api/realtime/orders[/{id}]`
#[derive(Debug, Clone)]
pub struct WsChangeFeed {
    client: HttpClient,
}

impl WsChangeFeed {
    /// Reuse the HTTP client's base URL (`http` → `ws`)
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    pub fn url(&self, scope: ChannelScope) -> String {
        self.client.ws_url(scope)
    }
}

#[async_trait]
impl ChangeFeed for WsChangeFeed {
    async fn subscribe(&self, scope: ChannelScope) -> ClientResult<ChangeStream> {
        let url = self.url(scope);
        let (socket, _) = connect_async(url.as_str()).await?;
        tracing::debug!(url = %url, "Realtime feed connected");

        let events = stream::unfold(Some(socket), |socket| async move {
            let mut socket = socket?;
            loop {
                match socket.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let event = serde_json::from_str::<RealtimeMessage>(text.as_str())
                            .map(FeedEvent::Message)
                            .map_err(ClientError::from);
                        return Some((event, Some(socket)));
                    }
                    Some(Ok(Message::Ping(_) | Message::Pong(_))) => {
                        return Some((Ok(FeedEvent::Heartbeat), Some(socket)));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        tracing::debug!(?frame, "Realtime feed closed by server");
                        return None;
                    }
                    Some(Ok(_)) => continue,
                    // 出错后结束流, 由桥接层负责重连
                    Some(Err(e)) => return Some((Err(e.into()), None)),
                    None => return None,
                }
            }
        });

        Ok(events.boxed())
    }
}
