//! WebSocket session: hub receiver → scope filter → socket

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use shared::realtime::{ChannelScope, RealtimeMessage};
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::core::ServerState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

/// GET /api/realtime/orders
pub async fn all_orders(State(state): State<ServerState>, ws: WebSocketUpgrade) -> impl IntoResponse {
    ws.on_upgrade(move |socket| session(socket, state, ChannelScope::AllOrders))
}

/// GET /api/realtime/orders/{id}
pub async fn single_order(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| session(socket, state, ChannelScope::Order(id)))
}

async fn session(socket: WebSocket, state: ServerState, scope: ChannelScope) {
    let (mut sink, mut stream) = socket.split();
    let channel = scope.channel_name();

    // 先订阅再发送 Ready，客户端在 Ready 之后拉取的基线不会漏掉变更
    let mut hub_rx = state.hub.subscribe();
    tracing::info!(channel = %channel, "Realtime subscriber connected");

    if send_message(&mut sink, &RealtimeMessage::Ready { scope }).await.is_err() {
        return;
    }

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(change) => {
                        if scope.matches(&change)
                            && send_message(&mut sink, &RealtimeMessage::Change(change)).await.is_err()
                        {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(channel = %channel, lagged = n, "Realtime subscriber lagged, requesting resync");
                        hub_rx = state.hub.subscribe();
                        if send_message(&mut sink, &RealtimeMessage::Resync).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(channel = %channel, error = %e, "Realtime socket error");
                        break;
                    }
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    tracing::info!(channel = %channel, "Realtime subscriber disconnected");
}

async fn send_message(
    sink: &mut SplitSink<WebSocket, Message>,
    msg: &RealtimeMessage,
) -> Result<(), axum::Error> {
    let text = match serde_json::to_string(msg) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize realtime message");
            return Ok(());
        }
    };
    sink.send(Message::Text(text.into())).await
}
